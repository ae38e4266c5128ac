//! Floating panel lifecycle
//!
//! `state` holds the state machine data, `controller` drives transitions and
//! `dispatcher` runs the panel functions on top of it. `position` and
//! `watcher` are pure helpers.

pub mod controller;
mod dispatcher;
pub mod position;
pub mod state;
pub mod watcher;

pub use controller::PanelController;
pub use position::compute_position;
pub use state::{PanelStatus, Visibility};
