//! Selection monitoring
//!
//! Turns bursts of pointer/key release events into debounced selection
//! changes.

pub mod monitor;

pub use monitor::{SelectionChange, SelectionMonitor};
