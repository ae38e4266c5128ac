pub mod features;
pub mod panel;
pub mod selection;
pub mod speech;
