//! Permission adapters

mod input;

pub use input::InputPermission;
