//! History picker adapters

mod command;

pub use command::CommandPicker;
