pub mod error;
pub mod flatten;
pub mod parse;
pub mod resolve;
pub mod validate;

pub use flatten::command::{Command, CommandTable};
pub use flatten::flatten;
