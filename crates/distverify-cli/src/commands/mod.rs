//! Command implementations.

pub mod completion;
pub mod generate;
pub mod verify;
