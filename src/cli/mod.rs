//! CLI command handling

pub mod output;
pub mod send;

pub use output::*;
pub use send::*;
