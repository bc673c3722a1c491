//! CLI library components for the `navstate` tool.

pub mod logging;
pub mod script;
