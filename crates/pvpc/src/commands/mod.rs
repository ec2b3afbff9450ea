//! Command handlers: bridge CLI args -> config -> collector -> output.

pub mod collect;
pub mod config_cmd;
