//! Configuration utilities (environment and TOML).

pub mod config;
pub mod toml_config;
