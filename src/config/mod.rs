//! Configuration module.
//!
//! This module provides functionality for loading and resolving
//! run settings and DNS server lists from various sources.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{default_servers, FileConfig, Overrides, Settings, DEFAULT_OUTPUT_PATH};
