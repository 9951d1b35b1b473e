//! Configuration management for ctxpack
//!
//! Settings are read from `ctxpack.toml` at the project root and layered
//! with command-line overrides.

pub mod generator_config;

// Re-export commonly used items
pub use generator_config::{
    relative_to_root, ConfigOverrides, GeneratorConfig, LoadedConfig, CONFIG_FILE_NAME,
};
