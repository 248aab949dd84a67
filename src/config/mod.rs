//! Configuration module for Hearth
//!
//! This module provides configuration management including:
//! - Platform-appropriate path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::HearthPaths;
pub use settings::Settings;
