//! booklens application library
//!
//! Feature modules for the booklens service. The server binary and the CLI
//! both build their searches from here.

pub mod modules;

use booklens_kernel::{settings::Settings, ModuleRegistry};

pub use modules::books;

/// Build a registry holding every application module
pub fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings)?;
    Ok(registry)
}
