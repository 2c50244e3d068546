//! Simulation support: program image loading.

/// Object-file loader.
pub mod loader;
