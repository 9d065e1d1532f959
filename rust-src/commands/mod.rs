//! CLI command implementations.

pub mod export;
pub mod render;
pub mod show;
pub mod validate;
