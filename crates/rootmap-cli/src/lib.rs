//! rootmap CLI library - exposes command modules for testing

pub mod commands;
pub mod common;
pub mod render;

pub use common::GlobalOpts;
pub use rootmap_logger as logger;
