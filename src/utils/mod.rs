//! Utility modules shared by the commands.

pub mod fs;
pub mod links;
pub mod minify;
