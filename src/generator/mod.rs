//! Pages generated from the rendered output rather than from blocks.

pub mod not_found;
