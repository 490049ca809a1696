//! Console rendering and transcript export

pub mod console;
pub mod transcript;
