// Poke Battle Schema - Shared type definitions
// This crate contains the static enums and tables that are shared between
// the battle engine and the data-assembly layer. It performs no I/O.

// Re-export the main types
pub use pokemon_types::*;
pub use status::*;

pub mod pokemon_types;
pub mod status;
