// Reef common -- shared basic types for the Reef compiler.

pub mod span;

pub use span::{LineIndex, Pos};
