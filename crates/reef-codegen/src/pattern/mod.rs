//! Pattern compilation to target-level tests and bindings.
//!
//! A pattern compiles against a scrutinee reference (the text of the
//! expression holding the matched value, usually a minted temporary)
//! into two pieces:
//!
//! - a boolean condition the generated program evaluates first, and
//! - the binding statements materialized only after the condition held.
//!
//! Match arms layer first-match-wins sequencing and guards on top of
//! this; neither belongs to the pattern itself. Guards are AND'd by the
//! desugarer after bindings, never folded into the condition here.

pub mod compile;

pub use compile::{binding_names, bindings, condition};
