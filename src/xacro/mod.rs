//! Robot description template expansion
//!
//! Expands a xacro template into a flat, pretty-printed XML document in a
//! single deterministic pass. The supported subset covers what robot
//! description packages actually use: properties with `${...}`
//! substitution, parameterized macros, includes, if/unless conditionals,
//! and `<xacro:arg>` with `$(arg ...)` references.
//!
//! Anything unresolved (an undefined property, macro, or argument, a
//! malformed document, an unreadable include) fails the whole expansion;
//! there is no partial output.

mod expander;
mod loader;
mod tree;

pub use expander::{expand_file, expand_str};
