//! Output rendering.
//!
//! Everything this tool produces is printed to the terminal; see [`terminal`]
//! for the brief, content, and digest views.

pub mod terminal;
