//! Type system utilities and aliases.
//!
//! - [`aliases`]: shared-state alias for cross-thread engine handles.

pub mod aliases;

pub use aliases::*;
