//! Validation check modules.
//!
//! Each check looks at one variable; the caller walks variables in
//! declaration order so report order follows the domain definition.

pub(crate) mod ct;
pub(crate) mod presence;
