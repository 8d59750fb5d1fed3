//! Utility modules.

pub mod chinese;
pub mod fs;
