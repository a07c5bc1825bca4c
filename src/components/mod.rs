//! Page components.

pub mod profile;
pub mod starfield;
