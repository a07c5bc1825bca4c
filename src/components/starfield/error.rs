//! Errors raised while wiring the starfield into its host.

use std::fmt;

/// Failures during mount. The running animation itself cannot fail.
#[derive(Debug)]
pub enum StarfieldError {
	/// No `window`/`document` available (not running in a browser).
	NoWindow,
	/// The viewport reported a zero or negative size.
	EmptyViewport,
	/// Creating or attaching the render surface failed.
	Surface(String),
	/// The canvas refused to hand out a 2D context.
	NoContext,
	/// Registering a frame or resize callback failed.
	Subscription(String),
	/// `mount` was called on a starfield that already mounted.
	AlreadyMounted,
}

impl fmt::Display for StarfieldError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StarfieldError::NoWindow => write!(f, "no browser window available"),
			StarfieldError::EmptyViewport => write!(f, "viewport has no area"),
			StarfieldError::Surface(msg) => write!(f, "failed to set up render surface: {}", msg),
			StarfieldError::NoContext => write!(f, "canvas 2d context unavailable"),
			StarfieldError::Subscription(msg) => write!(f, "failed to register callback: {}", msg),
			StarfieldError::AlreadyMounted => write!(f, "starfield already mounted"),
		}
	}
}

impl std::error::Error for StarfieldError {}
