//! Frame-to-frame delta from host timestamps.

/// Turns successive frame timestamps (milliseconds) into scaled deltas.
///
/// The previous timestamp starts at zero, so the first frame after mount sees
/// the full time since the page's time origin.
#[derive(Clone, Debug)]
pub struct FrameClock {
	last: f64,
	scale: f64,
	frames: u64,
}

impl FrameClock {
	pub fn new(scale: f64) -> Self {
		Self {
			last: 0.0,
			scale,
			frames: 0,
		}
	}

	/// Record `now` and return `(now - previous) * scale`.
	pub fn tick(&mut self, now: f64) -> f64 {
		let delta = (now - self.last) * self.scale;
		self.last = now;
		self.frames += 1;
		delta
	}

	/// Number of ticks so far.
	pub fn frames(&self) -> u64 {
		self.frames
	}
}
