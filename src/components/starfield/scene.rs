//! Scene root: the particle cloud and the fog it is seen through.

use super::cloud::ParticleCloud;
use super::config::{Color, FogConfig, PointStyle};

/// Linear depth fog. Fixed once the scene is built.
#[derive(Clone, Copy, Debug)]
pub struct Fog {
	pub color: Color,
	pub near: f32,
	pub far: f32,
}

impl Fog {
	pub fn from_config(config: &FogConfig) -> Self {
		Self {
			color: config.color,
			near: config.near,
			far: config.far,
		}
	}

	/// Fog amount at `depth`: 0 before `near`, 1 past `far`, smoothstep between.
	pub fn factor(&self, depth: f32) -> f32 {
		if self.far <= self.near {
			return if depth >= self.far { 1.0 } else { 0.0 };
		}
		let t = ((depth - self.near) / (self.far - self.near)).clamp(0.0, 1.0);
		t * t * (3.0 - 2.0 * t)
	}

	/// Blend `color` towards the fog color for a point at `depth`.
	pub fn apply(&self, color: Color, depth: f32) -> Color {
		color.lerp(self.color, self.factor(depth))
	}
}

pub struct Scene {
	pub cloud: ParticleCloud,
	pub fog: Fog,
	pub points: PointStyle,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fog_is_clear_before_near_and_opaque_past_far() {
		let fog = Fog::from_config(&FogConfig::default());
		assert_eq!(fog.factor(10.0), 0.0);
		assert_eq!(fog.factor(50.0), 0.0);
		assert_eq!(fog.factor(1000.0), 1.0);
		assert_eq!(fog.factor(5000.0), 1.0);
		assert!((fog.factor(525.0) - 0.5).abs() < 1e-6);
	}

	#[test]
	fn fog_fades_towards_black() {
		let fog = Fog::from_config(&FogConfig::default());
		let white = Color::gray(1.0);
		assert_eq!(fog.apply(white, 0.0), white);
		assert_eq!(fog.apply(white, 2000.0), Color::BLACK);
	}
}
