//! The star particle cloud: generation, drift and recycling.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

use super::config::{Color, MotionConfig, PaletteConfig, StarfieldConfig};

/// Color category a star was assigned at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarKind {
	Cool,
	Warm,
	White,
}

/// Fixed-size set of stars plus the rotation applied to the whole cloud.
///
/// Positions and colors are parallel arrays of equal length. Colors are
/// written once by [`ParticleCloud::generate`]; positions are only ever
/// written by [`ParticleCloud::advance`].
pub struct ParticleCloud {
	positions: Vec<Vec3>,
	colors: Vec<Color>,
	/// Euler angles (XYZ order) of the whole cloud.
	pub rotation: Vec3,
	needs_upload: bool,
}

impl ParticleCloud {
	pub fn generate<R: Rng + ?Sized>(config: &StarfieldConfig, rng: &mut R) -> Self {
		let count = config.star_count;
		let mut positions = Vec::with_capacity(count);
		let mut colors = Vec::with_capacity(count);

		for _ in 0..count {
			positions.push(spherical_position(rng, config.cloud_radius));
			colors.push(star_color(rng, &config.palette).1);
		}

		Self {
			positions,
			colors,
			rotation: Vec3::ZERO,
			needs_upload: true,
		}
	}

	/// Build a cloud from explicit positions, all colored white.
	#[cfg(test)]
	pub fn from_positions(positions: Vec<Vec3>) -> Self {
		let colors = vec![Color::gray(1.0); positions.len()];
		Self {
			positions,
			colors,
			rotation: Vec3::ZERO,
			needs_upload: true,
		}
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	pub fn positions(&self) -> &[Vec3] {
		&self.positions
	}

	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Iterate `(position, color)` pairs.
	pub fn stars(&self) -> impl Iterator<Item = (Vec3, Color)> + '_ {
		self.positions.iter().copied().zip(self.colors.iter().copied())
	}

	/// Whether positions changed since the surface last drew them.
	pub fn needs_upload(&self) -> bool {
		self.needs_upload
	}

	pub fn mark_uploaded(&mut self) {
		self.needs_upload = false;
	}

	/// Advance the cloud by one frame. Returns how many stars were recycled.
	///
	/// Rotation is scaled by `delta`; the z drift is a fixed step per call.
	pub fn advance<R: Rng + ?Sized>(&mut self, delta: f32, motion: &MotionConfig, rng: &mut R) -> usize {
		let [rx, ry, rz] = motion.rotation_rate;
		self.rotation += Vec3::new(rx, ry, rz) * delta;

		let half = motion.lateral_extent * 0.5;
		let mut recycled = 0;
		for p in &mut self.positions {
			p.z += motion.drift_step;

			// Recycled stars land on a square cross-section, not the sphere
			// they were generated in.
			if p.z > motion.recycle_bound {
				p.z = -motion.recycle_bound;
				p.x = (rng.r#gen::<f32>() - 0.5) * 2.0 * half;
				p.y = (rng.r#gen::<f32>() - 0.5) * 2.0 * half;
				recycled += 1;
			}
		}

		self.needs_upload = true;
		recycled
	}
}

/// Uniform radius, azimuth and inclination mapped to Cartesian coordinates.
pub fn spherical_position<R: Rng + ?Sized>(rng: &mut R, max_radius: f32) -> Vec3 {
	let radius = rng.r#gen::<f32>() * max_radius;
	let theta = rng.r#gen::<f32>() * TAU;
	let phi = rng.r#gen::<f32>() * PI;

	Vec3::new(
		radius * phi.sin() * theta.cos(),
		radius * phi.sin() * theta.sin(),
		radius * phi.cos(),
	)
}

/// Draw a weighted color category and the color that goes with it.
pub fn star_color<R: Rng + ?Sized>(rng: &mut R, palette: &PaletteConfig) -> (StarKind, Color) {
	let choice = rng.r#gen::<f32>();
	if choice < palette.cool_threshold {
		(StarKind::Cool, palette.cool)
	} else if choice < palette.warm_threshold {
		(StarKind::Warm, palette.warm)
	} else {
		let intensity = palette.white_min + rng.r#gen::<f32>() * palette.white_range;
		(StarKind::White, Color::gray(intensity))
	}
}
