//! Starfield configuration.
//!
//! Every section deserializes with `#[serde(default)]`, so a JSON override only
//! needs the fields it changes. Defaults reproduce the stock look: 8000 stars
//! in a 1000-unit sphere, black fog from 50 to 1000, an 85° camera at z = 30.

use serde::Deserialize;

/// Linear RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Color {
	pub r: f32,
	pub g: f32,
	pub b: f32,
}

impl Color {
	pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

	pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
		Self { r, g, b }
	}

	/// Equal intensity on every channel.
	pub const fn gray(v: f32) -> Self {
		Self { r: v, g: v, b: v }
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f32) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: self.r + (other.r - self.r) * t,
			g: self.g + (other.g - self.g) * t,
			b: self.b + (other.b - self.b) * t,
		}
	}

	/// Multiply every channel by `k`, clamped back into `[0, 1]`.
	pub fn scale(self, k: f32) -> Self {
		Self {
			r: (self.r * k).clamp(0.0, 1.0),
			g: (self.g * k).clamp(0.0, 1.0),
			b: (self.b * k).clamp(0.0, 1.0),
		}
	}

	pub fn to_css(self) -> String {
		format!(
			"#{:02x}{:02x}{:02x}",
			to_byte(self.r),
			to_byte(self.g),
			to_byte(self.b)
		)
	}

	pub fn to_css_rgba(self, alpha: f32) -> String {
		format!(
			"rgba({}, {}, {}, {})",
			to_byte(self.r),
			to_byte(self.g),
			to_byte(self.b),
			alpha.clamp(0.0, 1.0)
		)
	}
}

fn to_byte(v: f32) -> u8 {
	(v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Perspective camera parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
	/// Vertical field of view in degrees.
	pub fov: f32,
	pub near: f32,
	pub far: f32,
	/// Distance of the camera from the origin along +z.
	pub position_z: f32,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			fov: 85.0,
			near: 0.1,
			far: 1000.0,
			position_z: 30.0,
		}
	}
}

/// Depth-based fade towards `color`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FogConfig {
	pub color: Color,
	pub near: f32,
	pub far: f32,
}

impl Default for FogConfig {
	fn default() -> Self {
		Self {
			color: Color::BLACK,
			near: 50.0,
			far: 1000.0,
		}
	}
}

/// Per-frame motion of the cloud.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
	/// Multiplier turning a frame timestamp difference (ms) into `delta`.
	pub delta_scale: f64,
	/// Rotation increments per unit of `delta`, around x, y, z.
	pub rotation_rate: [f32; 3],
	/// Fixed z advance per frame. Not scaled by `delta`.
	pub drift_step: f32,
	/// Particles with z above this bound are recycled.
	pub recycle_bound: f32,
	/// Recycled particles reappear at `-recycle_bound`, with x and y drawn
	/// from `[-lateral_extent / 2, lateral_extent / 2)`.
	pub lateral_extent: f32,
}

impl Default for MotionConfig {
	fn default() -> Self {
		Self {
			delta_scale: 0.0001,
			rotation_rate: [0.00005, 0.0001, 0.00002],
			drift_step: 0.05,
			recycle_bound: 500.0,
			lateral_extent: 1000.0,
		}
	}
}

/// Weighted star color categories.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
	pub cool: Color,
	pub warm: Color,
	/// Draws below this value pick `cool`.
	pub cool_threshold: f32,
	/// Draws below this value (and not cool) pick `warm`.
	pub warm_threshold: f32,
	/// Minimum near-white intensity.
	pub white_min: f32,
	/// Random span added on top of `white_min`.
	pub white_range: f32,
}

impl Default for PaletteConfig {
	fn default() -> Self {
		Self {
			cool: Color::rgb(0.7, 0.8, 1.0),
			warm: Color::rgb(1.0, 0.8, 0.8),
			cool_threshold: 0.15,
			warm_threshold: 0.25,
			white_min: 0.8,
			white_range: 0.2,
		}
	}
}

/// How points are drawn on the surface.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PointStyle {
	/// Point size in world units.
	pub size: f32,
	/// Shrink points with distance from the camera.
	pub size_attenuation: bool,
	pub opacity: f32,
	/// Add point colors onto the framebuffer instead of painting over it.
	pub additive: bool,
	pub clear_color: Color,
}

impl Default for PointStyle {
	fn default() -> Self {
		Self {
			size: 0.15,
			size_attenuation: true,
			opacity: 1.0,
			additive: true,
			clear_color: Color::BLACK,
		}
	}
}

/// Complete starfield configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
	pub star_count: usize,
	/// Radius of the sphere the initial cloud is drawn from.
	pub cloud_radius: f32,
	pub camera: CameraConfig,
	pub fog: FogConfig,
	pub motion: MotionConfig,
	pub palette: PaletteConfig,
	pub points: PointStyle,
}

impl Default for StarfieldConfig {
	fn default() -> Self {
		Self {
			star_count: 8000,
			cloud_radius: 1000.0,
			camera: CameraConfig::default(),
			fog: FogConfig::default(),
			motion: MotionConfig::default(),
			palette: PaletteConfig::default(),
			points: PointStyle::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config: StarfieldConfig =
			serde_json::from_str(r#"{ "star_count": 120, "fog": { "near": 10.0 } }"#).unwrap();
		assert_eq!(config.star_count, 120);
		assert_eq!(config.fog.near, 10.0);
		assert_eq!(config.fog.far, 1000.0);
		assert_eq!(config.camera.fov, 85.0);
		assert_eq!(config.motion.drift_step, 0.05);
	}

	#[test]
	fn color_css() {
		assert_eq!(Color::rgb(1.0, 0.0, 0.5).to_css(), "#ff0080");
		assert_eq!(Color::BLACK.to_css_rgba(2.0), "rgba(0, 0, 0, 1)");
	}

	#[test]
	fn color_scale_clamps() {
		let c = Color::gray(0.8).scale(2.0);
		assert_eq!(c, Color::gray(1.0));
	}
}
