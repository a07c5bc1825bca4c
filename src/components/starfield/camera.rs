//! Perspective camera looking down -z from a fixed point on the z axis.

use glam::{Mat4, Vec3, Vec4Swizzles};

use super::config::CameraConfig;

/// Screen-space position of a projected point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
	pub x: f32,
	pub y: f32,
	/// Distance in front of the camera along its view axis.
	pub depth: f32,
}

pub struct PerspectiveCamera {
	/// Vertical field of view in degrees.
	pub fov: f32,
	pub aspect: f32,
	pub near: f32,
	pub far: f32,
	pub position: Vec3,
	projection: Mat4,
	projection_dirty: bool,
}

impl PerspectiveCamera {
	pub fn new(config: &CameraConfig, aspect: f32) -> Self {
		let mut camera = Self {
			fov: config.fov,
			aspect,
			near: config.near,
			far: config.far,
			position: Vec3::new(0.0, 0.0, config.position_z),
			projection: Mat4::IDENTITY,
			projection_dirty: true,
		};
		camera.update_projection_matrix();
		camera
	}

	/// Set the aspect ratio from viewport dimensions and flag the projection.
	pub fn set_viewport(&mut self, width: f64, height: f64) {
		if height <= 0.0 {
			return;
		}
		self.aspect = (width / height) as f32;
		self.projection_dirty = true;
	}

	pub fn projection_dirty(&self) -> bool {
		self.projection_dirty
	}

	pub fn update_projection_matrix(&mut self) {
		self.projection =
			Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far);
		self.projection_dirty = false;
	}

	pub fn projection(&self) -> Mat4 {
		self.projection
	}

	pub fn view(&self) -> Mat4 {
		Mat4::from_translation(-self.position)
	}

	/// Projection × view, the transform from world to clip space.
	pub fn view_projection(&self) -> Mat4 {
		self.projection * self.view()
	}

	/// Project a world point through `view_projection` onto a surface of the
	/// given size. Points outside the frustum yield `None`.
	pub fn project(view_projection: &Mat4, world: Vec3, width: f32, height: f32) -> Option<ScreenPoint> {
		let clip = *view_projection * world.extend(1.0);
		if clip.w <= 0.0 {
			return None;
		}
		let ndc = clip.xyz() / clip.w;
		if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
			return None;
		}
		Some(ScreenPoint {
			x: (ndc.x + 1.0) * 0.5 * width,
			y: (1.0 - ndc.y) * 0.5 * height,
			depth: clip.w,
		})
	}
}
