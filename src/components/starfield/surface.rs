//! Canvas render surface.
//!
//! Points are projected on the CPU and drawn as small squares on a 2D canvas.
//! With additive blending the canvas `lighter` composite mode sums overlapping
//! stars; fog is folded into each star's color before it is drawn.

use glam::{EulerRot, Mat4};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::camera::PerspectiveCamera;
use super::error::StarfieldError;
use super::lifecycle::{RenderSurface, Viewport};
use super::scene::Scene;

/// Smallest drawn point, in device pixels.
const MIN_POINT_PX: f32 = 1.0;

/// Point size in device pixels for a star at `depth`.
///
/// Attenuated points scale with half the surface height over depth, matching
/// how GPU point sprites are usually sized.
pub fn point_size_px(size: f32, attenuate: bool, depth: f32, surface_height: f32, pixel_ratio: f32) -> f32 {
	let px = if attenuate && depth > 0.0 {
		size * (surface_height * 0.5) / depth
	} else {
		size * pixel_ratio
	};
	px.max(MIN_POINT_PX)
}

/// A `<canvas>` element with its 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	viewport: Viewport,
	disposed: bool,
}

impl CanvasSurface {
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, StarfieldError> {
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|_| StarfieldError::NoContext)?
			.ok_or(StarfieldError::NoContext)?
			.dyn_into()
			.map_err(|_| StarfieldError::NoContext)?;

		let style = canvas.style();
		let _ = style.set_property("display", "block");

		Ok(Self {
			canvas,
			ctx,
			viewport: Viewport::new(0.0, 0.0),
			disposed: false,
		})
	}

	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}

	/// Backing buffer size in device pixels.
	fn buffer_size(&self) -> (f32, f32) {
		(
			(self.viewport.width * self.viewport.pixel_ratio) as f32,
			(self.viewport.height * self.viewport.pixel_ratio) as f32,
		)
	}
}

impl RenderSurface for CanvasSurface {
	fn set_size(&mut self, viewport: Viewport) {
		if self.disposed {
			return;
		}
		self.viewport = viewport;
		let (w, h) = self.buffer_size();
		self.canvas.set_width(w as u32);
		self.canvas.set_height(h as u32);

		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{}px", viewport.width));
		let _ = style.set_property("height", &format!("{}px", viewport.height));
	}

	fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
		if self.disposed {
			return;
		}
		let ctx = &self.ctx;
		let (w, h) = self.buffer_size();
		let points = &scene.points;

		let _ = ctx.set_global_composite_operation("source-over");
		ctx.set_global_alpha(1.0);
		ctx.set_fill_style_str(&points.clear_color.to_css());
		ctx.fill_rect(0.0, 0.0, w as f64, h as f64);

		if scene.cloud.is_empty() {
			return;
		}
		if points.additive {
			let _ = ctx.set_global_composite_operation("lighter");
		}

		let r = scene.cloud.rotation;
		let model = Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
		let mvp = camera.view_projection() * model;
		let pixel_ratio = self.viewport.pixel_ratio as f32;

		for (position, color) in scene.cloud.stars() {
			let Some(p) = PerspectiveCamera::project(&mvp, position, w, h) else {
				continue;
			};
			let size = point_size_px(points.size, points.size_attenuation, p.depth, h, pixel_ratio);
			let color = scene.fog.apply(color, p.depth);
			ctx.set_fill_style_str(&color.to_css_rgba(points.opacity));
			ctx.fill_rect(
				(p.x - size * 0.5) as f64,
				(p.y - size * 0.5) as f64,
				size as f64,
				size as f64,
			);
		}

		let _ = ctx.set_global_composite_operation("source-over");
	}

	fn dispose(&mut self) {
		if self.disposed {
			return;
		}
		self.disposed = true;
		// Shrinking the canvas lets the browser drop its backing store.
		self.canvas.set_width(0);
		self.canvas.set_height(0);
	}
}
