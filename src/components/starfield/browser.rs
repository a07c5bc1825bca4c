//! [`Host`] implementation backed by the browser window.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

use super::error::StarfieldError;
use super::lifecycle::{FrameHandle, Host, Starfield, Viewport};
use super::surface::CanvasSurface;

/// Shared handle to a starfield driven by the browser.
pub type SharedStarfield = Rc<RefCell<Starfield<BrowserHost>>>;

/// Window-level frame and resize sources plus the container the canvas is
/// appended to.
pub struct BrowserHost {
	window: Window,
	container: HtmlElement,
	on_frame: Option<Closure<dyn FnMut(f64)>>,
	on_resize: Option<Closure<dyn FnMut()>>,
}

impl BrowserHost {
	pub fn new(container: HtmlElement) -> Result<Self, StarfieldError> {
		let window = web_sys::window().ok_or(StarfieldError::NoWindow)?;
		Ok(Self {
			window,
			container,
			on_frame: None,
			on_resize: None,
		})
	}

	/// Create the frame and resize callbacks for `starfield`.
	///
	/// Callbacks hold a weak reference, and skip the event when the starfield
	/// is gone or already borrowed.
	pub fn connect(starfield: &SharedStarfield) {
		let weak = Rc::downgrade(starfield);
		let on_frame = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
			with_starfield(&weak, |sf| sf.frame(now));
		});
		let weak = Rc::downgrade(starfield);
		let on_resize = Closure::<dyn FnMut()>::new(move || {
			with_starfield(&weak, |sf| sf.resize());
		});

		if let Ok(mut sf) = starfield.try_borrow_mut() {
			let host = sf.host_mut();
			host.on_frame = Some(on_frame);
			host.on_resize = Some(on_resize);
		}
	}
}

fn with_starfield(weak: &Weak<RefCell<Starfield<BrowserHost>>>, f: impl FnOnce(&mut Starfield<BrowserHost>)) {
	let Some(starfield) = weak.upgrade() else {
		return;
	};
	if let Ok(mut sf) = starfield.try_borrow_mut() {
		f(&mut sf);
	};
}

fn js_message(err: JsValue) -> String {
	err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

impl Host for BrowserHost {
	type Surface = CanvasSurface;

	fn viewport(&self) -> Option<Viewport> {
		let width = self.window.inner_width().ok()?.as_f64()?;
		let height = self.window.inner_height().ok()?.as_f64()?;
		let pixel_ratio = self.window.device_pixel_ratio();
		Some(Viewport {
			width,
			height,
			pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
		})
	}

	fn create_surface(&mut self, _viewport: Viewport) -> Result<CanvasSurface, StarfieldError> {
		let document = self.window.document().ok_or(StarfieldError::NoWindow)?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(|e| StarfieldError::Surface(js_message(e)))?
			.dyn_into()
			.map_err(|_| StarfieldError::Surface("element is not a canvas".into()))?;
		let surface = CanvasSurface::new(canvas)?;
		self.container
			.append_child(surface.canvas())
			.map_err(|e| StarfieldError::Surface(js_message(e)))?;
		Ok(surface)
	}

	fn detach_surface(&mut self, surface: &CanvasSurface) {
		surface.canvas().remove();
	}

	fn request_frame(&mut self) -> Result<FrameHandle, StarfieldError> {
		let cb = self
			.on_frame
			.as_ref()
			.ok_or_else(|| StarfieldError::Subscription("frame callback not connected".into()))?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.map(FrameHandle)
			.map_err(|e| StarfieldError::Subscription(js_message(e)))
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}

	fn subscribe_resize(&mut self) -> Result<(), StarfieldError> {
		let cb = self
			.on_resize
			.as_ref()
			.ok_or_else(|| StarfieldError::Subscription("resize callback not connected".into()))?;
		self.window
			.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
			.map_err(|e| StarfieldError::Subscription(js_message(e)))
	}

	fn unsubscribe_resize(&mut self) {
		if let Some(cb) = self.on_resize.as_ref() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	}
}
