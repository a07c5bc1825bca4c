//! Mount/unmount, the per-frame update and resize handling.
//!
//! [`Starfield`] owns every piece of runtime state: scene, camera, render
//! surface, clock, RNG and the handles of its host subscriptions. The host
//! (browser window, or a scripted host in tests) is reached only through the
//! [`Host`] trait, and calls back into [`Starfield::frame`] and
//! [`Starfield::resize`].
//!
//! Teardown order is fixed: unsubscribe resize, cancel the pending frame,
//! drop camera and scene, then dispose and detach the surface. Teardown runs at
//! most once, including when mount failed halfway and when the starfield is
//! dropped without an explicit [`Starfield::unmount`].

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::camera::PerspectiveCamera;
use super::clock::FrameClock;
use super::cloud::ParticleCloud;
use super::config::StarfieldConfig;
use super::error::StarfieldError;
use super::scene::{Fog, Scene};

/// Display dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	/// Device pixels per CSS pixel.
	pub pixel_ratio: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			pixel_ratio: 1.0,
		}
	}

	pub fn aspect(&self) -> f32 {
		(self.width / self.height) as f32
	}

	fn has_area(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}
}

/// Identifier of a pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Something the scene can be drawn onto.
pub trait RenderSurface {
	/// Resize the backing buffer to the viewport.
	fn set_size(&mut self, viewport: Viewport);
	fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
	/// Release graphics resources. Must tolerate repeated calls.
	fn dispose(&mut self);
}

/// The environment a starfield is mounted into.
pub trait Host {
	type Surface: RenderSurface;

	/// Current viewport, or `None` when the host cannot report one.
	fn viewport(&self) -> Option<Viewport>;
	/// Create a surface and attach it to the display.
	fn create_surface(&mut self, viewport: Viewport) -> Result<Self::Surface, StarfieldError>;
	/// Remove a surface from the display.
	fn detach_surface(&mut self, surface: &Self::Surface);
	/// Ask for one [`Starfield::frame`] call on the next display refresh.
	fn request_frame(&mut self) -> Result<FrameHandle, StarfieldError>;
	fn cancel_frame(&mut self, handle: FrameHandle);
	/// Start delivering [`Starfield::resize`] on viewport changes.
	fn subscribe_resize(&mut self) -> Result<(), StarfieldError>;
	fn unsubscribe_resize(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Idle,
	Mounted,
	TornDown,
}

/// Runtime state of one mounted starfield.
pub struct Starfield<H: Host> {
	host: H,
	config: StarfieldConfig,
	rng: StdRng,
	clock: FrameClock,
	scene: Option<Scene>,
	camera: Option<PerspectiveCamera>,
	surface: Option<H::Surface>,
	pending_frame: Option<FrameHandle>,
	resize_subscribed: bool,
	phase: Phase,
}

impl<H: Host> Starfield<H> {
	/// Create an unmounted starfield drawing randomness from OS entropy.
	pub fn new(host: H, config: StarfieldConfig) -> Self {
		Self::with_rng(host, config, StdRng::from_entropy())
	}

	pub fn with_rng(host: H, config: StarfieldConfig, rng: StdRng) -> Self {
		let clock = FrameClock::new(config.motion.delta_scale);
		Self {
			host,
			config,
			rng,
			clock,
			scene: None,
			camera: None,
			surface: None,
			pending_frame: None,
			resize_subscribed: false,
			phase: Phase::Idle,
		}
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn scene(&self) -> Option<&Scene> {
		self.scene.as_ref()
	}

	pub fn camera(&self) -> Option<&PerspectiveCamera> {
		self.camera.as_ref()
	}

	pub fn surface(&self) -> Option<&H::Surface> {
		self.surface.as_ref()
	}

	pub fn pending_frame(&self) -> Option<FrameHandle> {
		self.pending_frame
	}

	/// Build the scene, attach the surface, draw the first frame and start
	/// listening for resizes.
	///
	/// On error the starfield stays partially built; [`Starfield::unmount`]
	/// (or drop) releases whatever was acquired.
	pub fn mount(&mut self) -> Result<(), StarfieldError> {
		if self.phase != Phase::Idle {
			return Err(StarfieldError::AlreadyMounted);
		}
		self.phase = Phase::Mounted;

		let viewport = self.host.viewport().ok_or(StarfieldError::NoWindow)?;
		if !viewport.has_area() {
			return Err(StarfieldError::EmptyViewport);
		}

		let cloud = ParticleCloud::generate(&self.config, &mut self.rng);
		info!(
			"starfield: generated {} stars for a {}x{} viewport",
			cloud.len(),
			viewport.width,
			viewport.height
		);
		self.scene = Some(Scene {
			cloud,
			fog: Fog::from_config(&self.config.fog),
			points: self.config.points.clone(),
		});
		self.camera = Some(PerspectiveCamera::new(&self.config.camera, viewport.aspect()));

		let mut surface = self.host.create_surface(viewport)?;
		surface.set_size(viewport);
		self.surface = Some(surface);

		self.frame(0.0);

		self.host.subscribe_resize()?;
		self.resize_subscribed = true;
		Ok(())
	}

	/// One animation step at host timestamp `now` (milliseconds).
	///
	/// Ignored unless mounted, so a callback that was already queued when
	/// teardown started never touches released state.
	pub fn frame(&mut self, now: f64) {
		if self.phase != Phase::Mounted {
			debug!("starfield: dropping frame at {now} after teardown");
			return;
		}
		self.pending_frame = None;
		let delta = self.clock.tick(now) as f32;

		let (Some(scene), Some(camera), Some(surface)) = (
			self.scene.as_mut(),
			self.camera.as_mut(),
			self.surface.as_mut(),
		) else {
			return;
		};

		scene
			.cloud
			.advance(delta, &self.config.motion, &mut self.rng);
		if camera.projection_dirty() {
			camera.update_projection_matrix();
		}
		surface.render(scene, camera);
		scene.cloud.mark_uploaded();

		match self.host.request_frame() {
			Ok(handle) => self.pending_frame = Some(handle),
			Err(e) => warn!("starfield: animation stopped: {}", e),
		}
	}

	/// Re-read the viewport from the host and apply it.
	pub fn resize(&mut self) {
		if let Some(viewport) = self.host.viewport() {
			self.resize_to(viewport);
		}
	}

	/// Apply new viewport dimensions to camera and surface. No-op once either
	/// has been released.
	pub fn resize_to(&mut self, viewport: Viewport) {
		let (Some(camera), Some(surface)) = (self.camera.as_mut(), self.surface.as_mut()) else {
			return;
		};
		camera.set_viewport(viewport.width, viewport.height);
		surface.set_size(viewport);
		debug!(
			"starfield: resized to {}x{} @{}x",
			viewport.width, viewport.height, viewport.pixel_ratio
		);
	}

	/// Release everything acquired by [`Starfield::mount`]. Safe to call any
	/// number of times; only the first call does work.
	pub fn unmount(&mut self) {
		if self.phase == Phase::TornDown {
			return;
		}
		let was_mounted = self.phase == Phase::Mounted;
		self.phase = Phase::TornDown;

		if self.resize_subscribed {
			self.host.unsubscribe_resize();
			self.resize_subscribed = false;
		}
		if let Some(handle) = self.pending_frame.take() {
			self.host.cancel_frame(handle);
		}

		self.camera = None;
		self.scene = None;
		if let Some(mut surface) = self.surface.take() {
			surface.dispose();
			self.host.detach_surface(&surface);
		}

		if was_mounted {
			info!("starfield: torn down after {} frames", self.clock.frames());
		}
	}
}

impl<H: Host> Drop for Starfield<H> {
	fn drop(&mut self) {
		self.unmount();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::collections::BTreeSet;
	use std::rc::Rc;

	use super::*;

	/// Counters shared between the scripted host and the surfaces it hands out.
	#[derive(Debug, Default)]
	struct Record {
		next_frame: i32,
		outstanding: BTreeSet<i32>,
		requested: usize,
		cancelled: usize,
		resize_listeners: i32,
		attached: i32,
		created: usize,
		disposed: usize,
		renders: usize,
		size: Option<Viewport>,
	}

	struct ScriptedSurface {
		record: Rc<RefCell<Record>>,
		disposed: bool,
	}

	impl RenderSurface for ScriptedSurface {
		fn set_size(&mut self, viewport: Viewport) {
			self.record.borrow_mut().size = Some(viewport);
		}

		fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) {
			assert!(!self.disposed, "render after dispose");
			assert!(scene.cloud.needs_upload());
			self.record.borrow_mut().renders += 1;
		}

		fn dispose(&mut self) {
			if self.disposed {
				return;
			}
			self.disposed = true;
			self.record.borrow_mut().disposed += 1;
		}
	}

	struct ScriptedHost {
		record: Rc<RefCell<Record>>,
		viewport: Viewport,
		fail_surface: bool,
		fail_resize: bool,
	}

	impl ScriptedHost {
		fn new() -> (Self, Rc<RefCell<Record>>) {
			let record = Rc::new(RefCell::new(Record::default()));
			let host = Self {
				record: record.clone(),
				viewport: Viewport::new(1280.0, 720.0),
				fail_surface: false,
				fail_resize: false,
			};
			(host, record)
		}

		/// Deliver the pending frame, as the display would.
		fn fire(&mut self, handle: FrameHandle) {
			assert!(self.record.borrow_mut().outstanding.remove(&handle.0));
		}
	}

	impl Host for ScriptedHost {
		type Surface = ScriptedSurface;

		fn viewport(&self) -> Option<Viewport> {
			Some(self.viewport)
		}

		fn create_surface(&mut self, _viewport: Viewport) -> Result<ScriptedSurface, StarfieldError> {
			if self.fail_surface {
				return Err(StarfieldError::NoContext);
			}
			let mut r = self.record.borrow_mut();
			r.created += 1;
			r.attached += 1;
			Ok(ScriptedSurface {
				record: self.record.clone(),
				disposed: false,
			})
		}

		fn detach_surface(&mut self, _surface: &ScriptedSurface) {
			self.record.borrow_mut().attached -= 1;
		}

		fn request_frame(&mut self) -> Result<FrameHandle, StarfieldError> {
			let mut r = self.record.borrow_mut();
			r.next_frame += 1;
			let id = r.next_frame;
			r.outstanding.insert(id);
			r.requested += 1;
			Ok(FrameHandle(id))
		}

		fn cancel_frame(&mut self, handle: FrameHandle) {
			let mut r = self.record.borrow_mut();
			r.outstanding.remove(&handle.0);
			r.cancelled += 1;
		}

		fn subscribe_resize(&mut self) -> Result<(), StarfieldError> {
			if self.fail_resize {
				return Err(StarfieldError::Subscription("resize".into()));
			}
			self.record.borrow_mut().resize_listeners += 1;
			Ok(())
		}

		fn unsubscribe_resize(&mut self) {
			self.record.borrow_mut().resize_listeners -= 1;
		}
	}

	fn starfield(host: ScriptedHost) -> Starfield<ScriptedHost> {
		Starfield::with_rng(host, StarfieldConfig::default(), StdRng::seed_from_u64(7))
	}

	/// Fire the pending frame at `now`.
	fn step(sf: &mut Starfield<ScriptedHost>, now: f64) {
		let handle = sf.pending_frame().expect("animation stopped");
		sf.host_mut().fire(handle);
		sf.frame(now);
	}

	#[test]
	fn mount_draws_first_frame_and_subscribes() {
		let (host, record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();

		let r = record.borrow();
		assert_eq!(sf.phase(), Phase::Mounted);
		assert_eq!(r.renders, 1);
		assert_eq!(r.outstanding.len(), 1);
		assert_eq!(r.resize_listeners, 1);
		assert_eq!(r.attached, 1);
		assert_eq!(r.size, Some(Viewport::new(1280.0, 720.0)));
		assert_eq!(sf.scene().unwrap().cloud.len(), 8000);
		assert!(!sf.scene().unwrap().cloud.needs_upload());
	}

	#[test]
	fn second_mount_is_rejected() {
		let (host, _record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();
		assert!(matches!(sf.mount(), Err(StarfieldError::AlreadyMounted)));
	}

	#[test]
	fn resize_updates_camera_and_surface() {
		let (host, record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();

		let viewport = Viewport::new(1920.0, 1080.0);
		sf.resize_to(viewport);

		let camera = sf.camera().unwrap();
		assert_eq!(camera.aspect, (1920.0f64 / 1080.0) as f32);
		assert!(camera.projection_dirty());
		assert_eq!(record.borrow().size, Some(viewport));

		step(&mut sf, 16.0);
		assert!(!sf.camera().unwrap().projection_dirty());
	}

	#[test]
	fn resize_reads_host_viewport() {
		let (host, record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();

		sf.host_mut().viewport = Viewport {
			width: 640.0,
			height: 480.0,
			pixel_ratio: 2.0,
		};
		sf.resize();

		assert_eq!(record.borrow().size.unwrap().pixel_ratio, 2.0);
		assert_eq!(sf.camera().unwrap().aspect, (640.0f64 / 480.0) as f32);
	}

	#[test]
	fn resize_after_teardown_is_noop() {
		let (host, record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();
		sf.unmount();

		sf.resize_to(Viewport::new(10.0, 10.0));
		assert_eq!(record.borrow().size, Some(Viewport::new(1280.0, 720.0)));
	}

	#[test]
	fn teardown_twice_releases_once() {
		let (host, record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();

		sf.unmount();
		sf.unmount();
		drop(sf);

		let r = record.borrow();
		assert_eq!(r.disposed, 1);
		assert_eq!(r.cancelled, 1);
		assert_eq!(r.attached, 0);
		assert_eq!(r.resize_listeners, 0);
		assert!(r.outstanding.is_empty());
	}

	#[test]
	fn drop_tears_down() {
		let (host, record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();
		drop(sf);

		let r = record.borrow();
		assert_eq!(r.disposed, 1);
		assert_eq!(r.attached, 0);
		assert_eq!(r.resize_listeners, 0);
		assert!(r.outstanding.is_empty());
	}

	#[test]
	fn stale_frame_after_teardown_is_ignored() {
		let (host, record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();
		sf.unmount();

		sf.frame(100.0);

		let r = record.borrow();
		assert_eq!(r.renders, 1);
		assert_eq!(r.requested, 1);
		assert!(sf.pending_frame().is_none());
	}

	#[test]
	fn failed_surface_still_tears_down_cleanly() {
		let (mut host, record) = ScriptedHost::new();
		host.fail_surface = true;
		let mut sf = starfield(host);

		assert!(matches!(sf.mount(), Err(StarfieldError::NoContext)));
		sf.unmount();
		sf.unmount();

		let r = record.borrow();
		assert_eq!(r.created, 0);
		assert_eq!(r.requested, 0);
		assert_eq!(r.cancelled, 0);
		assert_eq!(r.resize_listeners, 0);
	}

	#[test]
	fn failed_resize_subscription_releases_frame_and_surface() {
		let (mut host, record) = ScriptedHost::new();
		host.fail_resize = true;
		let mut sf = starfield(host);

		assert!(matches!(sf.mount(), Err(StarfieldError::Subscription(_))));
		sf.unmount();

		let r = record.borrow();
		assert_eq!(r.resize_listeners, 0);
		assert_eq!(r.cancelled, 1);
		assert!(r.outstanding.is_empty());
		assert_eq!(r.disposed, 1);
		assert_eq!(r.attached, 0);
	}

	#[test]
	fn empty_viewport_fails_mount() {
		let (mut host, record) = ScriptedHost::new();
		host.viewport = Viewport::new(0.0, 0.0);
		let mut sf = starfield(host);

		assert!(matches!(sf.mount(), Err(StarfieldError::EmptyViewport)));
		assert!(sf.scene().is_none());
		sf.unmount();
		assert_eq!(record.borrow().created, 0);
	}

	#[test]
	fn ten_frames_then_unmount() {
		let (host, record) = ScriptedHost::new();
		let mut sf = starfield(host);
		sf.mount().unwrap();

		let bound = 500.0;
		for i in 1..=10 {
			step(&mut sf, i as f64 * 16.67);

			let cloud = &sf.scene().unwrap().cloud;
			assert_eq!(record.borrow().outstanding.len(), 1);
			for p in cloud.positions() {
				assert!(p.z <= bound, "z {} above recycle bound", p.z);
				// Initial stars come from the 1000-radius sphere and only
				// ever move forward, so the far side stays inside it.
				assert!(p.z >= -1000.0);
			}
		}

		sf.unmount();

		let r = record.borrow();
		assert_eq!(r.renders, 11);
		assert!(r.outstanding.is_empty());
		assert_eq!(r.resize_listeners, 0);
		assert_eq!(r.attached, 0);
		assert!(sf.scene().is_none());
		assert!(sf.camera().is_none());
	}
}
