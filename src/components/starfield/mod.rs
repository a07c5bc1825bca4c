//! Animated 3D starfield background.
//!
//! A cloud of stars is generated inside a sphere around the origin and viewed
//! through a perspective camera with depth fog. Each display refresh the whole
//! cloud turns slightly, every star drifts towards the camera, and stars that
//! pass the near bound are recycled to the far one.
//!
//! - [`cloud`] generates and advances the stars
//! - [`camera`] and [`scene`] hold what is drawn and how it is seen
//! - [`lifecycle`] owns runtime state and the mount/frame/resize/unmount flow
//! - the browser host and canvas surface plug that flow into the page
//!
//! # Example
//!
//! ```ignore
//! use starfield_profile::{StarfieldCanvas, StarfieldConfig};
//!
//! let config = StarfieldConfig { star_count: 4000, ..Default::default() };
//! view! { <StarfieldCanvas config=config /> }
//! ```

mod browser;
pub mod camera;
mod clock;
pub mod cloud;
mod component;
pub mod config;
mod error;
pub mod lifecycle;
pub mod scene;
mod surface;

pub use browser::BrowserHost;
pub use component::StarfieldCanvas;
pub use config::StarfieldConfig;
pub use error::StarfieldError;
pub use lifecycle::{Host, RenderSurface, Starfield, Viewport};
pub use surface::CanvasSurface;
