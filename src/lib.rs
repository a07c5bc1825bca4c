//! starfield-profile: single-page profile site over an animated starfield.
//!
//! The page is a Leptos CSR app. A full-screen canvas behind the content shows
//! a slowly drifting 3D star cloud; the hero banner, social links and skill
//! grid are static sections fed from a content table.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Only needed for its `js` feature, which gives `rand` browser entropy.
use getrandom as _;

pub mod components;

pub use components::profile::{HeroSection, ProfileContent, SkillGrid};
pub use components::starfield::{StarfieldCanvas, StarfieldConfig};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("starfield: logging initialized");
}

/// Parse the JSON body of the `<script>` element with the given id.
///
/// Returns `None` when the element is missing; logs and returns `None` when
/// the JSON does not parse.
fn load_json_script<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(data) => {
			info!("starfield: loaded #{}", id);
			Some(data)
		}
		Err(e) => {
			warn!("starfield: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Main application component.
/// Reads optional overrides from the DOM and lays out the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_json_script::<StarfieldConfig>("starfield-config").unwrap_or_default();
	let content = load_json_script::<ProfileContent>("profile-data").unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Profile" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="page">
			<StarfieldCanvas config=config />
			<HeroSection hero=content.hero links=content.links />
			<SkillGrid title=content.skills_title skills=content.skills />
		</div>
	}
}
