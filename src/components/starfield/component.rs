//! Leptos component hosting the starfield.
//!
//! The component renders a fixed, full-viewport container behind the page.
//! Once the container is in the DOM an effect builds a [`Starfield`] around a
//! [`BrowserHost`], connects its callbacks and mounts it. The owner's cleanup
//! unmounts it again.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use web_sys::HtmlElement;

use super::browser::{BrowserHost, SharedStarfield};
use super::config::StarfieldConfig;
use super::error::StarfieldError;
use super::lifecycle::Starfield;

fn mount_starfield(container: HtmlElement, config: StarfieldConfig) -> Result<SharedStarfield, StarfieldError> {
	let host = BrowserHost::new(container)?;
	let starfield = Rc::new(RefCell::new(Starfield::new(host, config)));
	BrowserHost::connect(&starfield);

	let mounted = starfield.borrow_mut().mount();
	if let Err(e) = mounted {
		starfield.borrow_mut().unmount();
		return Err(e);
	}
	Ok(starfield)
}

/// Full-screen animated starfield drawn behind the rest of the page.
///
/// Pass `config` to override the defaults; the background is created once per
/// mount and does not react to later config changes.
#[component]
pub fn StarfieldCanvas(#[prop(optional)] config: Option<StarfieldConfig>) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let starfield = StoredValue::new_local(None::<SharedStarfield>);

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		if starfield.with_value(|sf| sf.is_some()) {
			return;
		}

		let config = config.clone().unwrap_or_default();
		match mount_starfield(container.into(), config) {
			Ok(sf) => starfield.set_value(Some(sf)),
			Err(e) => error!("starfield: mount failed: {}", e),
		}
	});

	on_cleanup(move || {
		if let Some(Some(sf)) = starfield.try_update_value(|sf| sf.take()) {
			if let Ok(mut sf) = sf.try_borrow_mut() {
				sf.unmount();
			}
		}
	});

	view! {
		<div
			node_ref=container_ref
			class="starfield"
			style="position: fixed; inset: 0; z-index: -10; background: #000;"
		/>
	}
}
