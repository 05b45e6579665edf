//! Page controllers for the built Prism DNS views.
//!
//! The views themselves are server-rendered containers; a controller only
//! owns what must be released when the user leaves the page. The zones page
//! keeps its record list fresh with a periodic refresh event, which is
//! cancelled on teardown.

use prism_router::error::MountError;
use prism_router::router::{ComponentRegistry, PageController};
use prism_router::{debug_log, info_log};
use std::cell::Cell;
use std::rc::Rc;

/// Component ids that have a built view and a controller.
pub const BUILT_VIEWS: [&str; 9] = [
	"dashboard",
	"login",
	"register",
	"forgot-password",
	"reset-password",
	"verify-email",
	"profile",
	"zones",
	"404",
];

/// Milliseconds between zone list refresh events.
pub const ZONES_REFRESH_INTERVAL_MS: i32 = 30_000;

/// Event dispatched on the document when the zone list should be refetched.
pub const ZONES_REFRESH_EVENT: &str = "prism:zones-refresh";

/// Counts live page resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
	live: Rc<Cell<usize>>,
}

impl ResourceTracker {
	/// Creates a tracker with no live resources.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of live resources.
	pub fn live(&self) -> usize {
		self.live.get()
	}

	fn acquire(&self) {
		self.live.set(self.live.get() + 1);
	}

	fn release(&self) {
		self.live.set(self.live.get().saturating_sub(1));
	}
}

/// Periodic zone refresh, cancelled when dropped.
pub struct RefreshTimer {
	tracker: ResourceTracker,
	#[cfg(target_arch = "wasm32")]
	handle: i32,
	#[cfg(target_arch = "wasm32")]
	_callback: wasm_bindgen::closure::Closure<dyn FnMut()>,
}

impl std::fmt::Debug for RefreshTimer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RefreshTimer").finish_non_exhaustive()
	}
}

impl RefreshTimer {
	/// Starts dispatching [`ZONES_REFRESH_EVENT`] every `interval_ms`.
	#[cfg(target_arch = "wasm32")]
	pub fn start(interval_ms: i32, tracker: &ResourceTracker) -> Result<Self, MountError> {
		use wasm_bindgen::JsCast;
		use wasm_bindgen::closure::Closure;

		let to_err = |e: wasm_bindgen::JsValue| MountError::initialization("zones", format!("{:?}", e));
		let window = web_sys::window()
			.ok_or_else(|| MountError::initialization("zones", "No window object"))?;

		let callback = Closure::wrap(Box::new(|| {
			let Some(document) = web_sys::window().and_then(|w| w.document()) else {
				return;
			};
			if let Ok(event) = web_sys::Event::new(ZONES_REFRESH_EVENT) {
				let _ = document.dispatch_event(&event);
			}
		}) as Box<dyn FnMut()>);

		let handle = window
			.set_interval_with_callback_and_timeout_and_arguments_0(
				callback.as_ref().unchecked_ref(),
				interval_ms,
			)
			.map_err(to_err)?;

		tracker.acquire();
		Ok(Self {
			tracker: tracker.clone(),
			handle,
			_callback: callback,
		})
	}

	/// Non-WASM version: nothing to schedule, only the resource is tracked.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn start(_interval_ms: i32, tracker: &ResourceTracker) -> Result<Self, MountError> {
		tracker.acquire();
		Ok(Self {
			tracker: tracker.clone(),
		})
	}
}

impl Drop for RefreshTimer {
	fn drop(&mut self) {
		#[cfg(target_arch = "wasm32")]
		{
			if let Some(window) = web_sys::window() {
				window.clear_interval_with_handle(self.handle);
			}
		}
		self.tracker.release();
	}
}

/// Controller for views without page resources.
#[derive(Debug)]
pub struct ViewController {
	component_id: &'static str,
}

impl ViewController {
	/// Mounts the controller for `component_id`.
	pub fn mount(component_id: &'static str) -> Self {
		debug_log!("Controller '{}' mounted", component_id);
		Self { component_id }
	}

	/// Returns the component id.
	pub fn component_id(&self) -> &'static str {
		self.component_id
	}
}

impl PageController for ViewController {
	fn teardown(&mut self) {
		debug_log!("Controller '{}' torn down", self.component_id);
	}
}

/// Controller for the DNS zones page.
#[derive(Debug)]
pub struct ZonesController {
	refresh: Option<RefreshTimer>,
}

impl ZonesController {
	/// Mounts the controller and starts the refresh timer.
	pub fn mount(tracker: &ResourceTracker) -> Result<Self, MountError> {
		let refresh = RefreshTimer::start(ZONES_REFRESH_INTERVAL_MS, tracker)?;
		info_log!("Zones auto-refresh every {} ms", ZONES_REFRESH_INTERVAL_MS);
		Ok(Self {
			refresh: Some(refresh),
		})
	}

	/// Returns true while the refresh timer runs.
	pub fn is_refreshing(&self) -> bool {
		self.refresh.is_some()
	}
}

impl PageController for ZonesController {
	fn teardown(&mut self) {
		if self.refresh.take().is_some() {
			info_log!("Zones auto-refresh stopped");
		}
	}
}

/// Returns the controller registry for every built view.
pub fn prism_components() -> ComponentRegistry {
	prism_components_with(&ResourceTracker::new())
}

/// Returns the controller registry, tracking page resources with `tracker`.
pub fn prism_components_with(tracker: &ResourceTracker) -> ComponentRegistry {
	let mut registry = ComponentRegistry::new();
	for id in BUILT_VIEWS {
		if id == "zones" {
			let tracker = tracker.clone();
			registry.register(id, move || {
				Ok(Box::new(ZonesController::mount(&tracker)?) as Box<dyn PageController>)
			});
		} else {
			registry.register(id, move || {
				Ok(Box::new(ViewController::mount(id)) as Box<dyn PageController>)
			});
		}
	}
	registry
}
