//! Owned DOM event listeners.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

/// A DOM event listener that is removed when dropped.
///
/// Call [`ListenerHandle::forget`] to keep it for the lifetime of the page.
pub struct ListenerHandle {
	target: EventTarget,
	event_type: &'static str,
	closure: Option<Closure<dyn FnMut(Event)>>,
}

impl std::fmt::Debug for ListenerHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerHandle")
			.field("event_type", &self.event_type)
			.field("attached", &self.closure.is_some())
			.finish()
	}
}

impl ListenerHandle {
	/// Attaches `handler` to `target` for `event_type`.
	pub fn attach<F>(target: EventTarget, event_type: &'static str, handler: F) -> Result<Self, JsValue>
	where
		F: FnMut(Event) + 'static,
	{
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
		target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
		Ok(Self {
			target,
			event_type,
			closure: Some(closure),
		})
	}

	/// Returns the event type.
	pub fn event_type(&self) -> &'static str {
		self.event_type
	}

	/// Leaves the listener attached forever.
	pub fn forget(mut self) {
		if let Some(closure) = self.closure.take() {
			closure.forget();
		}
	}
}

impl Drop for ListenerHandle {
	fn drop(&mut self) {
		if let Some(closure) = self.closure.take() {
			let _ = self.target.remove_event_listener_with_callback(
				self.event_type,
				closure.as_ref().unchecked_ref(),
			);
		}
	}
}
