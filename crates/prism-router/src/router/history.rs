//! History API integration.
//!
//! [`HistoryBackend`] is the seam between the router and the browser's
//! session history. [`BrowserHistory`] talks to `window.history` on WASM;
//! [`MemoryHistory`] keeps an entry stack in memory for native builds and
//! tests.

use crate::error::HistoryError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Opaque key/value bag stored with a history entry.
///
/// The router never interprets the bag except for the redirect key it writes
/// itself; everything else is round-tripped verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryState(Map<String, Value>);

impl HistoryState {
	/// Creates an empty state bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a value.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	/// Inserts a value, returning the previous one.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(key.into(), value.into())
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Returns the string stored under `key`.
	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(Value::as_str)
	}

	/// Returns true if the bag is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the underlying map.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Converts the bag into a browser value.
	#[cfg(target_arch = "wasm32")]
	pub fn to_js(&self) -> Result<wasm_bindgen::JsValue, HistoryError> {
		let json =
			serde_json::to_string(&self.0).map_err(|e| HistoryError::InvalidState(e.to_string()))?;
		js_sys::JSON::parse(&json).map_err(|e| HistoryError::InvalidState(format!("{:?}", e)))
	}

	/// Reads a bag from a browser value. Anything but a plain object yields an
	/// empty bag.
	#[cfg(target_arch = "wasm32")]
	pub fn from_js(value: &wasm_bindgen::JsValue) -> Self {
		if value.is_null() || value.is_undefined() {
			return Self::new();
		}
		js_sys::JSON::stringify(value)
			.ok()
			.and_then(|s| s.as_string())
			.and_then(|s| serde_json::from_str::<Map<String, Value>>(&s).ok())
			.map(Self)
			.unwrap_or_default()
	}
}

impl From<Map<String, Value>> for HistoryState {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

/// Session history primitives used by the router.
pub trait HistoryBackend {
	/// Returns the path currently shown in the address bar.
	fn current_path(&self) -> String;

	/// Pushes a new entry.
	fn push(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError>;

	/// Replaces the current entry.
	fn replace(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError>;

	/// Moves one entry back. The browser reports the move through `popstate`.
	fn back(&self) -> Result<(), HistoryError>;
}

/// A single entry of a [`MemoryHistory`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
	/// Entry path.
	pub path: String,
	/// Entry state bag.
	pub state: HistoryState,
}

#[derive(Debug)]
struct MemoryHistoryInner {
	entries: Vec<HistoryEntry>,
	cursor: usize,
}

/// In-memory session history.
///
/// Clones share the same stack, so a test can keep a handle while the router
/// owns another.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
	inner: Rc<RefCell<MemoryHistoryInner>>,
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

impl MemoryHistory {
	/// Creates a history whose single entry is `initial_path`.
	pub fn new(initial_path: impl Into<String>) -> Self {
		Self {
			inner: Rc::new(RefCell::new(MemoryHistoryInner {
				entries: vec![HistoryEntry {
					path: initial_path.into(),
					state: HistoryState::new(),
				}],
				cursor: 0,
			})),
		}
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.inner.borrow().entries.len()
	}

	/// Always false: a history has at least its initial entry.
	pub fn is_empty(&self) -> bool {
		self.inner.borrow().entries.is_empty()
	}

	/// Returns the entry at the cursor.
	pub fn current(&self) -> HistoryEntry {
		let inner = self.inner.borrow();
		inner.entries[inner.cursor].clone()
	}

	/// Returns all entry paths, oldest first.
	pub fn paths(&self) -> Vec<String> {
		self.inner
			.borrow()
			.entries
			.iter()
			.map(|e| e.path.clone())
			.collect()
	}
}

impl HistoryBackend for MemoryHistory {
	fn current_path(&self) -> String {
		self.current().path
	}

	fn push(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError> {
		let mut inner = self.inner.borrow_mut();
		let keep = inner.cursor + 1;
		inner.entries.truncate(keep);
		inner.entries.push(HistoryEntry {
			path: path.to_string(),
			state: state.clone(),
		});
		inner.cursor = keep;
		Ok(())
	}

	fn replace(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError> {
		let mut inner = self.inner.borrow_mut();
		let cursor = inner.cursor;
		inner.entries[cursor] = HistoryEntry {
			path: path.to_string(),
			state: state.clone(),
		};
		Ok(())
	}

	fn back(&self) -> Result<(), HistoryError> {
		let mut inner = self.inner.borrow_mut();
		inner.cursor = inner.cursor.saturating_sub(1);
		Ok(())
	}
}

/// Session history backed by `window.history`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHistory;

impl BrowserHistory {
	/// Creates the browser backend.
	pub fn new() -> Self {
		Self
	}
}

#[cfg(target_arch = "wasm32")]
fn browser_history() -> Result<web_sys::History, HistoryError> {
	web_sys::window()
		.ok_or_else(|| HistoryError::Unavailable("no window".to_string()))?
		.history()
		.map_err(|e| HistoryError::Unavailable(format!("{:?}", e)))
}

#[cfg(target_arch = "wasm32")]
impl HistoryBackend for BrowserHistory {
	/// Returns the pathname followed by the query string and fragment, the
	/// same form the link interceptor pushes.
	fn current_path(&self) -> String {
		let Some(location) = web_sys::window().map(|w| w.location()) else {
			return "/".to_string();
		};
		let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
		let search = location.search().unwrap_or_default();
		let hash = location.hash().unwrap_or_default();
		format!("{}{}{}", pathname, search, hash)
	}

	fn push(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError> {
		browser_history()?
			.push_state_with_url(&state.to_js()?, "", Some(path))
			.map_err(|e| HistoryError::NavigationFailed(format!("{:?}", e)))
	}

	fn replace(&self, path: &str, state: &HistoryState) -> Result<(), HistoryError> {
		browser_history()?
			.replace_state_with_url(&state.to_js()?, "", Some(path))
			.map_err(|e| HistoryError::NavigationFailed(format!("{:?}", e)))
	}

	fn back(&self) -> Result<(), HistoryError> {
		browser_history()?
			.back()
			.map_err(|e| HistoryError::NavigationFailed(format!("{:?}", e)))
	}
}

/// Non-WASM stub: there is no browser, every mutation reports unavailability.
#[cfg(not(target_arch = "wasm32"))]
impl HistoryBackend for BrowserHistory {
	fn current_path(&self) -> String {
		"/".to_string()
	}

	fn push(&self, _path: &str, _state: &HistoryState) -> Result<(), HistoryError> {
		Err(HistoryError::Unavailable("not running in a browser".to_string()))
	}

	fn replace(&self, _path: &str, _state: &HistoryState) -> Result<(), HistoryError> {
		Err(HistoryError::Unavailable("not running in a browser".to_string()))
	}

	fn back(&self) -> Result<(), HistoryError> {
		Err(HistoryError::Unavailable("not running in a browser".to_string()))
	}
}
