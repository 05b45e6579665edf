//! View container management.
//!
//! Page views are pre-rendered containers identified as `{component_id}-view`
//! and navigation markers identified as `nav-{component_id}`. The router only
//! toggles their visibility and the `active` class; it never creates or
//! removes them. The one exception is the placeholder container, created on
//! demand for components that have no view yet.

use crate::error::MountError;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Id of the container used for the "coming soon" placeholder.
pub const PLACEHOLDER_VIEW_ID: &str = "placeholder-view";

/// Class marking the active navigation link.
pub const ACTIVE_CLASS: &str = "active";

/// Returns the container id for a component.
pub fn view_id(component_id: &str) -> String {
	format!("{}-view", component_id)
}

/// Returns the navigation marker id for a component.
pub fn nav_id(component_id: &str) -> String {
	format!("nav-{}", component_id)
}

/// Returns the text shown by the placeholder.
pub fn placeholder_text(title: &str) -> String {
	format!("{} is coming soon", title)
}

/// Document-side effects of mounting a component.
pub trait ViewHost {
	/// Hides every view container, the placeholder included.
	fn hide_all_views(&self) -> Result<(), MountError>;

	/// Reveals the container of `component_id`. Returns false if the document
	/// has no such container.
	fn show_view(&self, component_id: &str) -> Result<bool, MountError>;

	/// Marks the navigation link of `component_id` active and every other one
	/// inactive. Missing markers are ignored.
	fn set_active_nav(&self, component_id: &str) -> Result<(), MountError>;

	/// Shows the "coming soon" placeholder for a component without a view.
	fn show_placeholder(&self, component_id: &str, title: &str) -> Result<(), MountError>;

	/// Sets the document title.
	fn set_title(&self, title: &str);
}

#[derive(Debug, Default)]
struct MemoryViewHostInner {
	/// Container id to visibility.
	views: BTreeMap<String, bool>,
	/// Navigation marker ids.
	nav_markers: BTreeSet<String>,
	active_nav: Option<String>,
	placeholder: Option<String>,
	title: String,
}

/// In-memory document for native builds and tests.
///
/// Clones share state, so a test can inspect what the router did.
#[derive(Debug, Clone, Default)]
pub struct MemoryViewHost {
	inner: Rc<RefCell<MemoryViewHostInner>>,
}

impl MemoryViewHost {
	/// Creates an empty document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a document with a hidden container and a navigation marker for
	/// each component id.
	pub fn with_views<I, S>(component_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let host = Self::new();
		{
			let mut inner = host.inner.borrow_mut();
			for id in component_ids {
				inner.views.insert(view_id(id.as_ref()), false);
				inner.nav_markers.insert(nav_id(id.as_ref()));
			}
		}
		host
	}

	/// Returns the ids of visible containers.
	pub fn visible_views(&self) -> Vec<String> {
		self.inner
			.borrow()
			.views
			.iter()
			.filter(|(_, visible)| **visible)
			.map(|(id, _)| id.clone())
			.collect()
	}

	/// Returns the id of the active navigation marker.
	pub fn active_nav(&self) -> Option<String> {
		self.inner.borrow().active_nav.clone()
	}

	/// Returns the component id shown by a visible placeholder.
	pub fn placeholder(&self) -> Option<String> {
		let inner = self.inner.borrow();
		match inner.views.get(PLACEHOLDER_VIEW_ID) {
			Some(true) => inner.placeholder.clone(),
			_ => None,
		}
	}

	/// Returns the document title.
	pub fn title(&self) -> String {
		self.inner.borrow().title.clone()
	}
}

impl ViewHost for MemoryViewHost {
	fn hide_all_views(&self) -> Result<(), MountError> {
		for visible in self.inner.borrow_mut().views.values_mut() {
			*visible = false;
		}
		Ok(())
	}

	fn show_view(&self, component_id: &str) -> Result<bool, MountError> {
		let mut inner = self.inner.borrow_mut();
		match inner.views.get_mut(&view_id(component_id)) {
			Some(visible) => {
				*visible = true;
				Ok(true)
			}
			None => Ok(false),
		}
	}

	fn set_active_nav(&self, component_id: &str) -> Result<(), MountError> {
		let mut inner = self.inner.borrow_mut();
		let marker = nav_id(component_id);
		inner.active_nav = inner.nav_markers.contains(&marker).then_some(marker);
		Ok(())
	}

	fn show_placeholder(&self, component_id: &str, _title: &str) -> Result<(), MountError> {
		let mut inner = self.inner.borrow_mut();
		inner.views.insert(PLACEHOLDER_VIEW_ID.to_string(), true);
		inner.placeholder = Some(component_id.to_string());
		Ok(())
	}

	fn set_title(&self, title: &str) {
		self.inner.borrow_mut().title = title.to_string();
	}
}

/// View host operating on the live document.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct DomViewHost {
	document: web_sys::Document,
	placeholder_parent_id: Option<String>,
}

#[cfg(target_arch = "wasm32")]
impl DomViewHost {
	/// Binds to the current document.
	pub fn new() -> Result<Self, MountError> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| MountError::ViewHost("No document object".to_string()))?;
		Ok(Self {
			document,
			placeholder_parent_id: None,
		})
	}

	/// Appends the placeholder to the element with `id` instead of `<body>`.
	pub fn with_placeholder_parent(mut self, id: impl Into<String>) -> Self {
		self.placeholder_parent_id = Some(id.into());
		self
	}

	fn elements(&self, selector: &str) -> Result<Vec<web_sys::HtmlElement>, MountError> {
		use wasm_bindgen::JsCast;

		let nodes = self
			.document
			.query_selector_all(selector)
			.map_err(|e| MountError::ViewHost(format!("{:?}", e)))?;
		Ok((0..nodes.length())
			.filter_map(|i| nodes.get(i))
			.filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
			.collect())
	}

	fn html_element_by_id(&self, id: &str) -> Option<web_sys::HtmlElement> {
		use wasm_bindgen::JsCast;

		self.document
			.get_element_by_id(id)
			.and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
	}

	fn placeholder_container(&self) -> Result<web_sys::HtmlElement, MountError> {
		use wasm_bindgen::JsCast;

		if let Some(existing) = self.html_element_by_id(PLACEHOLDER_VIEW_ID) {
			return Ok(existing);
		}

		let to_err = |e: wasm_bindgen::JsValue| MountError::ViewHost(format!("{:?}", e));
		let container = self.document.create_element("div").map_err(to_err)?;
		container.set_id(PLACEHOLDER_VIEW_ID);
		container.set_class_name("coming-soon");

		let parent: web_sys::Node = match self
			.placeholder_parent_id
			.as_deref()
			.and_then(|id| self.document.get_element_by_id(id))
		{
			Some(parent) => parent.into(),
			None => self
				.document
				.body()
				.ok_or_else(|| MountError::ViewHost("No body element".to_string()))?
				.into(),
		};
		parent.append_child(&container).map_err(to_err)?;

		container
			.dyn_into::<web_sys::HtmlElement>()
			.map_err(|_| MountError::ViewHost("Placeholder is not an HTML element".to_string()))
	}
}

#[cfg(target_arch = "wasm32")]
impl ViewHost for DomViewHost {
	fn hide_all_views(&self) -> Result<(), MountError> {
		for element in self.elements("[id$='-view']")? {
			element.set_hidden(true);
		}
		Ok(())
	}

	fn show_view(&self, component_id: &str) -> Result<bool, MountError> {
		match self.html_element_by_id(&view_id(component_id)) {
			Some(element) => {
				element.set_hidden(false);
				Ok(true)
			}
			None => Ok(false),
		}
	}

	fn set_active_nav(&self, component_id: &str) -> Result<(), MountError> {
		let to_err = |e: wasm_bindgen::JsValue| MountError::ViewHost(format!("{:?}", e));
		for element in self.elements("[id^='nav-']")? {
			element.class_list().remove_1(ACTIVE_CLASS).map_err(to_err)?;
		}
		if let Some(marker) = self.document.get_element_by_id(&nav_id(component_id)) {
			marker.class_list().add_1(ACTIVE_CLASS).map_err(to_err)?;
		}
		Ok(())
	}

	fn show_placeholder(&self, _component_id: &str, title: &str) -> Result<(), MountError> {
		let container = self.placeholder_container()?;
		container.set_text_content(Some(&placeholder_text(title)));
		container.set_hidden(false);
		Ok(())
	}

	fn set_title(&self, title: &str) {
		self.document.set_title(title);
	}
}
