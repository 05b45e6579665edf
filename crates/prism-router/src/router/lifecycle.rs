//! Page controller lifecycle.
//!
//! At most one controller is alive at a time. Mounting a component always
//! tears the previous controller down first, then swaps the visible view and
//! only then constructs the new controller.

use super::view::ViewHost;
use crate::error::MountError;
use crate::{debug_log, info_log};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Behaviour attached to a mounted view.
pub trait PageController {
	/// Releases resources held by the controller. Called exactly once, before
	/// the next controller is constructed.
	fn teardown(&mut self) {}
}

/// Constructs a controller for a component.
pub type ControllerFactory = Rc<dyn Fn() -> Result<Box<dyn PageController>, MountError>>;

/// Maps component ids to controller factories.
///
/// Built once at startup. Ids without a factory render the placeholder.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
	factories: BTreeMap<String, ControllerFactory>,
}

impl std::fmt::Debug for ComponentRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ComponentRegistry")
			.field("ids", &self.ids())
			.finish()
	}
}

impl ComponentRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a factory, replacing any previous one for the id.
	pub fn register<F>(&mut self, component_id: impl Into<String>, factory: F) -> &mut Self
	where
		F: Fn() -> Result<Box<dyn PageController>, MountError> + 'static,
	{
		self.factories.insert(component_id.into(), Rc::new(factory));
		self
	}

	/// Builder form of [`register`](Self::register).
	pub fn with<F>(mut self, component_id: impl Into<String>, factory: F) -> Self
	where
		F: Fn() -> Result<Box<dyn PageController>, MountError> + 'static,
	{
		self.register(component_id, factory);
		self
	}

	/// Returns true if a factory is registered for the id.
	pub fn contains(&self, component_id: &str) -> bool {
		self.factories.contains_key(component_id)
	}

	/// Returns the registered ids in sorted order.
	pub fn ids(&self) -> Vec<&str> {
		self.factories.keys().map(String::as_str).collect()
	}

	/// Returns the number of registered factories.
	pub fn len(&self) -> usize {
		self.factories.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}

	fn factory(&self, component_id: &str) -> Option<ControllerFactory> {
		self.factories.get(component_id).cloned()
	}
}

/// The component currently on screen.
pub struct MountedComponent {
	component_id: String,
	handle: Option<Box<dyn PageController>>,
}

impl MountedComponent {
	/// Returns the component id.
	pub fn component_id(&self) -> &str {
		&self.component_id
	}

	/// Returns true if a controller is attached (false for the placeholder).
	pub fn has_controller(&self) -> bool {
		self.handle.is_some()
	}

	fn teardown(mut self) {
		if let Some(mut handle) = self.handle.take() {
			handle.teardown();
			debug_log!("Tore down controller '{}'", self.component_id);
		}
	}
}

impl std::fmt::Debug for MountedComponent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MountedComponent")
			.field("component_id", &self.component_id)
			.field("has_controller", &self.has_controller())
			.finish()
	}
}

/// Owns the mounted component and swaps it on navigation.
#[derive(Debug, Default)]
pub struct LifecycleManager {
	registry: ComponentRegistry,
	mounted: RefCell<Option<MountedComponent>>,
}

impl LifecycleManager {
	/// Creates a manager over `registry`.
	pub fn new(registry: ComponentRegistry) -> Self {
		Self {
			registry,
			mounted: RefCell::new(None),
		}
	}

	/// Returns the registry.
	pub fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}

	/// Returns the id of the mounted component.
	pub fn mounted_id(&self) -> Option<String> {
		self.mounted
			.borrow()
			.as_ref()
			.map(|m| m.component_id.clone())
	}

	/// Returns true if a live controller is attached.
	pub fn has_controller(&self) -> bool {
		self.mounted
			.borrow()
			.as_ref()
			.is_some_and(MountedComponent::has_controller)
	}

	/// Mounts `component_id`.
	///
	/// Unregistered ids show the placeholder titled `title`. On error nothing
	/// is mounted and the previous controller is already gone.
	pub fn mount(
		&self,
		component_id: &str,
		title: &str,
		host: &dyn ViewHost,
	) -> Result<(), MountError> {
		self.unmount();

		host.hide_all_views()?;
		host.set_active_nav(component_id)?;

		let handle = match self.registry.factory(component_id) {
			Some(factory) => {
				if !host.show_view(component_id)? {
					debug_log!("No container for '{}'", component_id);
				}
				Some(factory()?)
			}
			None => {
				host.show_placeholder(component_id, title)?;
				info_log!("No controller for '{}', showing placeholder", component_id);
				None
			}
		};

		*self.mounted.borrow_mut() = Some(MountedComponent {
			component_id: component_id.to_string(),
			handle,
		});
		Ok(())
	}

	/// Tears down the mounted controller, if any.
	pub fn unmount(&self) {
		let previous = self.mounted.borrow_mut().take();
		if let Some(previous) = previous {
			previous.teardown();
		}
	}
}
