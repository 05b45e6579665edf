//! Core Router Implementation.
//!
//! [`Router`] owns the current route and the mounted component and runs the
//! resolution state machine:
//!
//! ```text
//! Idle -> Resolving -> (Mounted | Redirected | Aborted | Failed | Superseded) -> Idle
//! ```
//!
//! Each resolution takes a generation number when it starts and records it as
//! the committed generation when it sets the current route. After every await
//! point a resolution that sees a newer committed generation stops with
//! [`Resolution::Superseded`] without touching state. A newer navigation that
//! is stopped or fails before committing supersedes nothing.
//!
//! Paths may carry a query string or fragment (`/reset-password?token=…`).
//! They are kept verbatim in history and in [`NavigationState::path`]; route
//! lookup only uses the part before `?` or `#`.

use super::history::{HistoryBackend, HistoryState, MemoryHistory};
use super::hooks::{BeforeOutcome, HookOutcome, HookPipeline};
use super::lifecycle::{ComponentRegistry, LifecycleManager, PageController};
use super::route::{Route, RouteTable};
use super::titles::PageTitles;
use super::view::{MemoryViewHost, ViewHost};
use crate::auth::{CredentialStore, MemoryCredentials, TokenInspector};
use crate::config::{RouterConfig, UnauthenticatedPolicy};
use crate::error::{HookError, MountError, RouterError};
use crate::{debug_log, error_log, info_log, warn_log};
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

/// A single navigation attempt that reached the mount step.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
	/// Requested path.
	pub path: String,
	/// State bag carried by the history entry.
	pub history_state: HistoryState,
	/// Route the path resolved to.
	pub route: Route,
}

/// Whether a resolution is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
	/// No resolution is running.
	Idle,
	/// At least one resolution is awaiting hooks.
	Resolving,
}

/// Terminal outcome of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
	/// The route was committed and its component mounted.
	Mounted(NavigationState),
	/// The route required a session; the login page was resolved instead.
	Redirected {
		/// Path originally requested.
		from: String,
		/// Login path that replaced it.
		to: String,
	},
	/// A before-hook signalled stop.
	Aborted,
	/// A newer navigation started before this one finished.
	Superseded,
	/// The navigation could not be completed.
	Failed(RouterError),
}

impl Resolution {
	/// Returns true for [`Resolution::Mounted`].
	pub fn is_mounted(&self) -> bool {
		matches!(self, Self::Mounted(_))
	}

	/// Returns the mounted route, if any.
	pub fn route(&self) -> Option<&Route> {
		match self {
			Self::Mounted(nav) => Some(&nav.route),
			_ => None,
		}
	}
}

/// Decrements the in-flight counter when a resolution ends, however it ends.
struct InFlight<'a>(&'a Cell<u32>);

impl<'a> InFlight<'a> {
	fn enter(counter: &'a Cell<u32>) -> Self {
		counter.set(counter.get() + 1);
		Self(counter)
	}
}

impl Drop for InFlight<'_> {
	fn drop(&mut self) {
		self.0.set(self.0.get().saturating_sub(1));
	}
}

/// The client-side router.
///
/// Meant to live behind an `Rc` shared by the link interceptor and the
/// popstate listener.
pub struct Router {
	table: RouteTable,
	hooks: RefCell<HookPipeline>,
	tokens: TokenInspector,
	history: Rc<dyn HistoryBackend>,
	views: Rc<dyn ViewHost>,
	lifecycle: LifecycleManager,
	titles: PageTitles,
	config: RouterConfig,
	current: RefCell<Option<Route>>,
	intended: RefCell<Option<String>>,
	generation: Cell<u64>,
	committed: Cell<u64>,
	in_flight: Cell<u32>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("routes", &self.table.len())
			.field("hooks", &*self.hooks.borrow())
			.field("current", &*self.current.borrow())
			.field("generation", &self.generation.get())
			.field("committed", &self.committed.get())
			.finish()
	}
}

impl Router {
	/// Starts building a router.
	pub fn builder() -> RouterBuilder {
		RouterBuilder::default()
	}

	/// Returns the route table.
	pub fn table(&self) -> &RouteTable {
		&self.table
	}

	/// Returns the configuration.
	pub fn config(&self) -> &RouterConfig {
		&self.config
	}

	/// Returns the route currently displayed.
	pub fn current_route(&self) -> Option<Route> {
		self.current.borrow().clone()
	}

	/// Returns the id of the mounted component.
	pub fn mounted_component(&self) -> Option<String> {
		self.lifecycle.mounted_id()
	}

	/// Returns whether a resolution is running.
	pub fn state(&self) -> ResolverState {
		if self.in_flight.get() > 0 {
			ResolverState::Resolving
		} else {
			ResolverState::Idle
		}
	}

	/// Returns the path remembered by the last login redirect.
	pub fn intended_path(&self) -> Option<String> {
		self.intended.borrow().clone()
	}

	/// Returns and forgets the path remembered by the last login redirect.
	pub fn take_intended_path(&self) -> Option<String> {
		self.intended.borrow_mut().take()
	}

	/// Returns true if the current session holds an unexpired token.
	pub fn is_authenticated(&self) -> bool {
		self.tokens.is_authenticated()
	}

	/// Appends an async before-hook. Takes effect from the next resolution.
	pub fn register_before<F, Fut>(&self, hook: F)
	where
		F: Fn(Route, String) -> Fut + 'static,
		Fut: Future<Output = Result<HookOutcome, HookError>> + 'static,
	{
		self.hooks.borrow_mut().register_before(hook);
	}

	/// Appends a synchronous before-hook returning `true` to continue.
	pub fn register_before_fn<F>(&self, hook: F)
	where
		F: Fn(&Route, &str) -> bool + 'static,
	{
		self.hooks.borrow_mut().register_before_fn(hook);
	}

	/// Appends an async after-hook. Takes effect from the next resolution.
	pub fn register_after<F, Fut>(&self, hook: F)
	where
		F: Fn(Route, String) -> Fut + 'static,
		Fut: Future<Output = Result<(), HookError>> + 'static,
	{
		self.hooks.borrow_mut().register_after(hook);
	}

	/// Appends a synchronous after-hook.
	pub fn register_after_fn<F>(&self, hook: F)
	where
		F: Fn(&Route, &str) + 'static,
	{
		self.hooks.borrow_mut().register_after_fn(hook);
	}

	/// Pushes `path` onto the history and resolves it.
	///
	/// Returns `None` without touching history when `path` is already the
	/// current location.
	pub async fn navigate(&self, path: &str, state: HistoryState) -> Option<Resolution> {
		if self.history.current_path() == path {
			debug_log!("Already at {}, ignoring navigation", path);
			return None;
		}
		if let Err(e) = self.history.push(path, &state) {
			error_log!("Failed to push {}: {}", path, e);
			return Some(Resolution::Failed(e.into()));
		}
		Some(self.resolve(path, state).await)
	}

	/// Replaces the current history entry with `path` and resolves it.
	pub async fn replace(&self, path: &str, state: HistoryState) -> Resolution {
		if let Err(e) = self.history.replace(path, &state) {
			error_log!("Failed to replace with {}: {}", path, e);
			return Resolution::Failed(e.into());
		}
		self.resolve(path, state).await
	}

	/// Moves one entry back.
	///
	/// Resolution happens when the backend reports the traversal through
	/// [`on_popstate`](Self::on_popstate).
	pub fn back(&self) -> Result<(), RouterError> {
		self.history.back().map_err(RouterError::from)
	}

	/// Resolves the location the history backend now points at.
	pub async fn on_popstate(&self, state: HistoryState) -> Resolution {
		let path = self.history.current_path();
		debug_log!("popstate to {}", path);
		self.resolve(&path, state).await
	}

	/// Resolves `path` without touching history.
	pub fn resolve<'a>(&'a self, path: &'a str, state: HistoryState) -> LocalBoxFuture<'a, Resolution> {
		async move { self.run_resolution(path, state).await }.boxed_local()
	}

	async fn run_resolution(&self, path: &str, state: HistoryState) -> Resolution {
		let generation = self.generation.get() + 1;
		self.generation.set(generation);
		let _in_flight = InFlight::enter(&self.in_flight);
		let before_commit = || self.committed.get() < generation;
		let after_commit = || self.committed.get() == generation;

		let route = self.table.lookup(path).clone();
		let hooks = self.hooks.borrow().clone();
		debug_log!(
			"Resolving {} -> {} (generation {})",
			path,
			route.component_id(),
			generation
		);

		match hooks.run_before(&route, path, &before_commit).await {
			BeforeOutcome::Continue => {}
			BeforeOutcome::Stopped { index } => {
				info_log!("Navigation to {} stopped by before-hook #{}", path, index);
				return Resolution::Aborted;
			}
			BeforeOutcome::Failed { index, error } => {
				error_log!("Before-hook #{} failed for {}: {}", index, path, error);
				return Resolution::Failed(error.into());
			}
			BeforeOutcome::Superseded => {
				debug_log!("Resolution of {} superseded", path);
				return Resolution::Superseded;
			}
		}

		if route.is_protected() && !self.tokens.is_authenticated() {
			match self.config.unauthenticated_policy {
				UnauthenticatedPolicy::Warn => {
					warn_log!("Accessing protected route {} without authentication", path);
				}
				UnauthenticatedPolicy::RedirectToLogin if route.path() != self.config.login_path => {
					return self.redirect_to_login(path).await;
				}
				UnauthenticatedPolicy::RedirectToLogin => {
					warn_log!("Login route {} is protected, showing it anyway", path);
				}
			}
		}

		self.committed.set(generation);
		*self.current.borrow_mut() = Some(route.clone());
		let title = self.titles.title_for(route.component_id());
		if let Err(e) = self
			.lifecycle
			.mount(route.component_id(), title, self.views.as_ref())
		{
			return self
				.recover_from_mount_failure(&route, path, state, e, generation)
				.await;
		}
		info_log!("Mounted {} for {}", route.component_id(), path);

		let (completed, failures) = hooks.run_after(&route, path, &after_commit).await;
		for (index, error) in failures {
			error_log!("After-hook #{} failed for {}: {}", index, path, error);
		}
		if !completed {
			debug_log!("Resolution of {} superseded after mount", path);
			return Resolution::Superseded;
		}

		self.views.set_title(&self.config.format_title(title));

		Resolution::Mounted(NavigationState {
			path: path.to_string(),
			history_state: state,
			route,
		})
	}

	async fn redirect_to_login(&self, path: &str) -> Resolution {
		let login = self.config.login_path.clone();
		*self.intended.borrow_mut() = Some(path.to_string());
		let state = HistoryState::new().with(self.config.redirect_state_key.clone(), path);

		if let Err(e) = self.history.replace(&login, &state) {
			error_log!("Failed to redirect {} to {}: {}", path, login, e);
			return Resolution::Failed(e.into());
		}
		info_log!("Redirecting unauthenticated {} to {}", path, login);

		let resolution = self.resolve(&login, state).await;
		match resolution {
			Resolution::Mounted(_) => Resolution::Redirected {
				from: path.to_string(),
				to: login,
			},
			other => other,
		}
	}

	/// Replaces a component that failed to mount with the not-found page.
	///
	/// The not-found path is resolved through the hooks first. If that
	/// resolution does not mount (a hook stops it, for instance), the
	/// not-found component is mounted directly so the failed view never stays
	/// on screen.
	async fn recover_from_mount_failure(
		&self,
		route: &Route,
		path: &str,
		state: HistoryState,
		error: MountError,
		generation: u64,
	) -> Resolution {
		error_log!("Failed to mount {}: {}", route.component_id(), error);

		let not_found = self.table.not_found().path().to_string();
		if route.path() == not_found {
			error_log!("Not-found route failed to mount, giving up");
			return Resolution::Failed(error.into());
		}

		let fallback = self.resolve(&not_found, state.clone()).await;
		match fallback {
			Resolution::Mounted(_) | Resolution::Failed(RouterError::Mount(_)) => fallback,
			_ if self.committed.get() != generation => Resolution::Superseded,
			other => {
				warn_log!("Not-found fallback ended as {:?}, mounting it directly", other);
				self.mount_not_found(path, state)
			}
		}
	}

	fn mount_not_found(&self, path: &str, state: HistoryState) -> Resolution {
		let route = self.table.not_found().clone();
		*self.current.borrow_mut() = Some(route.clone());
		let title = self.titles.title_for(route.component_id());
		if let Err(e) = self
			.lifecycle
			.mount(route.component_id(), title, self.views.as_ref())
		{
			error_log!("Not-found route failed to mount, giving up");
			return Resolution::Failed(e.into());
		}
		self.views.set_title(&self.config.format_title(title));

		Resolution::Mounted(NavigationState {
			path: path.to_string(),
			history_state: state,
			route,
		})
	}
}

/// Builder for [`Router`].
///
/// Every adapter defaults to its in-memory implementation.
#[derive(Default)]
pub struct RouterBuilder {
	routes: Vec<Route>,
	config: RouterConfig,
	history: Option<Rc<dyn HistoryBackend>>,
	views: Option<Rc<dyn ViewHost>>,
	credentials: Option<Rc<dyn CredentialStore>>,
	components: ComponentRegistry,
	titles: PageTitles,
	hooks: HookPipeline,
}

impl RouterBuilder {
	/// Adds a route.
	pub fn route(mut self, route: Route) -> Self {
		self.routes.push(route);
		self
	}

	/// Adds several routes.
	pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
		self.routes.extend(routes);
		self
	}

	/// Sets the configuration.
	pub fn config(mut self, config: RouterConfig) -> Self {
		self.config = config;
		self
	}

	/// Sets the history backend.
	pub fn history(mut self, history: impl HistoryBackend + 'static) -> Self {
		self.history = Some(Rc::new(history));
		self
	}

	/// Sets the view host.
	pub fn views(mut self, views: impl ViewHost + 'static) -> Self {
		self.views = Some(Rc::new(views));
		self
	}

	/// Sets the credential store read by the token inspector.
	pub fn credentials(mut self, credentials: impl CredentialStore + 'static) -> Self {
		self.credentials = Some(Rc::new(credentials));
		self
	}

	/// Sets the controller registry.
	pub fn components(mut self, components: ComponentRegistry) -> Self {
		self.components = components;
		self
	}

	/// Registers one controller factory.
	pub fn component<F>(mut self, component_id: impl Into<String>, factory: F) -> Self
	where
		F: Fn() -> Result<Box<dyn PageController>, MountError> + 'static,
	{
		self.components.register(component_id, factory);
		self
	}

	/// Sets the page titles.
	pub fn titles(mut self, titles: PageTitles) -> Self {
		self.titles = titles;
		self
	}

	/// Sets the initial hooks.
	pub fn hooks(mut self, hooks: HookPipeline) -> Self {
		self.hooks = hooks;
		self
	}

	/// Validates the configuration and route table and builds the router.
	pub fn build(self) -> Result<Router, RouterError> {
		self.config.validate()?;
		let table = RouteTable::new(self.routes, &self.config.not_found_path)?;
		if !table.contains(&self.config.login_path) {
			warn_log!(
				"Login path {} has no route, redirects will show the not-found page",
				self.config.login_path
			);
		}

		let credentials = self
			.credentials
			.unwrap_or_else(|| Rc::new(MemoryCredentials::new()));

		Ok(Router {
			table,
			hooks: RefCell::new(self.hooks),
			tokens: TokenInspector::new(credentials),
			history: self
				.history
				.unwrap_or_else(|| Rc::new(MemoryHistory::default())),
			views: self
				.views
				.unwrap_or_else(|| Rc::new(MemoryViewHost::new())),
			lifecycle: LifecycleManager::new(self.components),
			titles: self.titles,
			config: self.config,
			current: RefCell::new(None),
			intended: RefCell::new(None),
			generation: Cell::new(0),
			committed: Cell::new(0),
			in_flight: Cell::new(0),
		})
	}
}

/// Installs the `popstate` listener that resolves back/forward traversals.
#[cfg(target_arch = "wasm32")]
pub fn install_popstate_listener(
	router: Rc<Router>,
) -> Result<super::listener::ListenerHandle, wasm_bindgen::JsValue> {
	use wasm_bindgen::JsCast;

	let window = web_sys::window().ok_or_else(|| wasm_bindgen::JsValue::from_str("No window object"))?;

	super::listener::ListenerHandle::attach(window.into(), "popstate", move |event| {
		let state = event
			.dyn_ref::<web_sys::PopStateEvent>()
			.map(|e| HistoryState::from_js(&e.state()))
			.unwrap_or_default();
		let router = router.clone();
		wasm_bindgen_futures::spawn_local(async move {
			router.on_popstate(state).await;
		});
	})
}
