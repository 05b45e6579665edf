//! Client-side routing for the Prism DNS dashboard.
//!
//! The router maps exact paths to page components, enforces protection on
//! routes that need a session, and keeps browser history in step with the
//! mounted view.
//!
//! ## Components
//!
//! - [`RouteTable`]: exact path lookup with a not-found fallback
//! - [`HookPipeline`]: ordered before/after navigation hooks
//! - [`Router`]: the resolution state machine
//! - [`LifecycleManager`]: mounts one page controller at a time
//! - [`classify_link`]: decides which link clicks the router takes over
//! - [`HistoryBackend`] / [`ViewHost`]: browser seams with in-memory twins
//!
//! ## Example
//!
//! ```
//! use futures::executor::block_on;
//! use prism_router::router::{HistoryState, MemoryViewHost, Route, Router};
//!
//! let views = MemoryViewHost::with_views(["login", "404"]);
//! let router = Router::builder()
//!     .route(Route::new("/login", "login"))
//!     .route(Route::new("/404", "404"))
//!     .views(views.clone())
//!     .build()
//!     .unwrap();
//!
//! block_on(router.navigate("/login", HistoryState::new()));
//! assert_eq!(views.visible_views(), vec!["login-view"]);
//! ```

mod core;
mod history;
mod hooks;
mod interceptor;
mod lifecycle;
#[cfg(target_arch = "wasm32")]
mod listener;
mod route;
mod titles;
mod view;

#[cfg(target_arch = "wasm32")]
pub use self::core::install_popstate_listener;
pub use self::core::{NavigationState, Resolution, ResolverState, Router, RouterBuilder};
pub use history::{BrowserHistory, HistoryBackend, HistoryEntry, HistoryState, MemoryHistory};
pub use hooks::{AfterHook, BeforeHook, BeforeOutcome, HookOutcome, HookPipeline};
#[cfg(target_arch = "wasm32")]
pub use interceptor::install_link_interceptor;
pub use interceptor::{LinkAction, PassThroughReason, classify_link};
pub use lifecycle::{
	ComponentRegistry, ControllerFactory, LifecycleManager, MountedComponent, PageController,
};
#[cfg(target_arch = "wasm32")]
pub use listener::ListenerHandle;
pub use route::{Route, RouteTable, path_only};
pub use titles::PageTitles;
#[cfg(target_arch = "wasm32")]
pub use view::DomViewHost;
pub use view::{
	ACTIVE_CLASS, MemoryViewHost, PLACEHOLDER_VIEW_ID, ViewHost, nav_id, placeholder_text, view_id,
};
