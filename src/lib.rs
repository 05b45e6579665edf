//! # Prism
//!
//! Browser front end for the Prism DNS management dashboard.
//!
//! The core is a client-side router that intercepts in-app links, guards
//! protected pages behind a bearer token check, mounts one page controller
//! at a time and keeps browser history consistent with the visible view.
//!
//! ## Feature Flags
//!
//! - `dashboard` (default) - Prism DNS routes, controllers and WASM entry point
//! - `debug-routing` - Router debug logging (debug builds only)
//!
//! ## Crates
//!
//! - [`router`]: `prism-router`, the routing core
//! - `dashboard`: `prism-dashboard`, the application wiring

#![warn(missing_docs)]

pub mod router;

#[cfg(feature = "dashboard")]
pub mod dashboard;

/// Commonly used types
pub mod prelude {
	pub use crate::router::auth::{CredentialStore, MemoryCredentials, TokenInspector};
	pub use crate::router::config::{RouterConfig, UnauthenticatedPolicy};
	pub use crate::router::error::{HookError, MountError, RouterError};
	pub use crate::router::router::{
		ComponentRegistry, HistoryBackend, HistoryState, HookOutcome, MemoryHistory,
		MemoryViewHost, PageController, PageTitles, Resolution, Route, Router, ViewHost,
		classify_link,
	};

	#[cfg(feature = "dashboard")]
	pub use crate::dashboard::{RouterEnv, build_router, prism_routes, prism_titles};
}
