//! Prism Router - client-side navigation for the Prism DNS dashboard
//!
//! A small single-page-application router built directly on wasm-bindgen,
//! web-sys and js-sys. It intercepts in-app link clicks, guards protected
//! pages behind a bearer token check, swaps page controllers and keeps the
//! browser history consistent with what is on screen.
//!
//! ## Modules
//!
//! - [`router`]: route table, resolver, hooks, lifecycle and browser adapters
//! - [`auth`]: credential stores and bearer token expiry inspection
//! - [`config`]: [`RouterConfig`] and the unauthenticated-access policy
//! - [`error`]: error types
//! - [`logging`]: console/tracing logging macros
//!
//! ## Targets
//!
//! Browser adapters ([`router::BrowserHistory`], `DomViewHost`,
//! [`auth::LocalStorageCredentials`]) only do real work on `wasm32`. Every
//! adapter has an in-memory counterpart, so the full state machine runs and
//! is tested on the host target.

#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod router;

pub use auth::{CredentialStore, LocalStorageCredentials, MemoryCredentials, TokenInspector};
pub use config::{RouterConfig, UnauthenticatedPolicy};
pub use error::{ConfigError, HistoryError, HookError, MountError, RouterError};
pub use router::{
	HistoryState, HookOutcome, NavigationState, PageController, PageTitles, Resolution, Route,
	Router,
};
