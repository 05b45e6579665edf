//! Error types for router construction and navigation.
//!
//! Construction errors (bad route tables, bad configuration) are returned to
//! the caller. Navigation errors never leave the resolver: they are logged and
//! folded into a [`Resolution`](crate::router::Resolution).

use thiserror::Error;

/// Errors raised while building or driving the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// Two routes were declared for the same path.
	#[error("Duplicate route: {0}")]
	DuplicateRoute(String),

	/// The designated not-found path has no route.
	#[error("Not-found route missing from table: {0}")]
	MissingNotFound(String),

	/// A before- or after-hook failed.
	#[error("Hook failed: {0}")]
	Hook(#[from] HookError),

	/// A page controller could not be mounted.
	#[error("Mount failed: {0}")]
	Mount(#[from] MountError),

	/// The history backend rejected an operation.
	#[error("History error: {0}")]
	History(#[from] HistoryError),

	/// Invalid configuration.
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),
}

/// Failure reported by a navigation hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
	/// Human readable reason.
	pub message: String,
}

impl HookError {
	/// Creates a hook error with the given message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Failure while constructing or revealing a page controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
	/// The controller factory returned an error.
	#[error("Controller '{component_id}' failed to initialize: {reason}")]
	Initialization {
		/// Component being mounted.
		component_id: String,
		/// Reason reported by the factory.
		reason: String,
	},

	/// The view host could not update the document.
	#[error("View host error: {0}")]
	ViewHost(String),
}

impl MountError {
	/// Shorthand for an initialization failure.
	pub fn initialization(component_id: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Initialization {
			component_id: component_id.into(),
			reason: reason.into(),
		}
	}
}

/// Failure reported by a history backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	/// No `window` (or no `history`) object is available.
	#[error("History API unavailable: {0}")]
	Unavailable(String),

	/// The state bag could not be converted for the browser.
	#[error("Invalid history state: {0}")]
	InvalidState(String),

	/// The browser rejected the push or replace call.
	#[error("Navigation failed: {0}")]
	NavigationFailed(String),
}

/// Failure while loading a [`RouterConfig`](crate::config::RouterConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// The configuration document is not valid JSON for the schema.
	#[error("Invalid router configuration: {0}")]
	Parse(String),

	/// A configured path does not start with `/`.
	#[error("Configured path must be absolute: {field} = {value:?}")]
	RelativePath {
		/// Offending field name.
		field: &'static str,
		/// Offending value.
		value: String,
	},
}
