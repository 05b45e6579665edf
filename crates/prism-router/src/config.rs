//! Router configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration:
//!
//! ```
//! use prism_router::config::{RouterConfig, UnauthenticatedPolicy};
//!
//! let config = RouterConfig::from_json(r#"{"unauthenticated_policy": "redirect_to_login"}"#).unwrap();
//! assert_eq!(config.unauthenticated_policy, UnauthenticatedPolicy::RedirectToLogin);
//! assert_eq!(config.login_path, "/login");
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default path of the login page.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Default path of the not-found page.
pub const DEFAULT_NOT_FOUND_PATH: &str = "/404";

/// Default prefix of the document title.
pub const DEFAULT_TITLE_PREFIX: &str = "Prism DNS";

/// Default history state key holding the remembered target of a login redirect.
pub const DEFAULT_REDIRECT_STATE_KEY: &str = "redirect";

/// Default `localStorage` key of the bearer token.
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "access_token";

/// What the resolver does when a protected route is requested without a
/// valid session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthenticatedPolicy {
	/// Log a warning and show the route anyway.
	#[default]
	Warn,
	/// Remember the requested path and replace the navigation with the login page.
	RedirectToLogin,
}

/// Router settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// Behaviour for protected routes without a session.
	pub unauthenticated_policy: UnauthenticatedPolicy,
	/// Path the `redirect_to_login` policy navigates to.
	pub login_path: String,
	/// Path of the route shown for unknown paths and failed mounts.
	pub not_found_path: String,
	/// Prefix of every document title (`"{prefix} - {title}"`).
	pub title_prefix: String,
	/// History state key used to remember the intended path on redirect.
	pub redirect_state_key: String,
	/// `localStorage` key read by the browser credential store.
	pub token_storage_key: String,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			unauthenticated_policy: UnauthenticatedPolicy::default(),
			login_path: DEFAULT_LOGIN_PATH.to_string(),
			not_found_path: DEFAULT_NOT_FOUND_PATH.to_string(),
			title_prefix: DEFAULT_TITLE_PREFIX.to_string(),
			redirect_state_key: DEFAULT_REDIRECT_STATE_KEY.to_string(),
			token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
		}
	}
}

impl RouterConfig {
	/// Parses and validates a JSON configuration document.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self =
			serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	/// Sets the unauthenticated policy.
	pub fn with_policy(mut self, policy: UnauthenticatedPolicy) -> Self {
		self.unauthenticated_policy = policy;
		self
	}

	/// Sets the title prefix.
	pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.title_prefix = prefix.into();
		self
	}

	/// Checks that configured paths are absolute in-application paths.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (field, value) in [
			("login_path", &self.login_path),
			("not_found_path", &self.not_found_path),
		] {
			if !value.starts_with('/') {
				return Err(ConfigError::RelativePath {
					field,
					value: value.clone(),
				});
			}
		}
		Ok(())
	}

	/// Formats the document title for a page title.
	pub fn format_title(&self, title: &str) -> String {
		if self.title_prefix.is_empty() {
			title.to_string()
		} else {
			format!("{} - {}", self.title_prefix, title)
		}
	}
}
