//! Session gating for protected routes.
//!
//! The router only needs to know whether a bearer token is present and not
//! yet expired. The token is never verified here: signature checks happen on
//! the server for every API call, and the expiry claim is read as-is.
//!
//! ## Token format
//!
//! Three dot-separated segments. The second segment is base64url encoded JSON
//! which may carry a numeric `exp` claim (seconds since the Unix epoch).
//!
//! ## Usage
//!
//! ```
//! use prism_router::auth::{MemoryCredentials, TokenInspector};
//! use std::rc::Rc;
//!
//! let store = Rc::new(MemoryCredentials::new());
//! let inspector = TokenInspector::new(store.clone());
//! assert!(!inspector.is_authenticated());
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Source of the current bearer token.
pub trait CredentialStore {
	/// Returns the current bearer token, if any.
	fn bearer_token(&self) -> Option<String>;
}

/// In-memory credential store for native builds and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentials {
	token: Rc<RefCell<Option<String>>>,
}

impl MemoryCredentials {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store holding `token`.
	pub fn with_token(token: impl Into<String>) -> Self {
		let store = Self::new();
		store.set_token(token);
		store
	}

	/// Replaces the stored token.
	pub fn set_token(&self, token: impl Into<String>) {
		*self.token.borrow_mut() = Some(token.into());
	}

	/// Removes the stored token.
	pub fn clear(&self) {
		*self.token.borrow_mut() = None;
	}
}

impl CredentialStore for MemoryCredentials {
	fn bearer_token(&self) -> Option<String> {
		self.token.borrow().clone()
	}
}

/// Credential store backed by `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorageCredentials {
	key: String,
}

impl LocalStorageCredentials {
	/// Reads the token stored under `key`.
	pub fn new(key: impl Into<String>) -> Self {
		Self { key: key.into() }
	}

	/// Returns the storage key.
	pub fn key(&self) -> &str {
		&self.key
	}
}

impl CredentialStore for LocalStorageCredentials {
	#[cfg(target_arch = "wasm32")]
	fn bearer_token(&self) -> Option<String> {
		let storage = web_sys::window()?.local_storage().ok()??;
		storage
			.get_item(&self.key)
			.ok()
			.flatten()
			.filter(|token| !token.is_empty())
	}

	/// Non-WASM stub: there is no browser storage to read.
	#[cfg(not(target_arch = "wasm32"))]
	fn bearer_token(&self) -> Option<String> {
		None
	}
}

#[derive(Debug, Deserialize)]
struct Claims {
	#[serde(default)]
	exp: Option<f64>,
}

/// Expiry state of a decoded token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenExpiry {
	/// The payload has no `exp` claim.
	Never,
	/// The payload expires at the given Unix timestamp (seconds).
	At(f64),
}

/// Reads the expiry claim of `token`.
///
/// Returns `None` if the token is structurally invalid: not exactly three
/// segments, a payload that is not base64url, or a payload that is not a JSON
/// object with an optional numeric `exp`.
///
/// A non-numeric `exp` such as `"tomorrow"` is treated like any other
/// malformed payload, so the token counts as expired rather than as never
/// expiring. An explicit `"exp": null` reads as no claim.
pub fn decode_expiry(token: &str) -> Option<TokenExpiry> {
	let mut segments = token.split('.');
	let (Some(_header), Some(payload), Some(_signature), None) = (
		segments.next(),
		segments.next(),
		segments.next(),
		segments.next(),
	) else {
		return None;
	};

	let bytes = URL_SAFE_NO_PAD
		.decode(payload.trim_end_matches('='))
		.ok()?;
	let claims: Claims = serde_json::from_slice(&bytes).ok()?;

	Some(match claims.exp {
		Some(exp) => TokenExpiry::At(exp),
		None => TokenExpiry::Never,
	})
}

/// Returns the current wall-clock time in seconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_secs() -> f64 {
	js_sys::Date::now() / 1000.0
}

/// Returns the current wall-clock time in seconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_secs() -> f64 {
	chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Decides whether the current session may see protected routes.
#[derive(Clone)]
pub struct TokenInspector {
	store: Rc<dyn CredentialStore>,
}

impl std::fmt::Debug for TokenInspector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenInspector")
			.field("has_token", &self.store.bearer_token().is_some())
			.finish()
	}
}

impl TokenInspector {
	/// Creates an inspector reading from `store`.
	pub fn new(store: Rc<dyn CredentialStore>) -> Self {
		Self { store }
	}

	/// Returns true if a token is present and unexpired right now.
	pub fn is_authenticated(&self) -> bool {
		self.is_authenticated_at(now_secs())
	}

	/// Returns true if a token is present and unexpired at `now` (seconds).
	///
	/// A token is expired once `now` reaches its `exp`. Undecodable tokens
	/// count as expired.
	pub fn is_authenticated_at(&self, now: f64) -> bool {
		let Some(token) = self.store.bearer_token() else {
			return false;
		};
		match decode_expiry(&token) {
			Some(TokenExpiry::Never) => true,
			Some(TokenExpiry::At(exp)) => now < exp,
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	const NOW: f64 = 1_700_000_000.0;

	fn token_with_payload(payload: &str) -> String {
		format!(
			"{}.{}.signature",
			URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
			URL_SAFE_NO_PAD.encode(payload)
		)
	}

	#[fixture]
	fn store() -> MemoryCredentials {
		MemoryCredentials::new()
	}

	fn inspector(store: &MemoryCredentials) -> TokenInspector {
		TokenInspector::new(Rc::new(store.clone()))
	}

	#[rstest]
	fn test_absent_token_is_unauthenticated(store: MemoryCredentials) {
		assert!(!inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	#[case("onlyone")]
	#[case("two.segments")]
	#[case("")]
	fn test_too_few_segments(store: MemoryCredentials, #[case] token: &str) {
		store.set_token(token);
		assert!(!inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	fn test_too_many_segments(store: MemoryCredentials) {
		let token = format!("{}.extra", token_with_payload(r#"{"sub":"1"}"#));
		store.set_token(token);
		assert!(!inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	#[case("not json")]
	#[case("42")]
	#[case(r#"{"exp": "tomorrow"}"#)]
	fn test_invalid_payload(store: MemoryCredentials, #[case] payload: &str) {
		store.set_token(token_with_payload(payload));
		assert!(!inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	fn test_invalid_base64(store: MemoryCredentials) {
		store.set_token("header.%%%not-base64%%%.sig");
		assert!(!inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	fn test_expired_token(store: MemoryCredentials) {
		store.set_token(token_with_payload(&format!(r#"{{"exp": {}}}"#, NOW - 60.0)));
		assert!(!inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	fn test_token_expiring_exactly_now_is_expired(store: MemoryCredentials) {
		store.set_token(token_with_payload(&format!(r#"{{"exp": {}}}"#, NOW)));
		assert!(!inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	fn test_future_token(store: MemoryCredentials) {
		store.set_token(token_with_payload(&format!(
			r#"{{"sub": "42", "exp": {}}}"#,
			NOW + 3600.0
		)));
		assert!(inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	fn test_token_without_exp_never_expires(store: MemoryCredentials) {
		store.set_token(token_with_payload(r#"{"sub": "42"}"#));
		assert!(inspector(&store).is_authenticated_at(f64::MAX));
	}

	#[rstest]
	fn test_padded_payload_is_accepted(store: MemoryCredentials) {
		let padded = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"4"}"#);
		assert!(padded.ends_with('='));
		store.set_token(format!("h.{}.s", padded));
		assert!(inspector(&store).is_authenticated_at(NOW));
	}

	#[rstest]
	fn test_logout_revokes_access(store: MemoryCredentials) {
		store.set_token(token_with_payload(r#"{"sub": "42"}"#));
		let inspector = inspector(&store);
		assert!(inspector.is_authenticated_at(NOW));

		store.clear();
		assert!(!inspector.is_authenticated_at(NOW));
	}

	#[rstest]
	fn test_real_clock_against_far_future_token(store: MemoryCredentials) {
		store.set_token(token_with_payload(r#"{"exp": 32503680000}"#));
		assert!(inspector(&store).is_authenticated());
	}

	#[rstest]
	fn test_decode_expiry() {
		assert_eq!(
			decode_expiry(&token_with_payload(r#"{"exp": 10}"#)),
			Some(TokenExpiry::At(10.0))
		);
		assert_eq!(
			decode_expiry(&token_with_payload("{}")),
			Some(TokenExpiry::Never)
		);
		assert_eq!(decode_expiry("a.b"), None);
		assert_eq!(decode_expiry(&token_with_payload(r#"{"exp": "tomorrow"}"#)), None);
		assert_eq!(
			decode_expiry(&token_with_payload(r#"{"exp": null}"#)),
			Some(TokenExpiry::Never)
		);
	}

	#[rstest]
	fn test_local_storage_stub_has_no_token() {
		let store = LocalStorageCredentials::new("access_token");
		assert_eq!(store.key(), "access_token");
		assert!(store.bearer_token().is_none());
	}
}
