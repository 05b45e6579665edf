//! Router assembly and the WASM entry point.

use crate::controllers::{ResourceTracker, prism_components_with};
use crate::routes::{prism_routes, prism_titles};
use prism_router::auth::CredentialStore;
use prism_router::config::RouterConfig;
use prism_router::error::RouterError;
use prism_router::router::{HistoryBackend, Router, ViewHost};
use prism_router::{error_log, info_log};
use std::rc::Rc;

/// Id of the element carrying the application configuration.
pub const APP_ELEMENT_ID: &str = "app";

/// Attribute of the app element holding the router configuration as JSON.
pub const CONFIG_ATTRIBUTE: &str = "data-router-config";

/// The adapters a router runs against.
#[derive(Debug, Clone)]
pub struct RouterEnv<H, V, C> {
	/// Session history.
	pub history: H,
	/// Document views.
	pub views: V,
	/// Bearer token source.
	pub credentials: C,
	/// Tracker for resources owned by page controllers.
	pub resources: ResourceTracker,
}

/// Reads the router configuration from the app element attribute.
///
/// A missing attribute yields the defaults; an invalid one is logged and also
/// yields the defaults.
pub fn config_from_attribute(value: Option<&str>) -> RouterConfig {
	let Some(json) = value.map(str::trim).filter(|json| !json.is_empty()) else {
		return RouterConfig::default();
	};
	match RouterConfig::from_json(json).and_then(|config| config.validate().map(|()| config)) {
		Ok(config) => config,
		Err(e) => {
			error_log!("Ignoring {}: {}", CONFIG_ATTRIBUTE, e);
			RouterConfig::default()
		}
	}
}

/// Builds the Prism DNS router over `env`.
pub fn build_router<H, V, C>(env: RouterEnv<H, V, C>, config: RouterConfig) -> Result<Rc<Router>, RouterError>
where
	H: HistoryBackend + 'static,
	V: ViewHost + 'static,
	C: CredentialStore + 'static,
{
	let router = Router::builder()
		.routes(prism_routes())
		.titles(prism_titles())
		.components(prism_components_with(&env.resources))
		.config(config)
		.history(env.history)
		.views(env.views)
		.credentials(env.credentials)
		.build()?;
	info_log!(
		"Router ready with {} routes ({:?} policy)",
		router.table().len(),
		router.config().unauthenticated_policy
	);
	Ok(Rc::new(router))
}

/// WASM entry point
///
/// Wires the browser adapters, installs the link interceptor and the popstate
/// listener, then resolves the initial location.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
	use prism_router::auth::LocalStorageCredentials;
	use prism_router::router::{
		BrowserHistory, DomViewHost, HistoryState, install_link_interceptor,
		install_popstate_listener,
	};
	use wasm_bindgen::JsValue;

	// Set up panic hook for better error messages in console
	#[cfg(feature = "console_error_panic_hook")]
	console_error_panic_hook::set_once();

	let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
	let document = window
		.document()
		.ok_or_else(|| JsValue::from_str("No document object"))?;

	let config = config_from_attribute(
		document
			.get_element_by_id(APP_ELEMENT_ID)
			.and_then(|app| app.get_attribute(CONFIG_ATTRIBUTE))
			.as_deref(),
	);

	let views = DomViewHost::new()
		.map_err(|e| JsValue::from_str(&e.to_string()))?
		.with_placeholder_parent(APP_ELEMENT_ID);
	let env = RouterEnv {
		history: BrowserHistory::new(),
		views,
		credentials: LocalStorageCredentials::new(config.token_storage_key.clone()),
		resources: ResourceTracker::new(),
	};
	let router = build_router(env, config).map_err(|e| JsValue::from_str(&e.to_string()))?;

	// Both listeners live as long as the page
	install_link_interceptor(router.clone())?.forget();
	install_popstate_listener(router.clone())?.forget();

	let initial_path = BrowserHistory::new().current_path();
	let initial_state = window
		.history()
		.ok()
		.and_then(|history| history.state().ok())
		.map(|state| HistoryState::from_js(&state))
		.unwrap_or_default();

	wasm_bindgen_futures::spawn_local(async move {
		router.resolve(&initial_path, initial_state).await;
	});

	Ok(())
}
