//! Browser tests for the DOM view host and the link interceptor
//!
//! Run with `wasm-pack test --headless --chrome crates/prism-router`.

#![cfg(target_arch = "wasm32")]

use prism_router::router::{
	ACTIVE_CLASS, DomViewHost, HistoryBackend, HistoryState, ListenerHandle, MemoryHistory,
	PLACEHOLDER_VIEW_ID, Route, Router, ViewHost, install_link_interceptor,
};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
	web_sys::window().unwrap().document().unwrap()
}

fn element(id: &str) -> HtmlElement {
	document()
		.get_element_by_id(id)
		.unwrap()
		.dyn_into::<HtmlElement>()
		.unwrap()
}

/// Replaces the body with the dashboard skeleton.
fn setup_dom() {
	let body = document().body().unwrap();
	body.set_inner_html(
		r#"
		<nav>
			<a id="nav-login" href="/login">Login</a>
			<a id="nav-zones" href="/zones" class="active">Zones</a>
		</nav>
		<main id="main">
			<section id="login-view" hidden></section>
			<section id="zones-view"></section>
			<section id="404-view" hidden></section>
		</main>
		"#,
	);
}

#[wasm_bindgen_test]
fn test_show_view_hides_the_others() {
	setup_dom();
	let host = DomViewHost::new().unwrap();

	host.hide_all_views().unwrap();
	assert!(host.show_view("login").unwrap());

	assert!(!element("login-view").hidden());
	assert!(element("zones-view").hidden());
	assert!(element("404-view").hidden());
}

#[wasm_bindgen_test]
fn test_missing_view_reports_false() {
	setup_dom();
	let host = DomViewHost::new().unwrap();

	assert!(!host.show_view("billing").unwrap());
}

#[wasm_bindgen_test]
fn test_active_nav_is_exclusive() {
	setup_dom();
	let host = DomViewHost::new().unwrap();

	host.set_active_nav("login").unwrap();

	assert!(element("nav-login").class_list().contains(ACTIVE_CLASS));
	assert!(!element("nav-zones").class_list().contains(ACTIVE_CLASS));
}

#[wasm_bindgen_test]
fn test_placeholder_created_once_and_hidden_by_next_mount() {
	setup_dom();
	let host = DomViewHost::new().unwrap().with_placeholder_parent("main");

	host.hide_all_views().unwrap();
	host.show_placeholder("hosts", "Hosts").unwrap();
	host.show_placeholder("clients", "Clients").unwrap();

	let placeholders = document()
		.query_selector_all(&format!("#{}", PLACEHOLDER_VIEW_ID))
		.unwrap();
	assert_eq!(placeholders.length(), 1);

	let placeholder = element(PLACEHOLDER_VIEW_ID);
	assert_eq!(placeholder.text_content(), Some("Clients is coming soon".to_string()));
	assert!(!placeholder.hidden());

	host.hide_all_views().unwrap();
	assert!(element(PLACEHOLDER_VIEW_ID).hidden());
}

#[wasm_bindgen_test]
fn test_set_title() {
	let host = DomViewHost::new().unwrap();
	host.set_title("Prism DNS - Login");
	assert_eq!(document().title(), "Prism DNS - Login");
}

#[wasm_bindgen_test]
async fn test_router_drives_the_document() {
	setup_dom();
	let router = Router::builder()
		.route(Route::new("/login", "login"))
		.route(Route::protected("/zones", "zones"))
		.route(Route::new("/404", "404"))
		.history(MemoryHistory::new("/zones"))
		.views(DomViewHost::new().unwrap())
		.component("login", || {
			Ok(Box::new(NoopController) as Box<dyn prism_router::PageController>)
		})
		.build()
		.unwrap();

	let resolution = router.navigate("/login", HistoryState::new()).await.unwrap();

	assert!(resolution.is_mounted());
	assert!(!element("login-view").hidden());
	assert!(element("zones-view").hidden());
	assert!(element("nav-login").class_list().contains(ACTIVE_CLASS));
}

struct NoopController;

impl prism_router::PageController for NoopController {}

// ============================================================================
// Link interceptor
// ============================================================================

fn setup_links() {
	let body = document().body().unwrap();
	body.set_inner_html(
		r#"
		<nav>
			<a id="nav-login" href="/login">Login</a>
			<a id="nav-zones" href="/zones"><span><b id="zones-icon">Z</b></span></a>
		</nav>
		<main id="main">
			<section id="login-view"></section>
			<section id="zones-view" hidden></section>
			<section id="404-view" hidden></section>
			<a id="external-link" href="https://example.com"><span id="external-label">Example</span></a>
			<a id="export-link" href="/exports/zones.csv" download>Export</a>
			<p id="plain-text">No link here</p>
		</main>
		"#,
	);
}

fn link_router(history: MemoryHistory) -> Rc<Router> {
	Rc::new(
		Router::builder()
			.route(Route::new("/login", "login"))
			.route(Route::new("/zones", "zones"))
			.route(Route::new("/404", "404"))
			.history(history)
			.views(DomViewHost::new().unwrap())
			.build()
			.unwrap(),
	)
}

/// Records whether the clicks reaching the document were prevented, then
/// cancels them so the test page never navigates.
fn record_clicks() -> (Rc<Cell<Option<bool>>>, ListenerHandle) {
	let prevented = Rc::new(Cell::new(None));
	let seen = prevented.clone();
	let handle = ListenerHandle::attach(document().into(), "click", move |event| {
		seen.set(Some(event.default_prevented()));
		event.prevent_default();
	})
	.unwrap();
	(prevented, handle)
}

fn click(id: &str) {
	let init = web_sys::MouseEventInit::new();
	init.set_bubbles(true);
	init.set_cancelable(true);
	let event = web_sys::MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
	document()
		.get_element_by_id(id)
		.unwrap()
		.dispatch_event(&event)
		.unwrap();
}

/// Lets tasks spawned by the interceptor run to completion.
async fn settle() {
	for _ in 0..3 {
		wasm_bindgen_futures::JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL))
			.await
			.unwrap();
	}
}

#[wasm_bindgen_test]
async fn test_click_inside_in_app_link_navigates() {
	setup_links();
	let history = MemoryHistory::new("/login");
	let router = link_router(history.clone());
	let _interceptor = install_link_interceptor(router.clone()).unwrap();
	let (prevented, _recorder) = record_clicks();

	click("zones-icon");
	settle().await;

	assert_eq!(prevented.get(), Some(true));
	assert_eq!(router.current_route(), Some(Route::new("/zones", "zones")));
	assert_eq!(history.current_path(), "/zones");
	assert!(!element("zones-view").hidden());
	assert!(element("login-view").hidden());
}

#[wasm_bindgen_test]
async fn test_external_link_is_left_to_the_browser() {
	setup_links();
	let history = MemoryHistory::new("/login");
	let router = link_router(history.clone());
	let _interceptor = install_link_interceptor(router.clone()).unwrap();
	let (prevented, _recorder) = record_clicks();

	click("external-label");
	settle().await;

	assert_eq!(prevented.get(), Some(false));
	assert!(router.current_route().is_none());
	assert_eq!(history.current_path(), "/login");
	assert_eq!(history.len(), 1);
}

#[wasm_bindgen_test]
async fn test_download_link_is_left_to_the_browser() {
	setup_links();
	let history = MemoryHistory::new("/login");
	let router = link_router(history.clone());
	let _interceptor = install_link_interceptor(router.clone()).unwrap();
	let (prevented, _recorder) = record_clicks();

	click("export-link");
	settle().await;

	assert_eq!(prevented.get(), Some(false));
	assert!(router.current_route().is_none());
	assert_eq!(history.len(), 1);
}

#[wasm_bindgen_test]
async fn test_click_outside_links_is_ignored() {
	setup_links();
	let history = MemoryHistory::new("/login");
	let router = link_router(history.clone());
	let _interceptor = install_link_interceptor(router.clone()).unwrap();
	let (prevented, _recorder) = record_clicks();

	click("plain-text");
	settle().await;

	assert_eq!(prevented.get(), Some(false));
	assert!(router.current_route().is_none());
	assert_eq!(history.len(), 1);
}

#[wasm_bindgen_test]
async fn test_dropped_interceptor_stops_routing() {
	setup_links();
	let history = MemoryHistory::new("/login");
	let router = link_router(history.clone());
	drop(install_link_interceptor(router.clone()).unwrap());
	let (prevented, _recorder) = record_clicks();

	click("zones-icon");
	settle().await;

	assert_eq!(prevented.get(), Some(false));
	assert!(router.current_route().is_none());
}
