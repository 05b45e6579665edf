//! Link interception.
//!
//! A single `click` listener on the document decides, for the nearest enclosing
//! `<a>`, whether the browser should follow the link natively or the router
//! should take over. The decision is made by [`classify_link`]:
//!
//! | href / attribute | Action |
//! |------------------|--------|
//! | missing or empty | pass through |
//! | `download` attribute | pass through |
//! | `#section` | pass through |
//! | `mailto:` | pass through |
//! | `https://host/…`, `//host/…` | pass through |
//! | `/zones`, `/zones?page=2` | intercept, `navigate` with the href verbatim |
//! | anything else (`zones`, `tel:…`) | pass through |

#[cfg(target_arch = "wasm32")]
use super::core::Router;
#[cfg(target_arch = "wasm32")]
use super::history::HistoryState;
#[cfg(target_arch = "wasm32")]
use super::listener::ListenerHandle;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

/// Why a link is left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
	/// No href, or an empty one.
	Empty,
	/// The link carries a `download` attribute.
	Download,
	/// In-page anchor.
	Fragment,
	/// `mailto:` URI.
	Mailto,
	/// Absolute URL with a scheme, or protocol-relative URL.
	External,
	/// Relative path or another URI scheme.
	NotAbsolutePath,
}

/// What to do with an activated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
	/// Let the browser handle the activation unmodified.
	PassThrough(PassThroughReason),
	/// Suppress native navigation and route to the path.
	Intercept(String),
}

impl LinkAction {
	/// Returns true if the router takes over.
	pub fn is_intercepted(&self) -> bool {
		matches!(self, Self::Intercept(_))
	}
}

/// Returns true if `href` starts with a URI scheme followed by `://`.
fn has_authority_scheme(href: &str) -> bool {
	let Some((scheme, _)) = href.split_once("://") else {
		return false;
	};
	let mut chars = scheme.chars();
	chars.next().is_some_and(|c| c.is_ascii_alphabetic())
		&& chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Decides how a link activation is handled.
pub fn classify_link(href: Option<&str>, download: bool) -> LinkAction {
	let href = match href.map(str::trim) {
		None | Some("") => return LinkAction::PassThrough(PassThroughReason::Empty),
		Some(href) => href,
	};

	if download {
		return LinkAction::PassThrough(PassThroughReason::Download);
	}
	if href.starts_with('#') {
		return LinkAction::PassThrough(PassThroughReason::Fragment);
	}
	if href
		.get(..7)
		.is_some_and(|prefix| prefix.eq_ignore_ascii_case("mailto:"))
	{
		return LinkAction::PassThrough(PassThroughReason::Mailto);
	}
	if href.starts_with("//") || has_authority_scheme(href) {
		return LinkAction::PassThrough(PassThroughReason::External);
	}
	if href.starts_with('/') {
		return LinkAction::Intercept(href.to_string());
	}

	LinkAction::PassThrough(PassThroughReason::NotAbsolutePath)
}

/// Installs the document-wide click listener that forwards in-app links to
/// `router`.
#[cfg(target_arch = "wasm32")]
pub fn install_link_interceptor(
	router: Rc<Router>,
) -> Result<ListenerHandle, wasm_bindgen::JsValue> {
	use wasm_bindgen::JsCast;
	use web_sys::Element;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| wasm_bindgen::JsValue::from_str("No document object"))?;

	ListenerHandle::attach(document.into(), "click", move |event| {
		let Some(element) = event
			.target()
			.and_then(|target| target.dyn_into::<Element>().ok())
		else {
			return;
		};
		let Ok(Some(link)) = element.closest("a") else {
			return;
		};

		let href = link.get_attribute("href");
		let action = classify_link(href.as_deref(), link.has_attribute("download"));
		if let LinkAction::Intercept(path) = action {
			event.prevent_default();
			let router = router.clone();
			wasm_bindgen_futures::spawn_local(async move {
				router.navigate(&path, HistoryState::new()).await;
			});
		}
	})
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn absolute_urls_never_intercepted(host in "[a-z]{1,12}\\.[a-z]{2,4}", path in "[a-z/]{0,16}") {
			let href = format!("https://{}/{}", host, path);
			prop_assert!(!classify_link(Some(&href), false).is_intercepted());
		}

		#[test]
		fn in_app_paths_always_intercepted(path in "/[a-z0-9-]{0,24}") {
			prop_assert_eq!(classify_link(Some(&path), false), LinkAction::Intercept(path.clone()));
		}

		#[test]
		fn downloads_never_intercepted(path in "/[a-z0-9./-]{0,24}") {
			prop_assert!(!classify_link(Some(&path), true).is_intercepted());
		}
	}
}
