//! Prism DNS route table and page titles.
//!
//! | Path | Component | Protected |
//! |------|-----------|-----------|
//! | `/`, `/dashboard` | `dashboard` | yes |
//! | `/login`, `/register`, `/forgot-password`, `/reset-password`, `/verify-email` | same as path | no |
//! | `/profile`, `/zones`, `/clients`, `/hosts` | same as path | yes |
//! | `/404` | `404` | no |

use prism_router::router::{PageTitles, Route};

/// Paths that need a session.
pub const PROTECTED_PATHS: [&str; 6] = ["/", "/dashboard", "/profile", "/zones", "/clients", "/hosts"];

/// Paths reachable without a session.
pub const PUBLIC_PATHS: [&str; 6] = [
	"/login",
	"/register",
	"/forgot-password",
	"/reset-password",
	"/verify-email",
	"/404",
];

/// Maps a path to its component id: `/` is the dashboard, everything else is
/// the path without its leading slash.
pub fn component_for(path: &str) -> &str {
	match path {
		"/" => "dashboard",
		other => other.trim_start_matches('/'),
	}
}

/// Returns the Prism DNS route table.
pub fn prism_routes() -> Vec<Route> {
	let protected = PROTECTED_PATHS
		.iter()
		.map(|path| Route::protected(*path, component_for(path)));
	let public = PUBLIC_PATHS
		.iter()
		.map(|path| Route::new(*path, component_for(path)));
	protected.chain(public).collect()
}

/// Returns the page titles. `clients` and `hosts` have none and fall back to
/// their ids.
pub fn prism_titles() -> PageTitles {
	[
		("dashboard", "Dashboard"),
		("login", "Login"),
		("register", "Register"),
		("forgot-password", "Forgot Password"),
		("reset-password", "Reset Password"),
		("verify-email", "Verify Email"),
		("profile", "Profile"),
		("zones", "DNS Zones"),
		("404", "Page Not Found"),
	]
	.into_iter()
	.collect()
}
