//! Route definitions and the static route table.
//!
//! Matching is exact on the path portion: a query string or fragment is
//! ignored, but there are no prefixes, no parameters and no trailing-slash
//! normalization. Hierarchical views (zones inside zones) are handled by the
//! page controllers themselves.

use crate::error::RouterError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single route definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
	/// The exact path this route answers to.
	path: String,
	/// Identifier of the page controller and view container.
	component_id: String,
	/// Whether an authenticated session is required.
	protected: bool,
}

impl Route {
	/// Creates a public route.
	pub fn new(path: impl Into<String>, component_id: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			component_id: component_id.into(),
			protected: false,
		}
	}

	/// Creates a route that requires a session.
	pub fn protected(path: impl Into<String>, component_id: impl Into<String>) -> Self {
		Self::new(path, component_id).with_protection(true)
	}

	/// Sets the protection flag.
	pub fn with_protection(mut self, protected: bool) -> Self {
		self.protected = protected;
		self
	}

	/// Returns the path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the component identifier.
	pub fn component_id(&self) -> &str {
		&self.component_id
	}

	/// Returns true if the route requires a session.
	pub fn is_protected(&self) -> bool {
		self.protected
	}
}

/// Strips the query string and fragment from `path`.
pub fn path_only(path: &str) -> &str {
	path.split(['?', '#']).next().unwrap_or(path)
}

/// The static path-to-route mapping, fixed at startup.
#[derive(Debug, Clone)]
pub struct RouteTable {
	/// Routes in declaration order.
	routes: Vec<Route>,
	/// Path to index into `routes`.
	index: HashMap<String, usize>,
	/// Index of the not-found route.
	not_found: usize,
}

impl RouteTable {
	/// Builds a table from `routes`, designating `not_found_path` as the
	/// fallback for unknown paths.
	pub fn new(
		routes: impl IntoIterator<Item = Route>,
		not_found_path: &str,
	) -> Result<Self, RouterError> {
		let routes: Vec<Route> = routes.into_iter().collect();
		let mut index = HashMap::with_capacity(routes.len());

		for (i, route) in routes.iter().enumerate() {
			if index.insert(route.path.clone(), i).is_some() {
				return Err(RouterError::DuplicateRoute(route.path.clone()));
			}
		}

		let not_found = *index
			.get(not_found_path)
			.ok_or_else(|| RouterError::MissingNotFound(not_found_path.to_string()))?;

		Ok(Self {
			routes,
			index,
			not_found,
		})
	}

	/// Returns the route for `path`, or the not-found route.
	///
	/// Anything from the first `?` or `#` on is ignored.
	pub fn lookup(&self, path: &str) -> &Route {
		let i = self
			.index
			.get(path_only(path))
			.copied()
			.unwrap_or(self.not_found);
		&self.routes[i]
	}

	/// Returns true if `path` has its own entry.
	pub fn contains(&self, path: &str) -> bool {
		self.index.contains_key(path)
	}

	/// Returns the not-found route.
	pub fn not_found(&self) -> &Route {
		&self.routes[self.not_found]
	}

	/// Returns the routes in declaration order.
	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	/// Returns the number of routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns true if the table has no routes. Never true for a built table.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn table() -> RouteTable {
		RouteTable::new(
			[
				Route::protected("/", "dashboard"),
				Route::new("/login", "login"),
				Route::protected("/zones", "zones"),
				Route::new("/404", "404"),
			],
			"/404",
		)
		.unwrap()
	}

	#[rstest]
	fn test_route_new() {
		let route = Route::new("/login", "login");
		assert_eq!(route.path(), "/login");
		assert_eq!(route.component_id(), "login");
		assert!(!route.is_protected());
	}

	#[rstest]
	fn test_route_protected() {
		assert!(Route::protected("/zones", "zones").is_protected());
		assert!(!Route::protected("/zones", "zones").with_protection(false).is_protected());
	}

	#[rstest]
	#[case("/", "dashboard")]
	#[case("/login", "login")]
	#[case("/zones", "zones")]
	#[case("/404", "404")]
	fn test_lookup_exact(table: RouteTable, #[case] path: &str, #[case] component: &str) {
		let route = table.lookup(path);
		assert_eq!(route.path(), path);
		assert_eq!(route.component_id(), component);
	}

	#[rstest]
	#[case("/unknown-path")]
	#[case("/zones/")]
	#[case("/zones/example.com")]
	#[case("/LOGIN")]
	#[case("")]
	fn test_lookup_falls_back_to_not_found(table: RouteTable, #[case] path: &str) {
		assert_eq!(table.lookup(path).component_id(), "404");
		assert!(!table.contains(path));
	}

	#[rstest]
	#[case("/reset-password?token=abc", "/reset-password")]
	#[case("/zones#records", "/zones")]
	#[case("/zones?page=2#records", "/zones")]
	#[case("/?next=/zones", "/")]
	#[case("/zones", "/zones")]
	fn test_path_only(#[case] path: &str, #[case] expected: &str) {
		assert_eq!(path_only(path), expected);
	}

	#[rstest]
	#[case("/zones?page=2", "zones")]
	#[case("/login#form", "login")]
	#[case("/nowhere?x=1", "404")]
	fn test_lookup_ignores_query_and_fragment(
		table: RouteTable,
		#[case] path: &str,
		#[case] component: &str,
	) {
		assert_eq!(table.lookup(path).component_id(), component);
	}

	#[rstest]
	fn test_duplicate_route_rejected() {
		let result = RouteTable::new(
			[
				Route::new("/login", "login"),
				Route::new("/login", "signin"),
				Route::new("/404", "404"),
			],
			"/404",
		);
		assert_eq!(
			result.unwrap_err(),
			RouterError::DuplicateRoute("/login".to_string())
		);
	}

	#[rstest]
	fn test_missing_not_found_rejected() {
		let result = RouteTable::new([Route::new("/login", "login")], "/404");
		assert_eq!(
			result.unwrap_err(),
			RouterError::MissingNotFound("/404".to_string())
		);
	}

	#[rstest]
	fn test_routes_keep_declaration_order(table: RouteTable) {
		let paths: Vec<&str> = table.routes().iter().map(Route::path).collect();
		assert_eq!(paths, vec!["/", "/login", "/zones", "/404"]);
		assert_eq!(table.len(), 4);
		assert!(!table.is_empty());
		assert_eq!(table.not_found().path(), "/404");
	}
}
