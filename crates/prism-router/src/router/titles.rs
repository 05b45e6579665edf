//! Static page titles.

use std::collections::HashMap;

/// Maps component ids to human readable page titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTitles {
	titles: HashMap<String, String>,
}

impl PageTitles {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a title.
	pub fn with(mut self, component_id: impl Into<String>, title: impl Into<String>) -> Self {
		self.titles.insert(component_id.into(), title.into());
		self
	}

	/// Returns the title of a component, or the id itself if none is known.
	pub fn title_for<'a>(&'a self, component_id: &'a str) -> &'a str {
		self.titles
			.get(component_id)
			.map(String::as_str)
			.unwrap_or(component_id)
	}
}

impl<K, V> FromIterator<(K, V)> for PageTitles
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			titles: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}
