//! Client-side router
//!
//! This module provides access to prism-router: route table, resolver,
//! navigation hooks, component lifecycle and the browser adapters.
//!
//! ## Example
//!
//! ```rust
//! use futures::executor::block_on;
//! use prism::router::router::{HistoryState, Route, Router};
//!
//! let router = Router::builder()
//!     .route(Route::new("/login", "login"))
//!     .route(Route::new("/404", "404"))
//!     .build()
//!     .unwrap();
//!
//! let resolution = block_on(router.navigate("/nowhere", HistoryState::new())).unwrap();
//! assert_eq!(resolution.route().map(|r| r.component_id()), Some("404"));
//! ```

// Re-export all prism-router functionality
pub use prism_router::*;
