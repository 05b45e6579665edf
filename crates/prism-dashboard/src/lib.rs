//! # prism-dashboard
//!
//! The Prism DNS dashboard front end, built on `prism-router`.
//!
//! - [`routes`]: route table and page titles
//! - [`controllers`]: page controllers and their registry
//! - [`app`]: router assembly and the WASM entry point
//!
//! ## Features
//!
//! - `default`: No features enabled by default
//! - `console_error_panic_hook`: Forward Rust panics to the browser console
//! - `debug-routing`: Enable router debug logging

#![warn(missing_docs)]

pub mod app;
pub mod controllers;
pub mod routes;

pub use app::{RouterEnv, build_router, config_from_attribute};
pub use controllers::{ResourceTracker, prism_components, prism_components_with};
pub use routes::{prism_routes, prism_titles};
