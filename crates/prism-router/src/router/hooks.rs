//! Before/after navigation hooks.
//!
//! Hooks run strictly in registration order. A before-hook returning
//! [`HookOutcome::Stop`] cancels the navigation and no later before-hook is
//! called. Hooks are async so that a guard may await a remote check; plain
//! closures can be registered with the `*_fn` variants.
//!
//! ```
//! use prism_router::router::{HookOutcome, HookPipeline};
//!
//! let mut hooks = HookPipeline::new();
//! hooks.register_before_fn(|route, _path| route.component_id() != "maintenance");
//! hooks.register_after(|route, _path| async move {
//!     let _ = route.component_id();
//!     Ok::<(), prism_router::error::HookError>(())
//! });
//! assert_eq!(hooks.before_count(), 1);
//! assert_eq!(hooks.after_count(), 1);
//! ```

use super::route::Route;
use crate::error::HookError;
use futures::future::{FutureExt, LocalBoxFuture};
use std::future::Future;
use std::rc::Rc;

/// Signal returned by a before-hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
	/// Keep resolving.
	Continue,
	/// Abort the navigation.
	Stop,
}

impl From<bool> for HookOutcome {
	fn from(proceed: bool) -> Self {
		if proceed { Self::Continue } else { Self::Stop }
	}
}

/// Type alias for before-hook functions.
pub type BeforeHook =
	Rc<dyn Fn(Route, String) -> LocalBoxFuture<'static, Result<HookOutcome, HookError>>>;

/// Type alias for after-hook functions.
pub type AfterHook = Rc<dyn Fn(Route, String) -> LocalBoxFuture<'static, Result<(), HookError>>>;

/// Result of running the before-hooks of one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeforeOutcome {
	/// Every hook signalled continue.
	Continue,
	/// The hook at `index` signalled stop.
	Stopped {
		/// Registration index of the stopping hook.
		index: usize,
	},
	/// The hook at `index` failed.
	Failed {
		/// Registration index of the failing hook.
		index: usize,
		/// The failure.
		error: HookError,
	},
	/// A newer navigation started while a hook was pending.
	Superseded,
}

/// Ordered before/after hook registries.
///
/// Cloning is cheap and yields a snapshot: hooks registered on the original
/// afterwards are not seen by the clone.
#[derive(Clone, Default)]
pub struct HookPipeline {
	before: Vec<BeforeHook>,
	after: Vec<AfterHook>,
}

impl std::fmt::Debug for HookPipeline {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HookPipeline")
			.field("before", &self.before.len())
			.field("after", &self.after.len())
			.finish()
	}
}

impl HookPipeline {
	/// Creates an empty pipeline.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an async before-hook.
	pub fn register_before<F, Fut>(&mut self, hook: F)
	where
		F: Fn(Route, String) -> Fut + 'static,
		Fut: Future<Output = Result<HookOutcome, HookError>> + 'static,
	{
		self.before
			.push(Rc::new(move |route: Route, path: String| hook(route, path).boxed_local()));
	}

	/// Appends a synchronous before-hook returning `true` to continue.
	pub fn register_before_fn<F>(&mut self, hook: F)
	where
		F: Fn(&Route, &str) -> bool + 'static,
	{
		self.before.push(Rc::new(move |route: Route, path: String| {
			let outcome = HookOutcome::from(hook(&route, &path));
			futures::future::ready(Ok::<_, HookError>(outcome)).boxed_local()
		}));
	}

	/// Appends an async after-hook.
	pub fn register_after<F, Fut>(&mut self, hook: F)
	where
		F: Fn(Route, String) -> Fut + 'static,
		Fut: Future<Output = Result<(), HookError>> + 'static,
	{
		self.after
			.push(Rc::new(move |route: Route, path: String| hook(route, path).boxed_local()));
	}

	/// Appends a synchronous after-hook.
	pub fn register_after_fn<F>(&mut self, hook: F)
	where
		F: Fn(&Route, &str) + 'static,
	{
		self.after.push(Rc::new(move |route: Route, path: String| {
			hook(&route, &path);
			futures::future::ready(Ok::<_, HookError>(())).boxed_local()
		}));
	}

	/// Returns the number of before-hooks.
	pub fn before_count(&self) -> usize {
		self.before.len()
	}

	/// Returns the number of after-hooks.
	pub fn after_count(&self) -> usize {
		self.after.len()
	}

	/// Runs the before-hooks in order until one stops or fails.
	///
	/// `is_current` is checked after every hook; once it returns false the
	/// remaining hooks are skipped and [`BeforeOutcome::Superseded`] is
	/// returned.
	pub async fn run_before(
		&self,
		route: &Route,
		path: &str,
		is_current: &dyn Fn() -> bool,
	) -> BeforeOutcome {
		for (index, hook) in self.before.iter().enumerate() {
			let result = hook(route.clone(), path.to_string()).await;
			if !is_current() {
				return BeforeOutcome::Superseded;
			}
			match result {
				Ok(HookOutcome::Continue) => {}
				Ok(HookOutcome::Stop) => return BeforeOutcome::Stopped { index },
				Err(error) => return BeforeOutcome::Failed { index, error },
			}
		}
		BeforeOutcome::Continue
	}

	/// Runs every after-hook in order.
	///
	/// A failing hook does not prevent later hooks from running; failures are
	/// returned with their registration index. Stops early with `false` if
	/// `is_current` turns false.
	pub async fn run_after(
		&self,
		route: &Route,
		path: &str,
		is_current: &dyn Fn() -> bool,
	) -> (bool, Vec<(usize, HookError)>) {
		let mut failures = Vec::new();
		for (index, hook) in self.after.iter().enumerate() {
			if let Err(error) = hook(route.clone(), path.to_string()).await {
				failures.push((index, error));
			}
			if !is_current() {
				return (false, failures);
			}
		}
		(true, failures)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::executor::block_on;
	use rstest::rstest;
	use std::cell::RefCell;

	fn zones() -> Route {
		Route::protected("/zones", "zones")
	}

	fn always_current() -> bool {
		true
	}

	#[rstest]
	fn test_hook_outcome_from_bool() {
		assert_eq!(HookOutcome::from(true), HookOutcome::Continue);
		assert_eq!(HookOutcome::from(false), HookOutcome::Stop);
	}

	#[rstest]
	fn test_before_hooks_run_in_registration_order() {
		let calls = Rc::new(RefCell::new(Vec::new()));
		let mut hooks = HookPipeline::new();
		for name in ["analytics", "title", "guard"] {
			let calls = calls.clone();
			hooks.register_before_fn(move |_, _| {
				calls.borrow_mut().push(name);
				true
			});
		}

		let outcome = block_on(hooks.run_before(&zones(), "/zones", &always_current));

		assert_eq!(outcome, BeforeOutcome::Continue);
		assert_eq!(*calls.borrow(), vec!["analytics", "title", "guard"]);
	}

	#[rstest]
	fn test_stop_short_circuits_remaining_hooks() {
		let calls = Rc::new(RefCell::new(Vec::new()));
		let mut hooks = HookPipeline::new();
		for (name, proceed) in [("first", true), ("stopper", false), ("never", true)] {
			let calls = calls.clone();
			hooks.register_before_fn(move |_, _| {
				calls.borrow_mut().push(name);
				proceed
			});
		}

		let outcome = block_on(hooks.run_before(&zones(), "/zones", &always_current));

		assert_eq!(outcome, BeforeOutcome::Stopped { index: 1 });
		assert_eq!(*calls.borrow(), vec!["first", "stopper"]);
	}

	#[rstest]
	fn test_async_hook_receives_route_and_path() {
		let seen = Rc::new(RefCell::new(None));
		let mut hooks = HookPipeline::new();
		{
			let seen = seen.clone();
			hooks.register_before(move |route, path| {
				let seen = seen.clone();
				async move {
					*seen.borrow_mut() = Some((route.component_id().to_string(), path));
					Ok::<_, HookError>(HookOutcome::Continue)
				}
			});
		}

		block_on(hooks.run_before(&zones(), "/zones", &always_current));

		assert_eq!(
			*seen.borrow(),
			Some(("zones".to_string(), "/zones".to_string()))
		);
	}

	#[rstest]
	fn test_failing_before_hook_stops_pipeline() {
		let mut hooks = HookPipeline::new();
		hooks.register_before(|_, _| async { Err::<HookOutcome, _>(HookError::new("quota service down")) });
		hooks.register_before_fn(|_, _| panic!("must not run"));

		let outcome = block_on(hooks.run_before(&zones(), "/zones", &always_current));

		assert_eq!(
			outcome,
			BeforeOutcome::Failed {
				index: 0,
				error: HookError::new("quota service down"),
			}
		);
	}

	#[rstest]
	fn test_superseded_before_hooks() {
		let mut hooks = HookPipeline::new();
		hooks.register_before_fn(|_, _| true);
		hooks.register_before_fn(|_, _| panic!("must not run"));

		let outcome = block_on(hooks.run_before(&zones(), "/zones", &|| false));

		assert_eq!(outcome, BeforeOutcome::Superseded);
	}

	#[rstest]
	fn test_after_hook_failure_does_not_skip_later_hooks() {
		let calls = Rc::new(RefCell::new(0));
		let mut hooks = HookPipeline::new();
		hooks.register_after(|_, _| async { Err::<(), _>(HookError::new("analytics offline")) });
		{
			let calls = calls.clone();
			hooks.register_after_fn(move |_, _| *calls.borrow_mut() += 1);
		}

		let (completed, failures) = block_on(hooks.run_after(&zones(), "/zones", &always_current));

		assert!(completed);
		assert_eq!(failures, vec![(0, HookError::new("analytics offline"))]);
		assert_eq!(*calls.borrow(), 1);
	}

	#[rstest]
	fn test_clone_is_a_snapshot() {
		let mut hooks = HookPipeline::new();
		hooks.register_before_fn(|_, _| true);
		let snapshot = hooks.clone();
		hooks.register_before_fn(|_, _| false);

		assert_eq!(snapshot.before_count(), 1);
		assert_eq!(hooks.before_count(), 2);
	}
}
