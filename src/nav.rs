//! Host navigation contract and an in-process page stack.

// self
use crate::_prelude::*;

/// Read-only view of the host's navigation stack.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Route names of the open pages, oldest first.
	fn pages(&self) -> Vec<String>;

	/// Route name of the top-most page, if any.
	fn current_route(&self) -> Option<String> {
		self.pages().pop()
	}
}

/// Thread-safe page stack for hosts that track navigation themselves, and for tests.
#[derive(Debug, Default)]
pub struct PageStack(RwLock<Vec<String>>);
impl PageStack {
	/// Creates a stack holding `routes`, oldest first.
	pub fn new<I, S>(routes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(RwLock::new(routes.into_iter().map(Into::into).collect()))
	}

	/// Opens a new page on top of the stack.
	pub fn push(&self, route: impl Into<String>) {
		self.0.write().push(route.into());
	}

	/// Closes the top-most page and returns its route.
	pub fn pop(&self) -> Option<String> {
		self.0.write().pop()
	}

	/// Replaces the top-most page, or opens one when the stack is empty.
	pub fn replace(&self, route: impl Into<String>) {
		let mut pages = self.0.write();

		pages.pop();
		pages.push(route.into());
	}

	/// Closes every page and opens `route` as the only one.
	pub fn relaunch(&self, route: impl Into<String>) {
		let mut pages = self.0.write();

		pages.clear();
		pages.push(route.into());
	}
}
impl Navigator for PageStack {
	fn pages(&self) -> Vec<String> {
		self.0.read().clone()
	}

	fn current_route(&self) -> Option<String> {
		self.0.read().last().cloned()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn current_route_tracks_top_of_stack() {
		let stack = PageStack::new(["pages/index/index"]);

		assert_eq!(stack.current_route().as_deref(), Some("pages/index/index"));

		stack.push("pages/user/profile");

		assert_eq!(stack.current_route().as_deref(), Some("pages/user/profile"));
		assert_eq!(stack.pages().len(), 2);

		stack.replace("pages/user/settings");

		assert_eq!(stack.current_route().as_deref(), Some("pages/user/settings"));
		assert_eq!(stack.pop().as_deref(), Some("pages/user/settings"));

		stack.relaunch("pages/login/login");

		assert_eq!(stack.pages(), vec!["pages/login/login".to_owned()]);
	}

	#[test]
	fn default_navigator_method_reads_last_page() {
		struct Fixed;
		impl Navigator for Fixed {
			fn pages(&self) -> Vec<String> {
				vec!["pages/a".into(), "pages/b".into()]
			}
		}

		assert_eq!(Fixed.current_route().as_deref(), Some("pages/b"));
		assert_eq!(PageStack::default().current_route(), None);
	}
}
