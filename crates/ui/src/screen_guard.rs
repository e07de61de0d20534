use dioxus::prelude::*;
use dioxus_router::Navigator;

use crate::routes::Route;

/// Navigation out of the current screen that a page with unsaved work gets to veto.
///
/// The layout owns one guard. While a page marks itself dirty, chrome links hand their
/// destination to the page instead of navigating, and the page decides after its exit prompt.
#[derive(Clone, Copy, PartialEq)]
pub struct ScreenGuard {
    dirty: Signal<bool>,
    held: Signal<Option<Route>>,
}

impl ScreenGuard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dirty: Signal::new(false),
            held: Signal::new(None),
        }
    }

    pub fn set_dirty(self, dirty: bool) {
        let mut flag = self.dirty;
        if *flag.peek() != dirty {
            flag.set(dirty);
        }
    }

    #[must_use]
    pub fn is_dirty(self) -> bool {
        *self.dirty.peek()
    }

    /// Navigate to `route`, or hand it to the dirty page.
    pub fn leave(self, navigator: Navigator, route: Route) {
        if self.is_dirty() {
            let mut held = self.held;
            held.set(Some(route));
            return;
        }
        navigator.push(route);
    }

    /// Take the destination a chrome link handed over. Subscribes the caller.
    pub fn take_held(self) -> Option<Route> {
        let mut held = self.held;
        if held.read().is_none() {
            return None;
        }
        held.write().take()
    }
}

impl Default for ScreenGuard {
    fn default() -> Self {
        Self::new()
    }
}
