use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;

use crate::action::{Action, ActionRef};
use crate::error::PipelineError;
use crate::request::Request;

/// Asked before leaving a route; returning `false` blocks the navigation
/// until [`Pipeline::confirm`] resolves it.
///
/// [`Pipeline::confirm`]: crate::Pipeline::confirm
pub type LeaveGuard = Rc<dyn Fn(&ActionRef) -> LocalBoxFuture<'static, bool>>;

/// A route lifecycle callback (`thunk`, `on_complete`, `on_error`).
pub type RouteCallback = Rc<dyn Fn(&Request) -> LocalBoxFuture<'static, ()>>;

/// One route descriptor: a fixed-shape record, not a duck-typed bag.
///
/// A route with a `path` is navigable; dispatching its action proposes a
/// history change. Pathless routes participate in the pipeline (thunks,
/// callbacks) without navigating.
#[derive(Default)]
pub struct Route {
    path: Option<String>,
    // slot is removable so `confirm` can temporarily lift the guard
    pub(crate) before_leave: RefCell<Option<LeaveGuard>>,
    pub(crate) thunk: Option<RouteCallback>,
    pub(crate) on_complete: Option<RouteCallback>,
    pub(crate) on_error: Option<RouteCallback>,
}

impl Route {
    /// A navigable route writing `path` to the address on commit.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// A route that participates in dispatch without navigating.
    pub fn pathless() -> Self {
        Self::default()
    }

    /// The address this route commits to, when navigable.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Whether dispatching this route changes the location.
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        self.path.is_some()
    }

    #[must_use]
    pub fn with_leave_guard(
        self,
        guard: impl Fn(&ActionRef) -> LocalBoxFuture<'static, bool> + 'static,
    ) -> Self {
        *self.before_leave.borrow_mut() = Some(Rc::new(guard));
        self
    }

    #[must_use]
    pub fn with_thunk(
        mut self,
        thunk: impl Fn(&Request) -> LocalBoxFuture<'static, ()> + 'static,
    ) -> Self {
        self.thunk = Some(Rc::new(thunk));
        self
    }

    #[must_use]
    pub fn with_on_complete(
        mut self,
        callback: impl Fn(&Request) -> LocalBoxFuture<'static, ()> + 'static,
    ) -> Self {
        self.on_complete = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn with_on_error(
        mut self,
        callback: impl Fn(&Request) -> LocalBoxFuture<'static, ()> + 'static,
    ) -> Self {
        self.on_error = Some(Rc::new(callback));
        self
    }

    pub(crate) fn leave_guard(&self) -> Option<LeaveGuard> {
        self.before_leave.borrow().clone()
    }
}

/// The route table: maps action names to [`Route`] descriptors. Absence of an
/// entry means "not a navigable action".
pub struct Routes {
    map: HashMap<String, Rc<Route>>,
    empty: Rc<Route>,
}

impl Routes {
    /// Build a route table. At least one route must be registered.
    pub fn new(
        routes: impl IntoIterator<Item = (impl Into<String>, Route)>,
    ) -> Result<Self, PipelineError> {
        let map: HashMap<_, _> = routes
            .into_iter()
            .map(|(name, route)| (name.into(), Rc::new(route)))
            .collect();
        if map.is_empty() {
            return Err(PipelineError::EmptyRoutes);
        }
        Ok(Self {
            map,
            empty: Rc::new(Route::pathless()),
        })
    }

    /// The route registered under `name`, or the inert empty route.
    #[must_use]
    pub fn get(&self, name: &str) -> Rc<Route> {
        self.map.get(name).cloned().unwrap_or_else(|| self.empty.clone())
    }

    pub(crate) fn lookup(&self, action: &Action) -> Rc<Route> {
        match action.name() {
            Some(name) => self.get(name),
            None => self.empty.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tables_are_rejected() {
        let routes: Vec<(String, Route)> = Vec::new();
        assert!(matches!(Routes::new(routes), Err(PipelineError::EmptyRoutes)));
    }

    #[test]
    fn unknown_names_resolve_to_an_inert_route() {
        let routes = Routes::new([("home", Route::with_path("/"))]).unwrap();
        assert!(routes.get("home").is_navigable());
        assert!(!routes.get("missing").is_navigable());
    }
}
