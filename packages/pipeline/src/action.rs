use serde_json::Value;
use waypoint_history::Transition;

/// Default HTTP status attached to coerced redirects.
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// An application action that may resolve to a route.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteAction {
    /// Route-table key.
    pub name: String,
    /// Application payload, opaque to the pipeline.
    pub payload: Value,
    /// Entry state attached to the resulting history entry.
    pub state: Value,
    /// When set, the action is flagged as an error: it still flows to the
    /// dispatch sink, but its navigation side effect is suppressed.
    pub error: Option<String>,
}

impl RouteAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// A route action coerced into a redirect.
#[derive(Clone, Debug, PartialEq)]
pub struct RedirectAction {
    /// The original route action.
    pub action: RouteAction,
    /// Redirect status, [`DEFAULT_REDIRECT_STATUS`] unless overridden.
    pub status: u16,
}

/// A transition produced by the history core, entering the pipeline as an
/// action.
#[derive(Clone, Debug)]
pub struct HistoryUpdate {
    /// The proposed transition; the pipeline holds its commit and revert
    /// handles.
    pub transition: Transition,
}

/// A lightweight description of an action, handed to guards and carried by
/// [`Action::Block`] so a confirmation dialog can describe what it blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRef {
    /// Route-table key, or a placeholder for history-originated actions.
    pub name: String,
    /// Destination URL, when known.
    pub url: Option<String>,
}

/// Everything that can flow through the dispatch pipeline.
#[derive(Clone, Debug)]
pub enum Action {
    /// An application action, navigable when the route table maps its name
    /// to a path.
    Route(RouteAction),
    /// A route action coerced into (or explicitly dispatched as) a redirect.
    Redirect(RedirectAction),
    /// A navigation proposal produced by the history core, e.g. from a
    /// platform pop event.
    HistoryUpdate(HistoryUpdate),
    /// Announces that a navigation was blocked and awaits confirmation.
    Block(ActionRef),
    /// Announces that a blocked navigation was declined.
    Unblock,
}

impl Action {
    /// A plain route action.
    pub fn route(name: impl Into<String>) -> Self {
        Self::Route(RouteAction::new(name))
    }

    /// Wrap a route action as a redirect.
    pub fn redirect(action: RouteAction, status: Option<u16>) -> Self {
        Self::Redirect(RedirectAction {
            action,
            status: status.unwrap_or(DEFAULT_REDIRECT_STATUS),
        })
    }

    /// The route-table key, for actions that carry one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Route(a) => Some(&a.name),
            Self::Redirect(r) => Some(&r.action.name),
            _ => None,
        }
    }

    /// The underlying route action, if any.
    #[must_use]
    pub fn as_route(&self) -> Option<&RouteAction> {
        match self {
            Self::Route(a) => Some(a),
            Self::Redirect(r) => Some(&r.action),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }

    #[must_use]
    pub fn is_from_history(&self) -> bool {
        matches!(self, Self::HistoryUpdate(_))
    }

    /// The error flag, for route actions that carry one.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.as_route().and_then(|a| a.error.as_deref())
    }

    /// Describe this action for guards and block announcements.
    #[must_use]
    pub fn reference(&self) -> ActionRef {
        match self {
            Self::Route(a) => ActionRef {
                name: a.name.clone(),
                url: None,
            },
            Self::Redirect(r) => ActionRef {
                name: r.action.name.clone(),
                url: None,
            },
            Self::HistoryUpdate(h) => ActionRef {
                name: "@@history/update".into(),
                url: Some(h.transition.next.location().url.clone()),
            },
            Self::Block(r) => r.clone(),
            Self::Unblock => ActionRef {
                name: "@@history/unblock".into(),
                url: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_wraps_with_default_status() {
        let action = Action::redirect(RouteAction::new("profile"), None);
        match action {
            Action::Redirect(r) => assert_eq!(r.status, DEFAULT_REDIRECT_STATUS),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn name_is_exposed_through_redirects() {
        let action = Action::redirect(RouteAction::new("profile"), Some(301));
        assert_eq!(action.name(), Some("profile"));
        assert!(action.is_redirect());
    }
}
