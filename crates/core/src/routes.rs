//! Route metadata consulted by the navigation guard

use serde::{Deserialize, Serialize};

/// Destination for unauthenticated (or freshly signed-out) visitors
pub const LOGIN_PATH: &str = "/login";

/// Console landing page
pub const ADMIN_HOME_PATH: &str = "/manager/home";

/// Fallback page for unknown paths
pub const NOT_FOUND_PATH: &str = "/404";

/// One navigable destination and its access requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub requires_admin: bool,
}

impl Route {
    /// Route anyone may visit
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
            requires_admin: false,
        }
    }

    /// Route requiring a signed-in session
    pub fn authenticated(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: true,
            requires_admin: false,
        }
    }

    /// Route requiring an administrator session
    pub fn admin(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: true,
            requires_admin: true,
        }
    }
}

/// The set of navigable routes
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Route table of the admin console
    pub fn console() -> Self {
        Self::new(vec![
            Route::public(LOGIN_PATH),
            Route::public(NOT_FOUND_PATH),
            Route::authenticated(ADMIN_HOME_PATH),
            Route::authenticated("/manager/data"),
            Route::admin("/manager/employee"),
            Route::admin("/manager/employee-form"),
        ])
    }

    /// Resolve a path to its route
    ///
    /// `/` resolves to the console home; a path with no registered route
    /// falls back to the 404 page. `None` only when the fallback itself is
    /// not registered.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let target = if path == "/" { ADMIN_HOME_PATH } else { path };
        self.find(target).or_else(|| self.find(NOT_FOUND_PATH))
    }

    fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.path == path)
    }
}
