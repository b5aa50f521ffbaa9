//! Route guards.
//!
//! Each application route declares a [`Guard`]; resolving a path against the
//! current [`Session`] either grants access or names where to redirect.

use serde::Serialize;

use super::{Role, Session};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Anyone.
    Public,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in admins; other users go to their dashboard.
    Admin,
    /// Signed-in users holding exactly this role.
    Role(Role),
    /// Only visitors who are not signed in (the login page).
    GuestOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "access", content = "to", rename_all = "lowercase")]
pub enum Access {
    Granted,
    Redirect(String),
}

impl Guard {
    pub fn check(&self, session: &Session) -> Access {
        let redirect = |path: &str| Access::Redirect(path.to_string());
        match self {
            Guard::Public => Access::Granted,
            Guard::Authenticated if !session.is_authenticated() => redirect(LOGIN_PATH),
            Guard::Authenticated => Access::Granted,
            Guard::Admin if !session.is_authenticated() => redirect(LOGIN_PATH),
            Guard::Admin if session.role != Role::Admin => redirect(DASHBOARD_PATH),
            Guard::Admin => Access::Granted,
            Guard::Role(role) if !session.is_authenticated() || session.role != *role => {
                redirect(LOGIN_PATH)
            }
            Guard::Role(_) => Access::Granted,
            Guard::GuestOnly if session.is_authenticated() => redirect(session.home_path()),
            Guard::GuestOnly => Access::Granted,
        }
    }
}

/// A routed path prefix and its guard.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub guard: Guard,
}

/// The application's routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Public pages, the parent dashboard and the admin back office.
    pub fn standard() -> Self {
        let route = |path, guard| Route { path, guard };
        Self::new(vec![
            route("/", Guard::Public),
            route("/races", Guard::Public),
            route("/racers", Guard::Public),
            route("/results", Guard::Public),
            route("/gallery", Guard::Public),
            route("/sponsors", Guard::Public),
            route("/about", Guard::Public),
            route("/contact", Guard::Public),
            route("/register", Guard::Public),
            route("/accountregister", Guard::Public),
            route(LOGIN_PATH, Guard::GuestOnly),
            route(DASHBOARD_PATH, Guard::Authenticated),
            route("/admin", Guard::Admin),
        ])
    }

    /// Guard of the longest route matching `path` on a segment boundary.
    /// Unrouted paths are public.
    pub fn guard_for(&self, path: &str) -> Guard {
        self.routes
            .iter()
            .filter(|r| matches_prefix(r.path, path))
            .max_by_key(|r| r.path.len())
            .map(|r| r.guard)
            .unwrap_or(Guard::Public)
    }

    pub fn resolve(&self, path: &str, session: &Session) -> Access {
        self.guard_for(path).check(session)
    }
}

fn matches_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
