//! Process-wide session state.
//!
//! The session is initialised once at start-up and shared through a
//! [`SessionContext`]. Route guards and the API client read it from there
//! rather than each looking up credentials on its own.

pub mod guard;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

pub use guard::{Access, Guard, RouteTable};

/// Environment variables the session is read from.
pub const TOKEN_VAR: &str = "KART_LEAGUE_TOKEN";
pub const ROLE_VAR: &str = "KART_LEAGUE_ROLE";
pub const FIRST_NAME_VAR: &str = "KART_LEAGUE_FIRST_NAME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    /// Case-insensitive; anything other than "admin" is a regular user.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("admin") {
            Ok(Role::Admin)
        } else {
            Ok(Role::User)
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub role: Role,
    pub first_name: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(token: impl Into<String>, role: Role, first_name: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            role,
            first_name,
        }
    }

    /// Build a session from a variable lookup (normally the process environment).
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            token: get(TOKEN_VAR),
            role: get(ROLE_VAR)
                .map(|r| r.parse().unwrap_or_default())
                .unwrap_or_default(),
            first_name: get(FIRST_NAME_VAR),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.role == Role::Admin
    }

    /// Where a signed-in user lands.
    pub fn home_path(&self) -> &'static str {
        match self.role {
            Role::Admin => "/admin",
            Role::User => "/dashboard",
        }
    }

    /// Greeting name for headers.
    pub fn display_name(&self) -> &str {
        match self.first_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if self.role == Role::Admin => "Admin",
            _ => "Guest",
        }
    }
}

/// Shared, observable handle to the current session.
#[derive(Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<Session>>,
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Receive every subsequent session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    pub fn sign_in(&self, token: impl Into<String>, role: Role, first_name: Option<String>) {
        let session = Session::signed_in(token, role, first_name);
        info!("Signed in as {} ({})", session.display_name(), session.role);
        self.tx.send_replace(session);
    }

    pub fn sign_out(&self) {
        info!("Signed out");
        self.tx.send_replace(Session::anonymous());
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(Session::anonymous())
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.tx.borrow();
        f.debug_struct("SessionContext")
            .field("authenticated", &session.is_authenticated())
            .field("role", &session.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert_eq!("parent".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn test_session_from_lookup() {
        let session = Session::from_lookup(lookup(&[
            (TOKEN_VAR, "tok"),
            (ROLE_VAR, "admin"),
            (FIRST_NAME_VAR, "Dana"),
        ]));

        assert_eq!(session.token.as_deref(), Some("tok"));
        assert!(session.is_admin());
        assert_eq!(session.display_name(), "Dana");
        assert_eq!(session.home_path(), "/admin");
    }

    #[test]
    fn test_session_from_empty_lookup() {
        let session = Session::from_lookup(lookup(&[(TOKEN_VAR, "  ")]));

        assert!(!session.is_authenticated());
        assert_eq!(session.role, Role::User);
        assert_eq!(session.home_path(), "/dashboard");
        assert_eq!(session.display_name(), "Guest");
    }

    #[test]
    fn test_role_without_token_is_not_admin() {
        let session = Session::from_lookup(lookup(&[(ROLE_VAR, "ADMIN")]));
        assert!(!session.is_admin());
        assert_eq!(session.display_name(), "Admin");
    }

    #[tokio::test]
    async fn test_context_sign_in_and_out_notifies() {
        let ctx = SessionContext::default();
        let mut rx = ctx.subscribe();

        ctx.sign_in("tok", Role::User, Some("Sam".to_string()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().first_name.as_deref(), Some("Sam"));
        assert!(ctx.current().is_authenticated());

        ctx.sign_out();
        rx.changed().await.unwrap();
        assert!(!rx.borrow().is_authenticated());
        assert_eq!(ctx.current(), Session::anonymous());
    }

    #[test]
    fn test_context_clones_share_state() {
        let ctx = SessionContext::default();
        let other = ctx.clone();

        ctx.sign_in("tok", Role::Admin, None);
        assert!(other.current().is_admin());
    }
}
