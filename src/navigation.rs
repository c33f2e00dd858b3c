//! Side menu and page routing.
//!
//! Menu filtering here is presentation only; it hides entries a role has no
//! use for but does not guard the pages themselves.

use serde::Serialize;

use crate::session::{SessionSnapshot, UserRole};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/dashboard";

/// Title shown when the current path has no menu entry.
pub const DEFAULT_TITLE: &str = "Racing Team Management";

/// One entry in the side menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    /// Roles allowed to see the entry; `None` means everyone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<&'static [UserRole]>,
}

impl NavItem {
    pub fn visible_to(&self, role: Option<UserRole>) -> bool {
        match (self.roles, role) {
            (None, _) => true,
            (Some(allowed), Some(role)) => allowed.contains(&role),
            (Some(_), None) => false,
        }
    }
}

pub const MENU: &[NavItem] = &[
    NavItem {
        title: "Dashboard",
        path: "/dashboard",
        icon: "dashboard",
        roles: None,
    },
    NavItem {
        title: "Equipos",
        path: "/teams",
        icon: "group",
        roles: Some(&[UserRole::Manager, UserRole::Finance]),
    },
    NavItem {
        title: "Usuarios",
        path: "/users",
        icon: "people",
        roles: Some(&[UserRole::Manager]),
    },
    NavItem {
        title: "Vehículos",
        path: "/vehicles",
        icon: "directions_car",
        roles: None,
    },
    NavItem {
        title: "Eventos",
        path: "/events",
        icon: "event",
        roles: None,
    },
    NavItem {
        title: "Calendario",
        path: "/calendar",
        icon: "calendar_today",
        roles: None,
    },
];

/// Menu entries for `role`, in menu order.
pub fn visible_items(role: Option<UserRole>) -> Vec<NavItem> {
    MENU.iter()
        .filter(|item| item.visible_to(role))
        .copied()
        .collect()
}

/// Header title for the page at `path`.
pub fn page_title(path: &str) -> &'static str {
    MENU.iter()
        .find(|item| item.path == path)
        .map_or(DEFAULT_TITLE, |item| item.title)
}

/// Outcome of routing a requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Route {
    /// Render the page at `path`.
    Render { path: String },
    /// Replace the location with `to`.
    Redirect { to: &'static str },
    /// A login attempt is in flight; show the loading screen instead of any page.
    Loading,
}

/// Decide what to show for `path`.
///
/// Signed-out users only ever see the login page. Signed-in users see any
/// menu page; the root, the login page and unknown paths send them home.
pub fn resolve_route(path: &str, authenticated: bool) -> Route {
    if !authenticated {
        return if path == LOGIN_PATH {
            Route::Render {
                path: LOGIN_PATH.to_string(),
            }
        } else {
            Route::Redirect { to: LOGIN_PATH }
        };
    }

    if MENU.iter().any(|item| item.path == path) {
        Route::Render {
            path: path.to_string(),
        }
    } else {
        Route::Redirect { to: HOME_PATH }
    }
}

/// Route `path` against a session snapshot. While a login attempt is in
/// flight every path shows the loading screen.
pub fn route_for_session(path: &str, session: &SessionSnapshot) -> Route {
    if session.is_loading {
        Route::Loading
    } else {
        resolve_route(path, session.is_authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[NavItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.path).collect()
    }

    #[test]
    fn test_manager_sees_everything() {
        assert_eq!(visible_items(Some(UserRole::Manager)).len(), MENU.len());
    }

    #[test]
    fn test_finance_sees_teams_but_not_users() {
        let items = paths(&visible_items(Some(UserRole::Finance)));
        assert!(items.contains(&"/teams"));
        assert!(!items.contains(&"/users"));
    }

    #[test]
    fn test_unrestricted_items_for_other_roles() {
        let expected = vec!["/dashboard", "/vehicles", "/events", "/calendar"];
        assert_eq!(paths(&visible_items(Some(UserRole::Pilot))), expected);
        assert_eq!(paths(&visible_items(Some(UserRole::Guest))), expected);
        assert_eq!(paths(&visible_items(None)), expected);
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title("/vehicles"), "Vehículos");
        assert_eq!(page_title("/settings"), DEFAULT_TITLE);
    }

    #[test]
    fn test_signed_out_routes_to_login() {
        assert_eq!(
            resolve_route("/login", false),
            Route::Render {
                path: "/login".to_string()
            }
        );
        assert_eq!(
            resolve_route("/dashboard", false),
            Route::Redirect { to: LOGIN_PATH }
        );
        assert_eq!(resolve_route("/", false), Route::Redirect { to: LOGIN_PATH });
    }

    #[test]
    fn test_signed_in_routes() {
        assert_eq!(
            resolve_route("/calendar", true),
            Route::Render {
                path: "/calendar".to_string()
            }
        );
        for path in ["/", "/login", "/nowhere"] {
            assert_eq!(resolve_route(path, true), Route::Redirect { to: HOME_PATH });
        }
    }

    #[test]
    fn test_loading_session_shows_loading_screen() {
        let mut session = SessionSnapshot {
            current_user: None,
            session_token: None,
            is_authenticated: false,
            is_loading: true,
            last_error: None,
        };
        assert_eq!(route_for_session("/login", &session), Route::Loading);
        assert_eq!(route_for_session("/teams", &session), Route::Loading);

        session.is_loading = false;
        assert_eq!(
            route_for_session("/teams", &session),
            Route::Redirect { to: LOGIN_PATH }
        );
    }

    #[test]
    fn test_loading_route_serializes_as_action() {
        let json = serde_json::to_value(Route::Loading).unwrap();
        assert_eq!(json, serde_json::json!({ "action": "loading" }));
    }
}
