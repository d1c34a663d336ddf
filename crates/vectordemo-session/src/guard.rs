//! Route table and navigation guards.
//!
//! | Path | Route | Guard |
//! |------|-------|-------|
//! | `/` | `Home` | open |
//! | `/login` | `Login` | no auth |
//! | `/signup` | `Signup` | no auth |
//! | `/password/request-reset/` | `RequestPasswordReset` | no auth |
//! | `/password/reset/confirm/:uid/:token` | `ResetPassword` | no auth |
//! | `/dashboard` | `Dashboard` | auth |
//! | anything else | `PageNotFound` | open |

use std::collections::BTreeMap;

use strum::Display;

// ─── Routes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RouteName {
  Home,
  Login,
  Signup,
  RequestPasswordReset,
  ResetPassword,
  Dashboard,
  PageNotFound,
}

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
  Open,
  /// Signed-in users only; others are sent to `Login`.
  RequireAuth,
  /// Anonymous users only; signed-in users are sent to `Dashboard`.
  RequireNoAuth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
  pub name:  RouteName,
  pub path:  &'static str,
  pub guard: Guard,
}

pub const ROUTES: &[Route] = &[
  Route { name: RouteName::Home, path: "/", guard: Guard::Open },
  Route { name: RouteName::Login, path: "/login", guard: Guard::RequireNoAuth },
  Route { name: RouteName::Signup, path: "/signup", guard: Guard::RequireNoAuth },
  Route {
    name:  RouteName::RequestPasswordReset,
    path:  "/password/request-reset/",
    guard: Guard::RequireNoAuth,
  },
  Route {
    name:  RouteName::ResetPassword,
    path:  "/password/reset/confirm/:uid/:token",
    guard: Guard::RequireNoAuth,
  },
  Route { name: RouteName::Dashboard, path: "/dashboard", guard: Guard::RequireAuth },
];

/// Fallback for paths no route matches.
pub const NOT_FOUND: Route = Route {
  name:  RouteName::PageNotFound,
  path:  "/:pathMatch(.*)*",
  guard: Guard::Open,
};

impl Route {
  pub fn by_name(name: RouteName) -> &'static Route {
    ROUTES.iter().find(|r| r.name == name).unwrap_or(&NOT_FOUND)
  }

  /// Match a path (query string already removed). Trailing slashes are
  /// ignored; `:name` segments capture.
  fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern: Vec<_> = segments(self.path).collect();
    let actual: Vec<_> = segments(path).collect();
    if pattern.len() != actual.len() {
      return None;
    }
    let mut params = BTreeMap::new();
    for (p, a) in pattern.iter().zip(&actual) {
      match p.strip_prefix(':') {
        Some(name) => {
          params.insert(name.to_owned(), (*a).to_owned());
        }
        None if p == a => {}
        None => return None,
      }
    }
    Some(params)
  }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
  path.split('/').filter(|s| !s.is_empty())
}

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
  pub route:     &'static Route,
  pub params:    BTreeMap<String, String>,
  /// Path plus query string, exactly as requested.
  pub full_path: String,
}

/// Resolve `full_path` against [`ROUTES`], falling back to [`NOT_FOUND`].
pub fn resolve(full_path: &str) -> RouteMatch {
  let path = full_path.split(['?', '#']).next().unwrap_or_default();
  for route in ROUTES {
    if let Some(params) = route.matches(path) {
      return RouteMatch { route, params, full_path: full_path.to_owned() };
    }
  }
  let mut params = BTreeMap::new();
  params.insert("pathMatch".to_owned(), path.trim_start_matches('/').to_owned());
  RouteMatch { route: &NOT_FOUND, params, full_path: full_path.to_owned() }
}

// ─── Guards ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
  Allow(RouteMatch),
  Redirect {
    to:    RouteName,
    query: Vec<(String, String)>,
  },
}

/// Anonymous users are sent to `Login`, remembering where they were going.
pub fn require_auth(target: RouteMatch, is_logged_in: bool) -> Navigation {
  if is_logged_in {
    Navigation::Allow(target)
  } else {
    Navigation::Redirect {
      to:    RouteName::Login,
      query: vec![("redirect".to_owned(), target.full_path)],
    }
  }
}

/// Signed-in users are sent to `Dashboard`.
pub fn require_no_auth(target: RouteMatch, is_logged_in: bool) -> Navigation {
  if is_logged_in {
    Navigation::Redirect { to: RouteName::Dashboard, query: Vec::new() }
  } else {
    Navigation::Allow(target)
  }
}

/// Resolve `full_path` and apply its route's guard.
pub fn navigate(full_path: &str, is_logged_in: bool) -> Navigation {
  let target = resolve(full_path);
  match target.route.guard {
    Guard::Open => Navigation::Allow(target),
    Guard::RequireAuth => require_auth(target, is_logged_in),
    Guard::RequireNoAuth => require_no_auth(target, is_logged_in),
  }
}
