pub mod guard;

use std::fmt;

use anyhow::{bail, Result};
use log::debug;

use crate::session::Evaluator;
use crate::types::auth::{ROLE_AGENT, ROLE_CLIENT};

use self::guard::{Admission, Guard};

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const EXPIRED_LOGIN_PATH: &str = "/login?expired=true";
pub const AGENT_HOME_PATH: &str = "/agent/add-client";
pub const CLIENT_HOME_PATH: &str = "/client/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    AddClient,
    AddBankAccount,
    Dashboard,
    Transfer,
    ChangePassword,
}

pub struct Route {
    pub path: &'static str,
    pub page: Page,

    /// `None` for public routes.
    pub guard: Option<Guard>,
}

pub const ROUTES: &[Route] = &[
    Route {
        path: LOGIN_PATH,
        page: Page::Login,
        guard: None,
    },
    Route {
        path: AGENT_HOME_PATH,
        page: Page::AddClient,
        guard: Some(Guard::role(ROLE_AGENT)),
    },
    Route {
        path: "/agent/add-account",
        page: Page::AddBankAccount,
        guard: Some(Guard::role(ROLE_AGENT)),
    },
    Route {
        path: CLIENT_HOME_PATH,
        page: Page::Dashboard,
        guard: Some(Guard::role(ROLE_CLIENT)),
    },
    Route {
        path: "/client/transfer",
        page: Page::Transfer,
        guard: Some(Guard::role(ROLE_CLIENT)),
    },
    Route {
        path: "/change-password",
        page: Page::ChangePassword,
        guard: Some(Guard::authenticated()),
    },
];

impl Page {
    pub fn path(self) -> &'static str {
        ROUTES
            .iter()
            .find(|route| route.page == self)
            .map(|route| route.path)
            .unwrap_or(HOME_PATH)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Page::Login => "Login",
            Page::AddClient => "Add client",
            Page::AddBankAccount => "Add bank account",
            Page::Dashboard => "Dashboard",
            Page::Transfer => "Transfer",
            Page::ChangePassword => "Change password",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    pub fn parse(s: &str) -> Self {
        let (path, query) = match s.split_once('?') {
            Some((path, query)) => (path, query),
            None => (s, ""),
        };
        let path = if path.is_empty() { HOME_PATH } else { path };

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        Self {
            path: path.to_string(),
            query,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            if value.is_empty() {
                write!(f, "{sep}{key}")?;
            } else {
                write!(f, "{sep}{key}={value}")?;
            }
        }
        Ok(())
    }
}

/// Browser-like history: a list of entries and a cursor into it.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<Location>,
    index: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            entries: vec![Location::parse(HOME_PATH)],
            index: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Adds a new entry after the current one, dropping any forward entries.
    pub fn push(&mut self, to: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Location::parse(to));
        self.index = self.entries.len() - 1;
    }

    /// Overwrites the current entry.
    pub fn replace(&mut self, to: &str) {
        self.entries[self.index] = Location::parse(to);
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Number of entries up to and including the current one.
    pub fn depth(&self) -> usize {
        self.index + 1
    }
}

/// What ends up on screen for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Content(Page),

    /// The user is signed in but lacks the role for this page.
    AccessDenied(Page),
}

enum Step {
    Redirect { to: &'static str, replace: bool },
    Show(View),
}

pub struct Router {
    evaluator: Evaluator,
}

impl Router {
    const MAX_REDIRECTS: usize = 10;

    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    /// Renders the navigator's current location, following redirects until
    /// something can be shown.
    pub fn render(&self, navigator: &mut Navigator) -> Result<View> {
        for _ in 0..Self::MAX_REDIRECTS {
            match self.resolve(navigator.current()) {
                Step::Show(view) => return Ok(view),
                Step::Redirect { to, replace } => {
                    debug!("Redirect from '{}' to '{to}'", navigator.current());
                    if replace {
                        navigator.replace(to);
                    } else {
                        navigator.push(to);
                    }
                }
            }
        }
        bail!(
            "too many redirects while rendering '{}'",
            navigator.current()
        )
    }

    /// Home page for the current user's role, `/` when no role applies.
    pub fn landing_path(&self) -> &'static str {
        if self.evaluator.has_role(ROLE_AGENT) {
            AGENT_HOME_PATH
        } else if self.evaluator.has_role(ROLE_CLIENT) {
            CLIENT_HOME_PATH
        } else {
            HOME_PATH
        }
    }

    fn resolve(&self, location: &Location) -> Step {
        let path = location.path();
        if path == HOME_PATH {
            let to = if !self.evaluator.is_authenticated() {
                LOGIN_PATH
            } else if self.evaluator.has_role(ROLE_AGENT) {
                AGENT_HOME_PATH
            } else {
                CLIENT_HOME_PATH
            };
            return Step::Redirect { to, replace: true };
        }

        let route = match ROUTES.iter().find(|route| route.path == path) {
            Some(route) => route,
            None => {
                return Step::Redirect {
                    to: HOME_PATH,
                    replace: true,
                }
            }
        };

        let guard = match route.guard {
            Some(guard) => guard,
            None => {
                if route.page == Page::Login && self.evaluator.is_authenticated() {
                    let landing = self.landing_path();
                    if landing != HOME_PATH {
                        return Step::Redirect {
                            to: landing,
                            replace: true,
                        };
                    }
                }
                return Step::Show(View::Content(route.page));
            }
        };

        match guard.check(&self.evaluator) {
            Admission::Redirect { to, replace } => Step::Redirect { to, replace },
            Admission::Denied => {
                debug!(
                    "Access to '{path}' denied, requires role {:?}",
                    guard.required_role()
                );
                Step::Show(View::AccessDenied(route.page))
            }
            Admission::Admit => Step::Show(View::Content(route.page)),
        }
    }
}
