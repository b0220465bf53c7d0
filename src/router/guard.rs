use crate::session::Evaluator;

use super::LOGIN_PATH;

/// Admission check placed in front of a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    required_role: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Leave the route. `replace` keeps the blocked route out of history so
    /// going back does not land on it again.
    Redirect { to: &'static str, replace: bool },

    /// Stay on the route and show an access-denied notice instead of it.
    Denied,

    Admit,
}

impl Guard {
    /// Any authenticated user.
    pub const fn authenticated() -> Self {
        Self {
            required_role: None,
        }
    }

    pub const fn role(role: &'static str) -> Self {
        Self {
            required_role: Some(role),
        }
    }

    pub fn required_role(&self) -> Option<&'static str> {
        self.required_role
    }

    /// Evaluated on every navigation, the result is never cached.
    pub fn check(&self, evaluator: &Evaluator) -> Admission {
        if !evaluator.is_authenticated() {
            return Admission::Redirect {
                to: LOGIN_PATH,
                replace: true,
            };
        }

        match self.required_role {
            Some(role) if !evaluator.has_role(role) => Admission::Denied,
            _ => Admission::Admit,
        }
    }
}
