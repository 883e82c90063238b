//! String-keyed route table and the linear navigation stack.
//!
//! # Invariants
//! - `Route::parse(&route.path()) == Some(route)` for every route.
//! - The stack is never empty; `back` at the root is refused.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Splash screen duration before leaving `loading`.
pub const SPLASH_DELAY_MS: u64 = 2_000;
/// Delay before the login form animates in.
pub const LOGIN_REVEAL_DELAY_MS: u64 = 300;
/// Username shown when `home` is opened without one.
pub const DEFAULT_USERNAME: &str = "User";

/// Route patterns in navigation order.
pub const ROUTE_TABLE: [&str; 8] = [
    "loading",
    "login",
    "home/{username}",
    "accessibility_settings",
    "daily_tasks",
    "learning",
    "chat",
    "progress",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Loading,
    Login,
    Home { username: String },
    AccessibilitySettings,
    DailyTasks,
    Learning,
    Chat,
    Progress,
}

impl Route {
    pub fn home(username: impl Into<String>) -> Self {
        Self::Home {
            username: username.into(),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim().trim_matches('/');
        if let Some(rest) = path.strip_prefix("home") {
            let username = match rest.strip_prefix('/') {
                Some(name) if !name.is_empty() => name,
                None if rest.is_empty() => DEFAULT_USERNAME,
                Some(_) => DEFAULT_USERNAME,
                None => return None,
            };
            return Some(Self::home(username));
        }
        match path {
            "loading" => Some(Self::Loading),
            "login" => Some(Self::Login),
            "accessibility_settings" => Some(Self::AccessibilitySettings),
            "daily_tasks" => Some(Self::DailyTasks),
            "learning" => Some(Self::Learning),
            "chat" => Some(Self::Chat),
            "progress" => Some(Self::Progress),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Loading => "loading".to_string(),
            Self::Login => "login".to_string(),
            Self::Home { username } => format!("home/{username}"),
            Self::AccessibilitySettings => "accessibility_settings".to_string(),
            Self::DailyTasks => "daily_tasks".to_string(),
            Self::Learning => "learning".to_string(),
            Self::Chat => "chat".to_string(),
            Self::Progress => "progress".to_string(),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStack {
    stack: Vec<Route>,
}

impl NavStack {
    /// Stack starting at the splash route.
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Loading],
        }
    }

    pub fn current(&self) -> &Route {
        // `stack` always holds at least the root.
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn routes(&self) -> &[Route] {
        &self.stack
    }

    pub fn push(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Pops the top route. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    /// Clears history so `route` becomes the root.
    pub fn replace_all(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }

    /// Leaves the splash screen for the login screen.
    pub fn finish_splash(&mut self) {
        if *self.current() == Route::Loading {
            self.replace_all(Route::Login);
        }
    }
}

impl Default for NavStack {
    fn default() -> Self {
        Self::new()
    }
}
