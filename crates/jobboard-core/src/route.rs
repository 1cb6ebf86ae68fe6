//! Site routes and navigation targets

use serde::{Deserialize, Serialize};

/// Query parameter carrying the post-login return target
pub const NEXT_PARAM: &str = "next";

/// Access class of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageClass {
    /// Browsable without any credential
    Public,
    /// The employer login / signup page
    AuthTransit,
    /// The post-signup "confirm your email" page
    ConfirmTransit,
    /// Requires an authenticated and confirmed employer
    Restricted,
}

/// Pages of the site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "page", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    About,
    Jobs,
    JobDetail(String),
    EmployerLogin,
    EmployerWelcome,
    PostJob,
}

impl Route {
    /// Parse a path (no query string) into a route. Unknown paths give `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let path = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match path {
            "" | "/" => Some(Route::Home),
            "/about" => Some(Route::About),
            "/jobs" => Some(Route::Jobs),
            "/employer-login" => Some(Route::EmployerLogin),
            "/employer-welcome" => Some(Route::EmployerWelcome),
            "/post-job" => Some(Route::PostJob),
            other => {
                let id = other.strip_prefix("/jobs/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                let id = urlencoding::decode(id).ok()?;
                Some(Route::JobDetail(id.into_owned()))
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::JobDetail(id) => format!("/jobs/{}", urlencoding::encode(id)),
            Route::EmployerLogin => "/employer-login".to_string(),
            Route::EmployerWelcome => "/employer-welcome".to_string(),
            Route::PostJob => "/post-job".to_string(),
        }
    }

    pub fn class(&self) -> PageClass {
        match self {
            Route::Home | Route::About | Route::Jobs | Route::JobDetail(_) => PageClass::Public,
            Route::EmployerLogin => PageClass::AuthTransit,
            Route::EmployerWelcome => PageClass::ConfirmTransit,
            Route::PostJob => PageClass::Restricted,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the visitor currently is: a route plus an optional return target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub route: Route,
    pub return_to: Option<Route>,
}

impl Location {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            return_to: None,
        }
    }

    /// Parse `path?query`. Unknown paths give `None`.
    ///
    /// The `next` parameter is kept only when it names a page a visitor can
    /// be sent back to after login; transit pages and foreign URLs are
    /// dropped.
    pub fn parse(url: &str) -> Option<Self> {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let route = Route::parse(path)?;
        let return_to = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == NEXT_PARAM)
            .and_then(|(_, value)| urlencoding::decode(value).ok())
            .and_then(|value| Route::parse(&value))
            .filter(is_return_target);

        Some(Self { route, return_to })
    }
}

fn is_return_target(route: &Route) -> bool {
    matches!(route.class(), PageClass::Public | PageClass::Restricted)
}

/// A navigation command: replace the current location with `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub target: Route,
    pub return_to: Option<Route>,
}

impl Redirect {
    pub fn to(target: Route) -> Self {
        Self {
            target,
            return_to: None,
        }
    }

    pub fn with_return(target: Route, return_to: Route) -> Self {
        Self {
            target,
            return_to: Some(return_to),
        }
    }

    /// URL handed to the host's navigation facility
    pub fn to_url(&self) -> String {
        match &self.return_to {
            Some(next) => format!(
                "{}?{}={}",
                self.target.path(),
                NEXT_PARAM,
                urlencoding::encode(&next.path())
            ),
            None => self.target.path(),
        }
    }
}

/// Host navigation facility
pub trait Navigator {
    /// Replace the current history entry with the redirect target
    fn replace(&self, redirect: &Redirect);
}
