//! Request context and the policy deciding what a document's `self` link is.
//!
//! The web layer builds one [`RequestContext`] per request and passes it to
//! [`Document`](crate::Document) constructors explicitly. Code running
//! outside a request passes a fixed URL instead; both implement [`SelfHref`].

use std::fmt;
use std::str::FromStr;

/// Anything that can supply the href of a document's `self` link.
pub trait SelfHref {
    fn self_href(&self) -> String;
}

impl SelfHref for str {
    fn self_href(&self) -> String {
        self.to_owned()
    }
}

impl SelfHref for String {
    fn self_href(&self) -> String {
        self.clone()
    }
}

/// How a [`RequestContext`] turns into a `self` href.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfLinkPolicy {
    /// Path-only when a canonical host is configured, absolute otherwise.
    #[default]
    Auto,
    /// Always the path (plus query) relative to the host.
    Path,
    /// Always the full URL including scheme and host.
    Absolute,
}

impl fmt::Display for SelfLinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfLinkPolicy::Auto => write!(f, "auto"),
            SelfLinkPolicy::Path => write!(f, "path"),
            SelfLinkPolicy::Absolute => write!(f, "absolute"),
        }
    }
}

impl FromStr for SelfLinkPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(SelfLinkPolicy::Auto),
            "path" => Ok(SelfLinkPolicy::Path),
            "absolute" => Ok(SelfLinkPolicy::Absolute),
            _ => Err(format!(
                "unknown self link policy {:?}; expected one of: auto, path, absolute",
                s
            )),
        }
    }
}

/// Read-only view of the request being answered.
///
/// | Field | Example |
/// |-------|---------|
/// | `url` | `http://api.example.com/orders/7?expand=1` |
/// | `path` | `/orders/7` |
/// | `host_url` | `http://api.example.com/` |
/// | `canonical_host` | `Some("api.example.com")` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Full absolute URL of the request, query string included.
    pub url: String,
    /// Path portion of the URL, without the query string.
    pub path: String,
    /// Scheme and host prefix of `url`, with a trailing slash.
    pub host_url: String,
    /// Canonical server name configured for the application, if any.
    pub canonical_host: Option<String>,
    pub policy: SelfLinkPolicy,
}

impl RequestContext {
    /// Build a context from the full request URL and its scheme+host prefix.
    ///
    /// `path` is derived from `url`, from its own authority when `url` is not
    /// under `host_url`. A missing trailing slash on `host_url` is added.
    pub fn new(url: impl Into<String>, host_url: impl Into<String>) -> Self {
        let url = url.into();
        let mut host_url = host_url.into();
        if !host_url.ends_with('/') {
            host_url.push('/');
        }
        let relative = relative_to(&url, &host_url).unwrap_or_else(|| origin_relative(&url));
        let path = match relative.split_once(|c: char| c == '?' || c == '#') {
            Some((p, _)) => p.to_owned(),
            None => relative,
        };
        Self {
            url,
            path,
            host_url,
            canonical_host: None,
            policy: SelfLinkPolicy::default(),
        }
    }

    /// Build a context from already separated parts.
    pub fn from_parts(
        url: impl Into<String>,
        path: impl Into<String>,
        host_url: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            host_url: host_url.into(),
            canonical_host: None,
            policy: SelfLinkPolicy::default(),
        }
    }

    pub fn with_canonical_host(mut self, host: impl Into<String>) -> Self {
        self.canonical_host = Some(host.into());
        self
    }

    pub fn with_policy(mut self, policy: SelfLinkPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `url` stripped of `host_url`, so query strings survive. Falls back to
    /// `path` when `url` does not start with `host_url`.
    pub fn relative_url(&self) -> String {
        relative_to(&self.url, &self.host_url).unwrap_or_else(|| self.path.clone())
    }

    fn use_path(&self) -> bool {
        match self.policy {
            SelfLinkPolicy::Auto => self.canonical_host.is_some(),
            SelfLinkPolicy::Path => true,
            SelfLinkPolicy::Absolute => false,
        }
    }
}

impl SelfHref for RequestContext {
    fn self_href(&self) -> String {
        if self.use_path() {
            self.relative_url()
        } else {
            self.url.clone()
        }
    }
}

/// `url` relative to `host_url`, or `None` when `url` is on another origin.
fn relative_to(url: &str, host_url: &str) -> Option<String> {
    let rest = match url.strip_prefix(host_url) {
        Some(rest) => rest,
        None => url
            .strip_prefix(host_url.trim_end_matches('/'))
            .filter(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))?,
    };
    let rest = rest.trim_start_matches('/');
    Some(format!("/{rest}"))
}

/// Path-and-query of an absolute URL, `/` when it has none.
fn origin_relative(url: &str) -> String {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    match after_scheme.find(['/', '?', '#']) {
        Some(i) if after_scheme[i..].starts_with('/') => after_scheme[i..].to_owned(),
        Some(i) => format!("/{}", &after_scheme[i..]),
        None => "/".to_owned(),
    }
}
