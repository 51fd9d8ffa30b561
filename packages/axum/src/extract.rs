//! Per-request [`RequestContext`] extraction.
//!
//! [`HalContext`] rebuilds the absolute URL of the request being handled
//! from its URI and headers, and combines it with the [`HalConfig`] in the
//! router state:
//!
//! | Part | Source, first match wins |
//! |------|--------------------------|
//! | scheme | `X-Forwarded-Proto`, URI scheme, `HalConfig::scheme` |
//! | host | `X-Forwarded-Host`, `Host`, URI authority |
//! | path and query | the original request URI |
//!
//! The `X-Forwarded-*` headers are only read when
//! [`HalConfig::trust_forwarded`] is set.
//!
//! The context lives only as long as the handler call; nothing is shared
//! between requests.

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{request::Parts, HeaderMap},
};
use halkit::RequestContext;

use crate::{config::HalConfig, error::AppError};

/// Axum extractor yielding the [`RequestContext`] of the current request.
///
/// Rejects with 400 when no host can be determined.
#[derive(Debug, Clone)]
pub struct HalContext(pub RequestContext);

impl<S> FromRequestParts<S> for HalContext
where
    S: Send + Sync,
    HalConfig: FromRef<S>,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let config = HalConfig::from_ref(state);
        let result = context_from_parts(parts, &config).map(HalContext);
        async move { result }
    }
}

/// Build the [`RequestContext`] for a request, see the module docs for the
/// precedence rules.
pub fn context_from_parts(parts: &Parts, config: &HalConfig) -> Result<RequestContext, AppError> {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri)
        .unwrap_or(&parts.uri);

    let forwarded = |name: &str| {
        if config.trust_forwarded {
            header_value(&parts.headers, name)
        } else {
            None
        }
    };

    let scheme = forwarded("x-forwarded-proto")
        .or_else(|| uri.scheme_str().map(str::to_owned))
        .unwrap_or_else(|| config.scheme.clone());

    let host = forwarded("x-forwarded-host")
        .or_else(|| header_value(&parts.headers, "host"))
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .ok_or_else(|| AppError::BadRequest("missing Host header".into()))?;

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let host_url = format!("{scheme}://{host}/");
    let url = format!("{scheme}://{host}{path_and_query}");

    let mut ctx = RequestContext::from_parts(url, uri.path(), host_url).with_policy(config.self_link);
    if let Some(canonical) = &config.canonical_host {
        ctx = ctx.with_canonical_host(canonical.clone());
    }
    Ok(ctx)
}

/// First value of a header, trimmed; for comma-separated proxy headers only
/// the first hop counts.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(name)?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use halkit::{SelfHref, SelfLinkPolicy};

    use super::*;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn builds_absolute_url_from_host_header() {
        let p = parts("/foo/23?x=1", &[("host", "localhost:3000")]);
        let ctx = context_from_parts(&p, &HalConfig::default()).unwrap();
        assert_eq!(ctx.url, "http://localhost:3000/foo/23?x=1");
        assert_eq!(ctx.path, "/foo/23");
        assert_eq!(ctx.host_url, "http://localhost:3000/");
        assert_eq!(ctx.self_href(), "http://localhost:3000/foo/23?x=1");
    }

    #[test]
    fn canonical_host_gives_path_only_self_link() {
        let config = HalConfig {
            canonical_host: Some("api.example.com".into()),
            ..HalConfig::default()
        };
        let p = parts("/foo/23", &[("host", "localhost")]);
        let ctx = context_from_parts(&p, &config).unwrap();
        assert_eq!(ctx.self_href(), "/foo/23");
    }

    fn proxied() -> Parts {
        parts(
            "/orders",
            &[
                ("host", "internal:8080"),
                ("x-forwarded-host", "api.example.com, proxy.local"),
                ("x-forwarded-proto", "https"),
            ],
        )
    }

    #[test]
    fn trusted_forwarded_headers_take_precedence() {
        let config = HalConfig {
            trust_forwarded: true,
            ..HalConfig::default()
        };
        let ctx = context_from_parts(&proxied(), &config).unwrap();
        assert_eq!(ctx.url, "https://api.example.com/orders");
    }

    #[test]
    fn forwarded_headers_ignored_by_default() {
        let ctx = context_from_parts(&proxied(), &HalConfig::default()).unwrap();
        assert_eq!(ctx.url, "http://internal:8080/orders");
        assert_eq!(ctx.self_href(), "http://internal:8080/orders");
    }

    #[test]
    fn absolute_form_uri_supplies_host() {
        let p = parts("https://api.example.com/a", &[]);
        let config = HalConfig {
            self_link: SelfLinkPolicy::Path,
            ..HalConfig::default()
        };
        let ctx = context_from_parts(&p, &config).unwrap();
        assert_eq!(ctx.url, "https://api.example.com/a");
        assert_eq!(ctx.self_href(), "/a");
    }

    #[test]
    fn missing_host_rejected() {
        let p = parts("/foo", &[]);
        assert!(matches!(
            context_from_parts(&p, &HalConfig::default()),
            Err(AppError::BadRequest(_))
        ));
    }
}
