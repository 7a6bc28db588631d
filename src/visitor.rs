//! The request visitor.
//!
//! A [`Visitor`] performs one logical visit: a bounded chain of hops, each
//! hop being a fresh instrumented connection, one dispatched request, and a
//! printed report. Redirects are never delegated to the transport; the
//! visitor classifies each response itself and follows `Location` in an
//! explicit loop so the termination condition stays visible.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use hickory_resolver::TokioAsyncResolver;
use http::{header, HeaderName, HeaderValue, Request, StatusCode};
use http_body_util::Empty;
use tokio_rustls::TlsConnector;
use url::{Position, Url};

use crate::config::{Config, USER_AGENT};
use crate::connect;
use crate::error_handling::VisitError;
use crate::headers::split_header_line;
use crate::initialization::{init_crypto_provider, init_resolver, init_tls_connector};
use crate::methods::is_standard_method;
use crate::printer::{print_body, print_headers, print_status_line};
use crate::trace::{diagram, TraceRecorder};
use crate::urls::ensure_visitable;

/// Issues instrumented requests and renders the per-hop timing report.
///
/// Construction validates the configured method and builds the resolver and
/// TLS connector once; both are reused across the hops of a chain. The
/// trace state is hop-local: every hop gets a fresh recorder, so the
/// printed timings always describe a single hop.
pub struct Visitor {
    config: Config,
    resolver: Arc<TokioAsyncResolver>,
    tls: TlsConnector,
    current_redirects: u32,
}

/// How a single hop ended.
enum HopOutcome {
    /// The chain is finished; headers and body have been printed.
    Terminal,
    /// A followable redirect pointing at the contained URL.
    Redirect(Url),
}

impl Visitor {
    /// Builds a visitor from per-run settings.
    ///
    /// # Errors
    ///
    /// Returns [`VisitError::InvalidMethod`] when the configured method is
    /// not one of the standard HTTP methods. No request is attempted.
    pub fn new(config: Config) -> Result<Self, VisitError> {
        init_crypto_provider();

        if !is_standard_method(&config.method) {
            return Err(VisitError::InvalidMethod(config.method));
        }

        Ok(Self {
            config,
            resolver: init_resolver(),
            tls: init_tls_connector(),
            current_redirects: 0,
        })
    }

    /// Visits `url`, following redirects while configuration permits.
    ///
    /// Each hop prints its status line and timing diagram; the terminal hop
    /// also prints headers (when enabled) and the body.
    ///
    /// # Errors
    ///
    /// Transport and dispatch failures abort the chain, as does exceeding
    /// the redirect cap with [`VisitError::RedirectLimit`].
    pub async fn visit(&mut self, url: Url) -> Result<(), VisitError> {
        self.current_redirects = 0;
        let mut current = url;

        loop {
            match self.visit_once(&current).await? {
                HopOutcome::Terminal => return Ok(()),
                HopOutcome::Redirect(next) => {
                    self.current_redirects += 1;
                    if self.current_redirects > self.config.max_redirects {
                        return Err(VisitError::RedirectLimit {
                            max: self.config.max_redirects,
                        });
                    }
                    log::info!(
                        "Following redirect {}/{} -> {}",
                        self.current_redirects,
                        self.config.max_redirects,
                        next
                    );
                    current = next;
                }
            }
        }
    }

    // One request/trace/print cycle against a single URL
    async fn visit_once(&self, url: &Url) -> Result<HopOutcome, VisitError> {
        log::debug!("Visiting {url}");
        let recorder = Arc::new(TraceRecorder::new());
        let request = self.build_request(url)?;

        let (mut sender, driver) =
            connect::establish(url, &self.resolver, &self.tls, Arc::clone(&recorder)).await?;
        let response = sender
            .send_request(request)
            .await
            .map_err(|source| VisitError::Dispatch {
                url: url.to_string(),
                source,
            })?;

        let trace = recorder.snapshot();
        print_status_line(response.version(), response.status());
        print!("{}", diagram::render(&trace, Instant::now()));
        println!();

        if wants_redirect(response.status(), self.config.follow_redirects) {
            if let Some(value) = response.headers().get(header::LOCATION) {
                let location = value.to_str().map_err(|e| VisitError::InvalidLocation {
                    location: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    detail: e.to_string(),
                })?;
                let next = resolve_location(url, location)?;
                // Release this hop's connection before the next one dials
                drop(response);
                drop(driver);
                return Ok(HopOutcome::Redirect(next));
            }
            log::debug!("Redirect status without a Location header; chain ends here");
        }

        print_headers(response.headers(), self.config.include_headers);
        print_body(response.into_body()).await?;
        Ok(HopOutcome::Terminal)
    }

    // Request head: configured method, origin-form target, Host and
    // User-Agent defaults, then the configured headers on top
    fn build_request(&self, url: &Url) -> Result<Request<Empty<Bytes>>, VisitError> {
        let host = url.host_str().ok_or_else(|| VisitError::MissingHost {
            url: url.to_string(),
        })?;
        let host_header = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let mut request = Request::builder()
            .method(self.config.method.as_str())
            .uri(&url[Position::BeforePath..Position::AfterQuery])
            .header(header::HOST, host_header)
            .header(header::USER_AGENT, USER_AGENT)
            .body(Empty::new())
            .map_err(|source| VisitError::Request {
                url: url.to_string(),
                source,
            })?;

        for raw in &self.config.headers {
            let (key, value) = split_header_line(raw);
            if key.is_empty() || value.is_empty() {
                log::warn!("Ignoring invalid header: {raw:?}");
                continue;
            }
            let name = match HeaderName::from_bytes(key.as_bytes()) {
                Ok(name) => name,
                Err(_) => {
                    log::warn!("Ignoring invalid header name: {key:?}");
                    continue;
                }
            };
            let value = match HeaderValue::from_str(value) {
                Ok(value) => value,
                Err(_) => {
                    log::warn!("Ignoring invalid header value: {raw:?}");
                    continue;
                }
            };
            request.headers_mut().insert(name, value);
        }

        Ok(request)
    }
}

fn wants_redirect(status: StatusCode, follow: bool) -> bool {
    status.is_redirection() && follow
}

// A Location value is either absolute or relative to the hop's URL; the
// resolved target must itself be something we can dial
fn resolve_location(base: &Url, location: &str) -> Result<Url, VisitError> {
    let resolved = Url::parse(location)
        .or_else(|_| base.join(location))
        .map_err(|e| VisitError::InvalidLocation {
            location: location.to_string(),
            detail: e.to_string(),
        })?;
    ensure_visitable(resolved, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_wants_redirect_inside_class_only() {
        assert!(!wants_redirect(StatusCode::from_u16(299).unwrap(), true));
        assert!(wants_redirect(StatusCode::from_u16(300).unwrap(), true));
        assert!(wants_redirect(StatusCode::from_u16(399).unwrap(), true));
        assert!(!wants_redirect(StatusCode::BAD_REQUEST, true));
    }

    #[test]
    fn test_wants_redirect_respects_follow_flag() {
        assert!(!wants_redirect(StatusCode::MOVED_PERMANENTLY, false));
        assert!(wants_redirect(StatusCode::MOVED_PERMANENTLY, true));
    }

    #[test]
    fn test_resolve_location_absolute_replaces_base() {
        let base = Url::parse("http://origin.test/start").unwrap();
        let next = resolve_location(&base, "https://elsewhere.test/landing").unwrap();
        assert_eq!(next.as_str(), "https://elsewhere.test/landing");
    }

    #[test]
    fn test_resolve_location_relative_joins_base() {
        let base = Url::parse("http://origin.test/dir/page").unwrap();
        let rooted = resolve_location(&base, "/next").unwrap();
        let sibling = resolve_location(&base, "sibling").unwrap();
        assert_eq!(rooted.as_str(), "http://origin.test/next");
        assert_eq!(sibling.as_str(), "http://origin.test/dir/sibling");
    }

    #[test]
    fn test_resolve_location_rejects_non_http_scheme() {
        let base = Url::parse("http://origin.test/start").unwrap();
        let err = resolve_location(&base, "ftp://origin.test/next").err();
        assert!(matches!(
            err,
            Some(VisitError::UnsupportedScheme { scheme, .. }) if scheme == "ftp"
        ));
    }

    #[test]
    fn test_resolve_location_unusable_value_errors() {
        let base = Url::parse("http://origin.test/start").unwrap();
        let err = resolve_location(&base, "http://[bad").err();
        assert!(matches!(err, Some(VisitError::InvalidLocation { .. })));
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_method() {
        let config = Config {
            method: "BREW".to_string(),
            ..Config::default()
        };
        let err = Visitor::new(config).err();
        assert!(matches!(err, Some(VisitError::InvalidMethod(m)) if m == "BREW"));
    }

    #[tokio::test]
    async fn test_build_request_sets_target_and_default_headers() {
        let visitor = Visitor::new(Config::default()).unwrap();
        let url = Url::parse("http://origin.test:8080/path?q=1").unwrap();
        let request = visitor.build_request(&url).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().to_string(), "/path?q=1");
        assert_eq!(request.headers()[header::HOST], "origin.test:8080");
        assert_eq!(request.headers()[header::USER_AGENT], USER_AGENT);
    }

    #[tokio::test]
    async fn test_build_request_default_port_gives_bare_host() {
        let visitor = Visitor::new(Config::default()).unwrap();
        let url = Url::parse("http://origin.test/").unwrap();
        let request = visitor.build_request(&url).unwrap();

        assert_eq!(request.headers()[header::HOST], "origin.test");
    }

    #[tokio::test]
    async fn test_build_request_user_header_overrides_default() {
        let config = Config {
            headers: vec!["User-Agent: custom-agent".to_string()],
            ..Config::default()
        };
        let visitor = Visitor::new(config).unwrap();
        let url = Url::parse("http://origin.test/").unwrap();
        let request = visitor.build_request(&url).unwrap();

        assert_eq!(request.headers()[header::USER_AGENT], "custom-agent");
        let count = request.headers().get_all(header::USER_AGENT).iter().count();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_build_request_skips_invalid_headers() {
        let config = Config {
            headers: vec!["no colon here".to_string(), "X-Ok: yes".to_string()],
            ..Config::default()
        };
        let visitor = Visitor::new(config).unwrap();
        let url = Url::parse("http://origin.test/").unwrap();
        let request = visitor.build_request(&url).unwrap();

        assert_eq!(request.headers()["x-ok"], "yes");
        assert!(!request.headers().contains_key("no"));
    }
}
