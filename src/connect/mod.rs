//! Per-hop connection establishment.
//!
//! One call to [`establish`] performs the milestones of a hop in order: DNS
//! resolution (skipped for IP-literal hosts), TCP connect, the TLS handshake
//! for https targets, and the HTTP/1.1 handshake over the instrumented
//! stream. The observer is notified synchronously at each milestone. The
//! returned [`ConnDriver`] owns the background task driving the connection
//! and aborts it on drop, so a hop can never leak its socket.

mod stream;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use bytes::Bytes;
use hickory_resolver::TokioAsyncResolver;
use http_body_util::Empty;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use url::{Host, Url};

use crate::config::{DIAL_TIMEOUT, TCP_KEEPALIVE, TLS_HANDSHAKE_TIMEOUT};
use crate::error_handling::VisitError;
use crate::trace::TraceObserver;

pub use stream::{MaybeTlsStream, TracedStream};

/// Sender half of one hop's HTTP/1.1 connection. Requests carry no body.
pub type RequestSender = http1::SendRequest<Empty<Bytes>>;

/// Handle to the background task driving one hop's connection.
///
/// Dropping the driver aborts the task, which closes the socket. Every exit
/// path out of a hop therefore releases the connection.
pub struct ConnDriver {
    handle: JoinHandle<()>,
}

impl ConnDriver {
    fn spawn<T, B>(conn: http1::Connection<T, B>) -> Self
    where
        T: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
        B: hyper::body::Body + Send + 'static,
        B::Data: Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let handle = tokio::spawn(async move {
            if let Err(err) = conn.await {
                log::debug!("Connection task ended: {err}");
            }
        });
        Self { handle }
    }
}

impl Drop for ConnDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Establishes one instrumented connection to the URL's origin.
///
/// Notifies `observer` at each lifecycle milestone and returns the request
/// sender plus the driver keeping the connection alive. DNS resolution and
/// the TCP connect share one dial timeout; the TLS handshake has its own.
///
/// # Errors
///
/// Any failure before the connection is ready is fatal for the visit: DNS
/// errors, unreachable addresses, timeouts, TLS failures, and HTTP
/// handshake failures all surface as their `VisitError` variant.
pub async fn establish<R>(
    url: &Url,
    resolver: &TokioAsyncResolver,
    tls: &TlsConnector,
    observer: Arc<R>,
) -> Result<(RequestSender, ConnDriver), VisitError>
where
    R: TraceObserver + 'static,
{
    let host = url.host_str().ok_or_else(|| VisitError::MissingHost {
        url: url.to_string(),
    })?;
    let port = url.port_or_known_default().unwrap_or(80);

    observer.get_conn();

    let tcp = match timeout(
        DIAL_TIMEOUT,
        dial_tcp(url, port, resolver, observer.as_ref()),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(e),
        Err(_) => {
            return Err(VisitError::DialTimeout {
                host: host.to_string(),
                timeout: DIAL_TIMEOUT,
            })
        }
    };

    let keepalive = TcpKeepalive::new().with_time(TCP_KEEPALIVE);
    if let Err(e) = SockRef::from(&tcp).set_tcp_keepalive(&keepalive) {
        log::debug!("Could not set TCP keep-alive on {host}: {e}");
    }

    let stream = if url.scheme() == "https" {
        let server_name = server_name_for(url)?;
        observer.tls_handshake_start();
        let tls_stream = match timeout(TLS_HANDSHAKE_TIMEOUT, tls.connect(server_name, tcp)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(VisitError::TlsHandshake {
                    host: host.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(VisitError::TlsHandshakeTimeout {
                    host: host.to_string(),
                    timeout: TLS_HANDSHAKE_TIMEOUT,
                })
            }
        };
        let protocol = tls_stream
            .get_ref()
            .1
            .protocol_version()
            .map(|v| format!("{v:?}"))
            .unwrap_or_else(|| "unknown".to_string());
        observer.tls_handshake_done(&protocol);
        MaybeTlsStream::Tls(Box::new(tls_stream))
    } else {
        MaybeTlsStream::Plain(tcp)
    };

    let io = TokioIo::new(TracedStream::new(stream, Arc::clone(&observer)));
    let mut builder = http1::Builder::new();
    builder.title_case_headers(true);
    let (sender, conn) = builder
        .handshake::<_, Empty<Bytes>>(io)
        .await
        .map_err(|source| VisitError::HttpHandshake { source })?;
    observer.got_conn();

    Ok((sender, ConnDriver::spawn(conn)))
}

// DNS plus TCP connect, done inside the shared dial timeout
async fn dial_tcp<R: TraceObserver>(
    url: &Url,
    port: u16,
    resolver: &TokioAsyncResolver,
    observer: &R,
) -> Result<TcpStream, VisitError> {
    let ip = match url.host() {
        Some(Host::Domain(domain)) => resolve_host(domain, resolver, observer).await?,
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip),
        None => {
            return Err(VisitError::MissingHost {
                url: url.to_string(),
            })
        }
    };

    let addr = SocketAddr::new(ip, port);
    observer.connect_start(addr);
    match TcpStream::connect(addr).await {
        Ok(stream) => {
            observer.connect_done(addr);
            Ok(stream)
        }
        Err(source) => Err(VisitError::Connect { addr, source }),
    }
}

// Resolves a domain host, preferring IPv4 answers like the classic dialer
async fn resolve_host<R: TraceObserver>(
    domain: &str,
    resolver: &TokioAsyncResolver,
    observer: &R,
) -> Result<IpAddr, VisitError> {
    observer.dns_start(domain);
    let lookup = resolver
        .lookup_ip(domain)
        .await
        .map_err(|source| VisitError::Dns {
            host: domain.to_string(),
            source,
        })?;
    let addrs: Vec<IpAddr> = lookup.iter().collect();
    observer.dns_done(&addrs);

    addrs
        .iter()
        .copied()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first().copied())
        .ok_or_else(|| VisitError::NoAddress {
            host: domain.to_string(),
        })
}

fn server_name_for(url: &Url) -> Result<ServerName<'static>, VisitError> {
    match url.host() {
        Some(Host::Domain(domain)) => {
            ServerName::try_from(domain.to_string()).map_err(|source| VisitError::ServerName {
                host: domain.to_string(),
                source,
            })
        }
        Some(Host::Ipv4(ip)) => Ok(ServerName::from(IpAddr::V4(ip))),
        Some(Host::Ipv6(ip)) => Ok(ServerName::from(IpAddr::V6(ip))),
        None => Err(VisitError::MissingHost {
            url: url.to_string(),
        }),
    }
}
