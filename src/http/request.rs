mod body;

pub use body::{BodyConfig, BodyError};

use self::body::BodyState;
use super::{Body, Params};
use crate::bounded::{BoxError, Rc, RefCell, Send};
use crate::cookie;
use crate::wrap::{Next, Wrap};

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use http::header::{self, AsHeaderName, HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// The raw request handed over by the transport.
///
/// Wire parsing, TLS and connection handling happen before this point.
#[derive(Debug, Default)]
pub struct Incoming {
    /// The request method, as received.
    pub method: Option<String>,
    /// The request target, as received.
    pub url: String,
    pub headers: HeaderMap,
    /// The address of the remote end of the connection.
    pub peer_addr: Option<String>,
    pub body: Body,
}

/// An HTTP request.
///
/// `Request` is a handle to the state of one request/response cycle.
/// Cloning it is cheap, and every clone observes the same state: a
/// URL rewritten or a header added by one middleware is seen by every
/// later middleware and by the terminal handler.
#[derive(Clone)]
pub struct Request {
    shared: Rc<Shared>,
}

struct Shared {
    method: String,
    target: RefCell<Target>,
    headers: RefCell<HeaderMap>,
    cookies: HashMap<String, String>,
    peer_addr: Option<String>,
    body: BodyState,
    middlewares: RefCell<Vec<Rc<dyn Wrap>>>,
}

// The request target and the parts derived from it.
#[derive(Clone)]
struct Target {
    url: String,
    path: String,
    query: Params,
}

impl Target {
    fn resolve(url: String, host: Option<&str>) -> Self {
        let base = host
            .filter(|host| !host.is_empty())
            .and_then(|host| Url::parse(&format!("http://{}", host)).ok())
            .or_else(|| Url::parse("http://localhost").ok());

        let (path, query) = match base.and_then(|base| base.join(&url).ok()) {
            Some(resolved) => (
                resolved.path().to_owned(),
                resolved.query().map(parse_query).unwrap_or_default(),
            ),
            None => {
                let target = url.split('#').next().unwrap_or_default();
                let (path, query) = target.split_once('?').unwrap_or((target, ""));
                let path = if path.is_empty() { "/" } else { path };
                (path.to_owned(), parse_query(query))
            }
        };

        Target { url, path, query }
    }
}

fn parse_query(query: &str) -> Params {
    Params::parse(query.as_bytes()).unwrap_or_default()
}

impl Request {
    /// Create a request from what the transport received.
    pub fn new(incoming: Incoming) -> Self {
        Self::with_config(incoming, BodyConfig::default())
    }

    /// Create a request with a custom body configuration.
    pub fn with_config(incoming: Incoming, config: BodyConfig) -> Self {
        let Incoming {
            method,
            url,
            headers,
            peer_addr,
            body,
        } = incoming;

        let method = method.unwrap_or_default().to_ascii_uppercase();
        let target = Target::resolve(url, first_value(&headers, header::HOST).as_deref());

        // multiple cookie lines are equivalent to one joined with "; "
        let cookies = cookie::parse(&all_values(&headers, header::COOKIE).join("; "));

        tracing::trace!(
            method = %method,
            path = %target.path,
            cookies = cookies.len(),
            "request received"
        );

        Request {
            shared: Rc::new(Shared {
                method,
                target: RefCell::new(target),
                headers: RefCell::new(headers),
                cookies,
                peer_addr: peer_addr.filter(|addr| !addr.is_empty()),
                body: BodyState::new(body, config),
                middlewares: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Create a request from the `http` crate's request type.
    pub fn from_http(req: http::Request<Body>, peer_addr: Option<String>) -> Self {
        let (parts, body) = req.into_parts();

        Self::new(Incoming {
            method: Some(parts.method.as_str().to_owned()),
            url: parts.uri.to_string(),
            headers: parts.headers,
            peer_addr,
            body,
        })
    }

    /// The request method, uppercased. Empty if the transport supplied none.
    pub fn method(&self) -> &str {
        &self.shared.method
    }

    /// The request target, as received or as last set with [`set_url`](Self::set_url).
    pub fn url(&self) -> String {
        self.shared.target.borrow_mut().url.clone()
    }

    /// Rewrite the request target.
    ///
    /// The path and query are derived from the new target.
    pub fn set_url(&self, url: impl Into<String>) {
        let target = Target::resolve(url.into(), self.header(header::HOST).as_deref());
        *self.shared.target.borrow_mut() = target;
    }

    /// The path of the request target, without the query string.
    pub fn path(&self) -> String {
        self.shared.target.borrow_mut().path.clone()
    }

    /// The decoded query string.
    pub fn query(&self) -> Params {
        self.shared.target.borrow_mut().query.clone()
    }

    /// The first value of the query parameter `name`.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.shared
            .target
            .borrow_mut()
            .query
            .first(name)
            .map(ToOwned::to_owned)
    }

    pub fn headers(&self) -> HeaderMap {
        self.shared.headers.borrow_mut().clone()
    }

    /// The first value of the header `name`.
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<String> {
        first_value(&self.shared.headers.borrow_mut(), name)
    }

    /// Every value of the header `name`, in order.
    pub fn header_all<K: AsHeaderName>(&self, name: K) -> Vec<String> {
        all_values(&self.shared.headers.borrow_mut(), name)
    }

    /// Set a header, replacing any existing values.
    pub fn insert_header(&self, name: HeaderName, value: HeaderValue) -> Option<HeaderValue> {
        self.shared.headers.borrow_mut().insert(name, value)
    }

    /// Add a value to a header, keeping any existing values.
    pub fn append_header(&self, name: HeaderName, value: HeaderValue) {
        self.shared.headers.borrow_mut().append(name, value);
    }

    /// The cookies sent with the request.
    ///
    /// Signed cookies are kept in their `s:<value>.<signature>` form,
    /// see [`signed_cookie`](Self::signed_cookie).
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.shared.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.shared.cookies.get(name).map(String::as_str)
    }

    /// Returns the value of the signed cookie `name`, if it carries
    /// a valid signature for `secret`.
    pub fn signed_cookie(&self, name: &str, secret: impl AsRef<[u8]>) -> Option<String> {
        cookie::unsign(self.cookie(name)?, secret)
    }

    /// Sign a cookie value, see [`cookie::sign`].
    pub fn sign_cookie(&self, value: &str, secret: impl AsRef<[u8]>) -> String {
        cookie::sign(value, secret)
    }

    /// Verify a signed cookie value, see [`cookie::unsign`].
    pub fn unsign_cookie(&self, signed: &str, secret: impl AsRef<[u8]>) -> Option<String> {
        cookie::unsign(signed, secret)
    }

    /// The address of the remote end of the connection.
    pub fn peer_addr(&self) -> Option<&str> {
        self.shared.peer_addr.as_deref()
    }

    /// The address of the client that originated the request.
    ///
    /// This is the first entry of `X-Forwarded-For` when present,
    /// otherwise the peer address. The header is supplied by the
    /// client or its proxies and is not authenticated.
    pub fn client_ip(&self) -> Option<String> {
        match self.forwarded_for() {
            Some(forwarded) => forwarded
                .split(',')
                .next()
                .map(|ip| ip.trim().to_owned())
                .filter(|ip| !ip.is_empty()),
            None => self.peer_addr().map(ToOwned::to_owned),
        }
    }

    /// The address of the proxy that forwarded the request.
    ///
    /// This is the peer address, but only when `X-Forwarded-For` shows
    /// that an intermediary was involved.
    pub fn proxy_ip(&self) -> Option<String> {
        self.forwarded_for()
            .and_then(|_| self.peer_addr().map(ToOwned::to_owned))
    }

    fn forwarded_for(&self) -> Option<String> {
        self.header("x-forwarded-for")
            .filter(|forwarded| !forwarded.is_empty())
    }

    /// The parsed `Content-Type` header.
    pub fn content_type(&self) -> Option<mime::Mime> {
        self.header(header::CONTENT_TYPE)?.parse().ok()
    }

    /// Whether the body is declared as JSON, including `+json` subtypes.
    pub fn is_json(&self) -> bool {
        match self.content_type() {
            Some(mime) => mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON),
            None => false,
        }
    }

    /// Whether the body is declared as `application/x-www-form-urlencoded`.
    pub fn is_url_encoded(&self) -> bool {
        self.content_type().map_or(false, |mime| {
            mime.type_() == mime::APPLICATION && mime.subtype() == mime::WWW_FORM_URLENCODED
        })
    }

    /// Register a middleware.
    ///
    /// Middlewares run in the order they are registered, see
    /// [`execute_middlewares`](Self::execute_middlewares).
    pub fn wrap<W>(&self, wrap: W) -> &Self
    where
        W: Wrap,
    {
        self.shared.middlewares.borrow_mut().push(Rc::new(wrap));
        self
    }

    /// Run the registered middlewares in order, then `terminal`.
    ///
    /// Each middleware decides whether the chain continues by calling
    /// or dropping its [`Next`]. A dropped `Next` ends the chain quietly
    /// with `Ok(())`. The first error returned by a middleware or the
    /// terminal is returned as is.
    ///
    /// Middlewares registered while the chain is running only take
    /// part in later executions.
    pub async fn execute_middlewares<F, O, E>(&self, terminal: F) -> Result<(), BoxError>
    where
        F: FnOnce(Request) -> O + Send + 'static,
        O: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        let chain = self
            .shared
            .middlewares
            .borrow_mut()
            .iter()
            .cloned()
            .collect::<Rc<[_]>>();

        tracing::trace!(middlewares = chain.len(), "executing middleware chain");

        Next::new(chain, terminal).call(self.clone()).await
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.shared.target.borrow_mut().clone();

        f.debug_struct("Request")
            .field("method", &self.shared.method)
            .field("url", &target.url)
            .field("path", &target.path)
            .field("query", &target.query)
            .field("peer_addr", &self.shared.peer_addr)
            .finish()
    }
}

fn first_value<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Option<String> {
    headers.get(name).map(lossy)
}

fn all_values<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Vec<String> {
    headers.get_all(name).iter().map(lossy).collect()
}

fn lossy(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}
