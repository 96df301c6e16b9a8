use herd::http::{header, HeaderMap, HeaderValue};
use herd::{Incoming, Request};

#[test]
fn headers() {
    let mut headers = HeaderMap::new();
    headers.append("a", HeaderValue::from_static("A"));
    headers.append("b", HeaderValue::from_static("A"));
    headers.append("b", HeaderValue::from_static("B"));

    let req = Request::new(Incoming {
        url: "/".to_owned(),
        headers,
        ..Default::default()
    });

    assert_eq!(req.headers().len(), 3);
    assert_eq!(req.header("a").as_deref(), Some("A"));
    assert_eq!(req.header("b").as_deref(), Some("A"));
    assert_eq!(req.header_all("b"), ["A", "B"]);
    assert!(req.header_all("c").is_empty());

    req.append_header(header::HeaderName::from_static("a"), HeaderValue::from_static("B"));
    req.append_header(header::HeaderName::from_static("a"), HeaderValue::from_static("C"));
    assert_eq!(req.header_all("a"), ["A", "B", "C"]);

    let old = req.insert_header(header::HeaderName::from_static("a"), HeaderValue::from_static("Z"));
    assert_eq!(old, Some(HeaderValue::from_static("A")));
    assert_eq!(req.header_all("a"), ["Z"]);

    // clones see the same headers
    let clone = req.clone();
    clone.insert_header(header::ACCEPT, HeaderValue::from_static("*/*"));
    assert_eq!(req.header(header::ACCEPT).as_deref(), Some("*/*"));
}

#[test]
fn case_insensitive() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("10.1.1.1"));

    let req = Request::new(Incoming {
        url: "/".to_owned(),
        headers,
        peer_addr: Some("10.0.0.2".to_owned()),
        ..Default::default()
    });

    assert_eq!(req.header("X-Forwarded-For").as_deref(), Some("10.1.1.1"));
    assert_eq!(req.client_ip().as_deref(), Some("10.1.1.1"));
    assert_eq!(req.proxy_ip().as_deref(), Some("10.0.0.2"));
}

#[test]
fn non_utf8_value() {
    let mut headers = HeaderMap::new();
    headers.insert("x-raw", HeaderValue::from_bytes(b"caf\xe9").unwrap());

    let req = Request::new(Incoming {
        url: "/".to_owned(),
        headers,
        ..Default::default()
    });

    assert_eq!(req.header("x-raw").as_deref(), Some("caf\u{fffd}"));
}
