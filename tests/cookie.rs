use std::collections::HashMap;

use herd::cookie;

#[test]
fn parse() {
    assert!(cookie::parse("").is_empty());
    assert!(cookie::parse("malformedcookie").is_empty());

    let cookies = cookie::parse("name=value; signed_name=s:abc.def");
    let expected = HashMap::from([
        ("name".to_owned(), "value".to_owned()),
        ("signed_name".to_owned(), "s:abc.def".to_owned()),
    ]);
    assert_eq!(cookies, expected);
}

#[test]
fn parse_lenient() {
    let cookies = cookie::parse(" a = 1 ;;=orphan; b==2; junk ; c=; d=x=y");

    assert_eq!(cookies.len(), 4);
    assert_eq!(cookies["a"], "1");
    assert_eq!(cookies["b"], "=2");
    assert_eq!(cookies["c"], "");
    assert_eq!(cookies["d"], "x=y");
}

#[test]
fn parse_last_wins() {
    let cookies = cookie::parse("a=1; a=2");
    assert_eq!(cookies["a"], "2");
}

#[test]
fn sign() {
    let signed = cookie::sign("hello", "secret");

    // HMAC-SHA256("secret", "hello")
    assert_eq!(
        signed,
        "s:hello.88aab3ede8d3adf94d26ab90d3bafd4a2083070c3bcce9c014ee04a443847c0b"
    );
}

#[test]
fn unsign() {
    for value in ["a", "abc123", "SessionToken9", ""] {
        for secret in ["secret", "", "a much longer secret than the block size of sha-256, which is sixty-four bytes"] {
            let signed = cookie::sign(value, secret);
            assert_eq!(cookie::unsign(&signed, secret).as_deref(), Some(value));
        }
    }
}

#[test]
fn unsign_mismatch() {
    let signed = cookie::sign("abc", "secret");

    assert_eq!(cookie::unsign(&signed, "wrong"), None);
    assert_eq!(cookie::unsign("s:abc.def", "secret"), None);
    assert_eq!(cookie::unsign(&signed.replacen("abc", "abd", 1), "secret"), None);

    // not in signed form
    assert_eq!(cookie::unsign("abc", "secret"), None);
    assert_eq!(cookie::unsign(&signed[2..], "secret"), None);
    assert_eq!(cookie::unsign("s:abc", "secret"), None);
    assert_eq!(cookie::unsign("s:abc.zz", "secret"), None);
}

#[test]
fn unsign_uppercase_signature() {
    let signed = cookie::sign("abc", "k");
    let (value, signature) = signed.rsplit_once('.').unwrap();
    let upper = format!("{}.{}", value, signature.to_ascii_uppercase());

    assert_ne!(upper, signed);
    assert_eq!(cookie::unsign(&signed, "k").as_deref(), Some("abc"));
    assert_eq!(cookie::unsign(&upper, "k"), None);
}

#[test]
fn unsign_dotted_value() {
    let signed = cookie::sign("a.b.c", "secret");
    assert_eq!(cookie::unsign(&signed, "secret").as_deref(), Some("a.b.c"));
}
