//! Cookie header parsing and signed cookie values.
//!
//! A signed value has the form `s:<value>.<signature>`, where the
//! signature is the lowercase hex HMAC-SHA256 of `<value>` keyed with a
//! shared secret.
//!
//! ```
//! use herd::cookie;
//!
//! let signed = cookie::sign("user42", "secret");
//! assert_eq!(cookie::unsign(&signed, "secret").as_deref(), Some("user42"));
//! assert_eq!(cookie::unsign(&signed, "other secret"), None);
//! ```

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNED_PREFIX: &str = "s:";

/// Parse the value of a `Cookie` header into a name to value map.
///
/// Segments without an `=` or with an empty name are skipped. Names
/// and values are trimmed but otherwise kept as sent. If a name is
/// repeated, the last value wins.
pub fn parse(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|segment| {
            let (name, value) = segment.split_once('=')?;
            let name = name.trim();

            if name.is_empty() {
                return None;
            }

            Some((name.to_owned(), value.trim().to_owned()))
        })
        .collect()
}

/// Sign a cookie value with `secret`.
pub fn sign(value: &str, secret: impl AsRef<[u8]>) -> String {
    let signature = mac(secret.as_ref(), value).finalize().into_bytes();
    format!("{}{}.{}", SIGNED_PREFIX, value, hex::encode(signature))
}

/// Verify a signed cookie value and return the original value.
///
/// Returns `None` if the value is not in signed form or if the
/// signature does not match `secret`. The signature is compared in
/// constant time.
///
/// The value is separated from the signature at the last `.`, so
/// values that contain a `.` themselves are handled. Only the lowercase
/// hex produced by [`sign`] is accepted.
pub fn unsign(signed: &str, secret: impl AsRef<[u8]>) -> Option<String> {
    let (value, signature) = signed.strip_prefix(SIGNED_PREFIX)?.rsplit_once('.')?;
    if signature.bytes().any(|b| b.is_ascii_uppercase()) {
        return None;
    }

    let signature = hex::decode(signature).ok()?;

    match mac(secret.as_ref(), value).verify_slice(&signature) {
        Ok(()) => Some(value.to_owned()),
        Err(_) => {
            tracing::debug!("cookie signature mismatch");
            None
        }
    }
}

fn mac(secret: &[u8], value: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(value.as_bytes());
    mac
}
