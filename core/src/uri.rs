//! Host and port extraction from service connection URIs.
//!
//! Two shapes are accepted:
//!
//! - `scheme://[userinfo@]host:port[/path][?query][#fragment]` yields the
//!   raw `host` and `port` substrings. The authority must contain exactly
//!   one `:`; bracketed IPv6 literals are not understood and are rejected.
//!   The port is checked for digits only, never for range, and the host may
//!   be empty.
//! - `scheme:opaque` (no `//`) yields the scheme as the host and the opaque
//!   part as the port, both exactly as written. Some services publish their
//!   endpoints this way.

use url::Url;

use crate::error::UriError;

/// Split `uri` into `(host, port)`.
pub fn host_port(uri: &str) -> Result<(String, String), UriError> {
    if let Some(bad) = uri.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(malformed(uri, format!("invalid character {bad:?}")));
    }
    let (scheme, rest) = split_scheme(uri)?;

    let Some(after_slashes) = rest.strip_prefix("//") else {
        // Validate the whole string before handing back the opaque part.
        parse(uri)?;
        return Ok((scheme.to_string(), opaque_part(rest).to_string()));
    };

    let authority = authority(after_slashes);
    if let Some(bad) = authority.chars().find(|c| !is_authority_char(*c)) {
        return Err(malformed(uri, format!("invalid character {bad:?} in authority")));
    }
    check_tail(uri, &after_slashes[authority.len()..])?;
    check_percent_escapes(uri, after_slashes)?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    let mut segments = host_port.split(':');
    let (Some(host), Some(port), None) = (segments.next(), segments.next(), segments.next())
    else {
        return Err(UriError::InvalidHost {
            authority: host_port.to_string(),
        });
    };

    if !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(uri, format!("invalid port {port:?}")));
    }
    Ok((host.to_string(), port.to_string()))
}

/// Validate the RFC 3986 scheme and return it with the remainder after `:`.
fn split_scheme(uri: &str) -> Result<(&str, &str), UriError> {
    let Some((scheme, rest)) = uri.split_once(':') else {
        return Err(malformed(uri, "missing scheme"));
    };
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        return Err(malformed(uri, format!("invalid scheme {scheme:?}")));
    }
    Ok((scheme, rest))
}

fn parse(uri: &str) -> Result<Url, UriError> {
    Url::parse(uri).map_err(|e| malformed(uri, e.to_string()))
}

/// The authority runs up to the first `/`, `?` or `#`.
fn authority(after_slashes: &str) -> &str {
    let end = after_slashes
        .find(['/', '?', '#'])
        .unwrap_or(after_slashes.len());
    &after_slashes[..end]
}

/// Opaque part without query or fragment; empty for rooted paths.
fn opaque_part(rest: &str) -> &str {
    if rest.starts_with('/') {
        return "";
    }
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// Path, query and fragment after the authority. Only one `#` may appear.
fn check_tail(uri: &str, tail: &str) -> Result<(), UriError> {
    let (before_fragment, fragment) = tail.split_once('#').unwrap_or((tail, ""));
    for c in before_fragment.chars().chain(fragment.chars()) {
        if !(is_pchar(c) || matches!(c, '/' | '?')) {
            return Err(malformed(uri, format!("invalid character {c:?}")));
        }
    }
    Ok(())
}

/// Every `%` must start a two-hex-digit escape.
fn check_percent_escapes(uri: &str, s: &str) -> Result<(), UriError> {
    let bytes = s.as_bytes();
    for (i, _) in s.match_indices('%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(malformed(uri, "invalid percent escape"));
        }
    }
    Ok(())
}

/// unreserved / pct-encoded / sub-delims / ":" / "@"
fn is_pchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '.' | '_' | '~' | '%' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ','
                | ';' | '=' | ':' | '@'
        )
}

fn is_authority_char(c: char) -> bool {
    is_pchar(c) || matches!(c, '[' | ']')
}

fn malformed(uri: &str, reason: impl Into<String>) -> UriError {
    UriError::Malformed {
        uri: uri.to_string(),
        reason: reason.into(),
    }
}
