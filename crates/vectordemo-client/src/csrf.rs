//! CSRF cookie handling.
//!
//! The server issues a `csrftoken` cookie; every unsafe request must echo it
//! back in the `X-CSRFToken` header.

use cookie::Cookie;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Find the CSRF token among raw `Set-Cookie` header values. Each value is
/// one cookie; its attributes (`Path`, `Expires`, ...) are not cookies.
pub fn token_from_set_cookies<'a>(headers: impl IntoIterator<Item = &'a str>) -> Option<String> {
  headers
    .into_iter()
    .filter_map(|h| Cookie::parse(h).ok())
    .find(|c| c.name() == CSRF_COOKIE)
    .map(|c| c.value().to_owned())
    .filter(|value| !value.is_empty())
}
