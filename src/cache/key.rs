//! Cache key derivation

use reqwest::Method;

/// Build the cache key for a request signature.
///
/// The key is `method:url:body`, with an absent body keyed as the empty
/// string. The body is used verbatim, so two bodies that differ only in
/// whitespace or field order are distinct requests.
pub fn cache_key(method: &Method, url: &str, body: Option<&str>) -> String {
    format!("{}:{}:{}", method, url, body.unwrap_or(""))
}
