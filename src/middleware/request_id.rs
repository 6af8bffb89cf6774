//! Request ids
//!
//! Every request gets an `x-request-id` (a UUID unless the shell sent one),
//! echoed on the response and forwarded to the back office so one id
//! follows a page load through both services' logs.

use axum::http::{HeaderMap, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest id forwarded upstream
const MAX_ID_LEN: usize = 128;

/// Set a request id when missing, and copy it onto the response.
pub fn request_id_layer() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid),
        PropagateRequestIdLayer::new(X_REQUEST_ID),
    )
}

/// The request id to forward, if it is a short run of visible ASCII.
///
/// Shell-supplied ids are passed through the set layer untouched, so this
/// is where oversized or odd values are dropped.
pub fn forwarded_request_id(headers: &HeaderMap) -> Option<String> {
    let id = headers.get(X_REQUEST_ID)?.to_str().ok()?;
    let usable = !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_str(id).unwrap());
        headers
    }

    #[test]
    fn plain_ids_are_forwarded() {
        assert_eq!(
            forwarded_request_id(&headers("4f1c2a9e-req")).as_deref(),
            Some("4f1c2a9e-req")
        );
        assert_eq!(forwarded_request_id(&HeaderMap::new()), None);
    }

    #[test]
    fn odd_ids_are_dropped() {
        assert_eq!(forwarded_request_id(&headers("has space")), None);
        assert_eq!(forwarded_request_id(&headers(&"x".repeat(MAX_ID_LEN + 1))), None);
    }
}
