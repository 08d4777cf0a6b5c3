//! Request ID generation and response header helpers.

use salvo::{http::header::HeaderValue, prelude::Response};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse the caller's request ID when it sent a usable one.
pub(super) fn resolve_request_id(header_value: Option<String>) -> String {
    header_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => {
            warn!(
                request_id,
                "could not encode request id for response header: {source}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_request_id_is_reused() {
        assert_eq!(resolve_request_id(Some(" abc ".to_string())), "abc");
    }

    #[test]
    fn blank_or_oversized_request_id_is_replaced() {
        let blank = resolve_request_id(Some("  ".to_string()));
        let oversized = resolve_request_id(Some("x".repeat(129)));

        assert!(Uuid::parse_str(&blank).is_ok(), "expected generated id, got {blank}");
        assert!(Uuid::parse_str(&oversized).is_ok(), "expected generated id, got {oversized}");
    }
}
