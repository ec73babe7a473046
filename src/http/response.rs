//! Response writing.
//!
//! # Responsibilities
//! - Write a recorded response out to the client (`passthru`)
//! - Gzip the body when the recorded headers ask for it
//! - Map internal failures to a fixed plain-text 500 (`error_response`)

use std::io::Write;

use axum::body::Body;
use axum::http::{header, HeaderMap, Response, StatusCode};
use flate2::write::GzEncoder;
use flate2::Compression;

/// Body of the fixed 500 answer. Wire-compatible with recorded clients.
const ERROR_BODY: &str = "An error has occured, please review the logs.";

/// Build a client response from recorded status, headers and body.
///
/// When the supplied headers carry `content-encoding: gzip` the body is
/// compressed before sending; the headers are forwarded as-is either
/// way. Failures while building degrade to [`error_response`].
pub fn passthru(code: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Response<Body> {
    let wants_gzip = headers
        .get(header::CONTENT_ENCODING)
        .is_some_and(|v| v.as_bytes() == b"gzip");

    let body = if wants_gzip {
        match gzip(&body) {
            Ok(compressed) => compressed,
            Err(e) => {
                tracing::warn!(error = %e, "Error writing response");
                return error_response(&e);
            }
        }
    } else {
        body
    };

    let mut builder = Response::builder().status(code);
    if let Some(header_map) = builder.headers_mut() {
        header_map.extend(headers);
    }
    builder.body(Body::from(body)).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Error writing response");
        error_response(&e)
    })
}

/// The fixed plain-text 500 answer for internal failures.
pub fn error_response(err: &dyn std::fmt::Display) -> Response<Body> {
    tracing::error!(error = %err, "Request failed");
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(ERROR_BODY))
        .expect("static 500 response is always buildable")
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_passthru_plain_body() {
        let response = passthru(StatusCode::OK, HeaderMap::new(), b"{\"id\":7}".to_vec());
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_passthru_forwards_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        let response = passthru(StatusCode::CREATED, headers, Vec::new());

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_passthru_gzips_when_asked() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_ENCODING, "gzip".parse().unwrap());
        let payload = b"a payload long enough to be worth compressing".to_vec();
        let response = passthru(StatusCode::OK, headers, payload.clone());

        let compressed = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let mut decoder = GzDecoder::new(compressed.as_ref());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).unwrap();
        assert_eq!(decompressed, payload);
    }

    #[test]
    fn test_error_response_shape() {
        let response = error_response(&"boom");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );
    }
}
