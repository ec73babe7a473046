//! Mock path resolution.
//!
//! # Responsibilities
//! - Assemble the on-disk lookup key for a request, segment by segment
//! - Cap oversized properties segments with a content-hash prefix
//! - Classify requests that must never be looked up on disk
//!
//! # Design Decisions
//! - Deterministic: same request and data root always resolve to the
//!   same path
//! - Degrades instead of failing: an unparseable target URL drops the
//!   url and props segments, a missing base directory yields None
//! - SHA-1 is a key-shortening device here, not a security boundary

use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use url::Url;

use crate::config::HeaderMatch;
use crate::mockpath::sanitize::strip_special_chars;
use crate::mockpath::selectors::{select_headers, select_props};
use crate::mockpath::MockRequest;

/// Extension appended to every resolved mock path.
pub const MOCK_FILE_EXT: &str = ".mock";

/// Longest properties segment embedded verbatim; anything longer is
/// replaced by its hash plus a truncated prefix.
pub const PROPS_SEGMENT_CAP: usize = 120;

/// Segment used when the target URL has no path of its own.
const INDEX_SEGMENT: &str = "index";

/// Requests the proxy must never answer from the mock tree: an empty
/// url, the bare root, and everything under the reserved `/__` prefix
/// where the proxy's own endpoints live.
pub fn should_ignore(url: &str) -> bool {
    url.is_empty() || url == "/" || url.starts_with("/__")
}

/// Resolve the mock file path for a request under `data_root`.
///
/// Returns `None` when the route has no base directory configured, which
/// callers treat as "no mock available". Every other shape of input
/// resolves to some path; see the module docs for the segment order.
pub fn resolve_mock_path(req: &MockRequest, data_root: &Path, verbose: bool) -> Option<PathBuf> {
    // Mock data directory associated with the API call
    if req.conf.dir.is_empty() {
        return None;
    }
    let mut segments: Vec<String> = vec![req.conf.dir.clone()];
    if !req.method.is_empty() {
        segments.push(req.method.clone());
    }

    // Custom headers
    if req.conf.match_headers != HeaderMatch::None {
        let headers = select_headers(req);
        if !headers.is_empty() {
            segments.push(headers);
        }
    }

    // Everything derived from the target URL, query string included
    if let Ok(parts) = Url::parse(&req.url_to_proxy) {
        // REST parameters
        let url_path = url_path_segment(&parts);
        if url_path.is_empty() {
            segments.push(INDEX_SEGMENT.to_string());
        } else {
            segments.push(url_path);
        }

        // Query string
        let props = select_props(req);
        if !props.is_empty() {
            segments.push(cap_props_segment(props));
        }
    }

    let mut path = data_root.join(segments.join("/")).into_os_string();
    path.push(MOCK_FILE_EXT);
    let path = PathBuf::from(path);

    if verbose {
        tracing::info!(path = %path.display(), "Resolved mock path");
    }
    Some(path)
}

/// Sanitized path component of the target URL, with exactly the first
/// `/` removed. Empty when the URL has no path.
fn url_path_segment(url: &Url) -> String {
    strip_special_chars(&url.path().replacen('/', "", 1))
}

/// Keep short props segments verbatim; replace long ones with the SHA-1
/// of the full segment, a `-`, and the segment's first
/// [`PROPS_SEGMENT_CAP`] characters.
fn cap_props_segment(props: String) -> String {
    if props.len() <= PROPS_SEGMENT_CAP {
        return props;
    }
    let digest = Sha1::digest(props.as_bytes());
    let prefix: String = props.chars().take(PROPS_SEGMENT_CAP).collect();
    format!("{:x}-{}", digest, prefix)
}
