//! Resource fetching for the inkcard renderer.
//!
//! Fetches are synchronous: a slow remote image blocks the render that
//! requested it. There is no retry and no cache.
use base64::Engine;
use log::debug;
use std::fs;
use std::time::Duration;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("inkcard/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// A parsed `data:` URL that can be decoded into raw bytes.
///
/// [RFC 2397](https://www.rfc-editor.org/rfc/rfc2397)
pub struct DataUrl<'a> {
    /// Everything between `data:` and the first comma.
    metadata: &'a str,
    /// The payload after the comma.
    payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Split a raw `data:` URL into metadata and payload.
    ///
    /// # Errors
    ///
    /// Returns an error string if the URL lacks the `data:` scheme or the
    /// separating comma.
    pub fn parse(raw: &'a str) -> Result<Self, String> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| format!("not a data URL: {raw}"))?;
        let (metadata, payload) = rest
            .split_once(',')
            .ok_or_else(|| "invalid data URL: missing comma".to_string())?;
        Ok(Self { metadata, payload })
    }

    /// The declared media type, e.g. `image/png`.
    #[must_use]
    pub fn media_type(&self) -> &'a str {
        self.metadata.split(';').next().unwrap_or_default()
    }

    /// Decode the payload into raw bytes.
    ///
    /// Only base64 payloads are supported.
    ///
    /// # Errors
    ///
    /// Returns an error string if the encoding is not base64 or the payload
    /// is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, String> {
        if !self.metadata.ends_with(";base64") {
            return Err(format!("unsupported data URL encoding: {}", self.metadata));
        }
        base64::engine::general_purpose::STANDARD
            .decode(self.payload.trim())
            .map_err(|e| format!("base64 decode error: {e}"))
    }
}

/// Fetch a URL and return its body as raw bytes.
///
/// # Errors
///
/// Returns an error string if the HTTP client cannot be created, the request
/// fails, the response has a non-success status, or the body cannot be read.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| format!("failed to create HTTP client: {e}"))?;

    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|e| format!("request failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| format!("failed to read response body: {e}"))
}

/// Fetch the bytes behind `resolved_url`.
///
/// `http://` and `https://` go over the network, `data:` URLs are decoded in
/// place, anything else is read from the local filesystem (a leading
/// `file://` is stripped).
///
/// # Errors
///
/// Returns an error string if the fetch fails (network error, file not
/// found, or invalid data URL).
pub fn fetch_resource(resolved_url: &str) -> Result<Vec<u8>, String> {
    if resolved_url.starts_with("http://") || resolved_url.starts_with("https://") {
        debug!("fetching {resolved_url}");
        fetch_bytes(resolved_url)
    } else if resolved_url.starts_with("data:") {
        DataUrl::parse(resolved_url)?.decode()
    } else {
        let path = resolved_url.strip_prefix("file://").unwrap_or(resolved_url);
        fs::read(path).map_err(|e| format!("failed to read '{path}': {e}"))
    }
}
