//! URL resolution for `img src` values.
//!
//! [URL Standard](https://url.spec.whatwg.org/)

/// Resolve a potentially relative `href` against an optional base.
///
/// Absolute URLs (`http:`, `https:`, `data:`, `file:`) and absolute
/// filesystem paths are returned unchanged. Without a base the href is
/// returned as-is.
///
/// NOTE: This is a simplified implementation. `.` and `..` segments are
/// left for the server or filesystem to interpret.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    if href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("data:")
        || href.starts_with("file:")
    {
        return href.to_string();
    }

    let Some(base) = base_url else {
        return href.to_string();
    };

    if let Some(rest) = href.strip_prefix("//") {
        // Protocol-relative URL - reuse the base scheme
        let scheme = if base.starts_with("https:") { "https" } else { "http" };
        format!("{scheme}://{rest}")
    } else if href.starts_with('/') {
        // Absolute path - join with the base origin, if the base has one
        base.find("://").map_or_else(
            || href.to_string(),
            |scheme_end| {
                let after_scheme = &base[scheme_end + 3..];
                after_scheme.find('/').map_or_else(
                    || format!("{base}{href}"),
                    |path_start| format!("{}{href}", &base[..scheme_end + 3 + path_start]),
                )
            },
        )
    } else {
        // Relative path - join with the base directory
        let base_dir = if base.ends_with('/') {
            base.trim_end_matches('/')
        } else {
            base.rsplit_once('/').map_or(".", |(dir, _)| dir)
        };
        format!("{base_dir}/{href}")
    }
}
