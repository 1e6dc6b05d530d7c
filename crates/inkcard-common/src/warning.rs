//! Renderer warnings routed through the `log` facade.
//!
//! Provides deduplication to avoid spamming the same warning for every node
//! that carries an ignored property.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about accepted-but-ignored input (logs once per unique message)
///
/// # Example
/// ```
/// inkcard_common::warning::warn_once("CSS", "unsupported unit in width: 2em");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_log = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_log {
        log::warn!(target: "inkcard", "[{component}] {message}");
    }
}

/// Clear all recorded warnings (call between unrelated documents)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
