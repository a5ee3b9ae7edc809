//! Renderer warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used wherever input is accepted leniently instead of rejected, e.g. a
//! color token that resolves to nothing and falls back to the default.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about lenient handling of some input (prints once per unique message).
///
/// Returns `true` if the message was printed, `false` if it was a duplicate.
///
/// # Example
/// ```ignore
/// warn_once("markup", "unknown color 'gold', using default");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[cardgen {component}] ⚠ {message}").yellow());
    }
    should_print
}
