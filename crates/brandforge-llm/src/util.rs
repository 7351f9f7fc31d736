//! Common utilities for vendor adapters
//!
//! Helpers shared by the HTTP adapters in [`crate::providers`] for keeping
//! credentials out of logs and error messages.

/// Minimum key length to display partial key
const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 8;

/// Number of characters to show at start/end of masked key
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Longest vendor message passed through verbatim
const MAX_PASSTHROUGH_MESSAGE_LEN: usize = 200;

/// Sensitive patterns to filter from error messages
const SENSITIVE_PATTERNS: &[&str] = &[
    "api_key",
    "api-key",
    "apikey",
    "authorization",
    "bearer",
    "token",
    "secret",
    "password",
    "credential",
];

/// Mask API key for safe display in logs
///
/// # Examples
/// ```
/// use brandforge_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("sk-1234567890abcdef"), "sk-1...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY || !key.is_ascii() {
        return "****".to_string();
    }
    format!(
        "{}...{}",
        &key[..KEY_MASK_VISIBLE_CHARS],
        &key[key.len() - KEY_MASK_VISIBLE_CHARS..]
    )
}

/// Sanitize a vendor error body before it lands in a [`crate::VendorError`]
///
/// # Examples
/// ```
/// use brandforge_llm::util::sanitize_vendor_message;
/// assert_eq!(
///     sanitize_vendor_message("Invalid api_key provided"),
///     "An API error occurred. Please try again."
/// );
/// assert_eq!(sanitize_vendor_message("Connection timeout"), "Connection timeout");
/// ```
#[must_use]
pub fn sanitize_vendor_message(message: &str) -> String {
    let lower = message.to_lowercase();

    if SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return "An API error occurred. Please try again.".to_string();
    }

    if message.len() > MAX_PASSTHROUGH_MESSAGE_LEN {
        let mut end = MAX_PASSTHROUGH_MESSAGE_LEN;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        return format!("{}...", &message[..end]);
    }

    message.to_string()
}
