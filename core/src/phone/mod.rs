//! Phone number normalization for the verification workflow.
//!
//! Normalization is a pure, total function used identically at issuance,
//! checking, and gating. Its output is the storage key for all record
//! lookups, so any drift between call sites would silently break
//! verification; keep every caller on [`normalize_phone`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Channel-qualifier prefixes stripped from inbound numbers. Delivery
/// transports tag sender addresses this way (e.g. `whatsapp:+52155...`).
const CHANNEL_PREFIXES: [&str; 2] = ["whatsapp:", "sms:"];

/// Canonical form: `+` followed by 12-15 digits (E.164 upper bound).
static CANONICAL_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+\d{12,15}$").unwrap());

/// Checks whether a string is already in canonical form.
pub fn is_canonical_phone(phone: &str) -> bool {
    CANONICAL_PHONE.is_match(phone)
}

/// Normalizes a raw phone representation to its canonical form.
///
/// Accepted shapes, after stripping a channel prefix, whitespace, and
/// punctuation:
/// - 10-digit national numbers, prefixed with `+` and the default
///   country calling code
/// - 12-digit strings beginning with the default country calling code,
///   prefixed with `+`
/// - `+`-prefixed strings of at least 12 digits, kept as-is
///
/// Anything else is format-invalid. The function is idempotent:
/// canonical output re-normalizes to itself.
///
/// # Arguments
///
/// * `raw` - Phone number in any accepted inbound shape
/// * `default_country_code` - Calling code assumed for national numbers
///
/// # Returns
///
/// * `Some(String)` - Canonical phone number usable as a storage key
/// * `None` - The input is not a valid phone number
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Option<String> {
    let mut rest = raw.trim();
    for prefix in CHANNEL_PREFIXES {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    let rest = rest.trim();

    let has_plus = rest.starts_with('+');
    let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).collect();

    let candidate = if has_plus {
        format!("+{digits}")
    } else if digits.len() == 10 {
        format!("+{default_country_code}{digits}")
    } else if digits.len() == 12 && digits.starts_with(default_country_code) {
        format!("+{digits}")
    } else {
        return None;
    };

    is_canonical_phone(&candidate).then_some(candidate)
}

/// Masks a phone number for logging, keeping only the last 4 digits.
pub fn mask_phone(phone: &str) -> String {
    if phone.len() <= 4 {
        return "*".repeat(phone.len());
    }
    format!("***{}", &phone[phone.len() - 4..])
}
