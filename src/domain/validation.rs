//! Product submission rules: keyword blocklist and price bounds.

use super::error::DomainError;

/// Words that may not appear in product names or descriptions.
const FORBIDDEN_WORDS: &[&str] = &[
    "casino",
    "cryptocurrency",
    "crypto",
    "exchange",
    "cheap",
    "free",
    "scam",
    "police",
    "radar",
];

/// Reject names containing a blocklisted word (case-insensitive).
pub fn validate_product_name(name: &str) -> Result<(), DomainError> {
    check_forbidden("name", name)
}

/// Reject descriptions containing a blocklisted word (case-insensitive).
pub fn validate_product_description(description: &str) -> Result<(), DomainError> {
    check_forbidden("description", description)
}

/// Price must be strictly positive.
pub fn validate_price_cents(price_cents: i64) -> Result<(), DomainError> {
    if price_cents < 0 {
        return Err(DomainError::validation(
            "price must not be negative; enter a positive value",
        ));
    }
    if price_cents == 0 {
        return Err(DomainError::validation(
            "price must not be zero; enter a positive value",
        ));
    }
    Ok(())
}

fn check_forbidden(field: &str, text: &str) -> Result<(), DomainError> {
    let lowered = text.to_lowercase();
    for word in FORBIDDEN_WORDS {
        if lowered.contains(word) {
            return Err(DomainError::validation(format!(
                "{field} contains a forbidden word: `{word}`"
            )));
        }
    }
    Ok(())
}
