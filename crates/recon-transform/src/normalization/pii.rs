//! Masking of personally identifiable values.
//!
//! Each PII subclass has one mask. The masks are irreversible and never look
//! at other rows, so a masked column carries no more information than its
//! shape (lengths, separators, domains).

use std::sync::LazyLock;

use regex::Regex;

use recon_model::RawValue;

/// Placeholder substituted for email addresses found inside notes.
pub const MASKED_EMAIL: &str = "<masked_email>";

/// Notes longer than this many characters are truncated.
pub const NOTE_LIMIT: usize = 200;

/// Characters of a national id kept before masking.
const NATIONAL_ID_VISIBLE: usize = 3;

static EMAIL_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("email pattern compiles"));

fn mask_digits(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_digit() { 'X' } else { c })
        .collect()
}

/// `name@example.com` → `n****@example.com`.
///
/// Splits on the first `@`; the domain is kept verbatim. A one-character
/// local part becomes `*`. Returns `None` when there is no `@`.
pub fn mask_email(email: &str) -> Option<String> {
    let (local, domain) = email.split_once('@')?;
    let mut chars = local.chars();
    let masked = match (chars.next(), chars.next()) {
        (Some(first), Some(_)) => format!("{first}****"),
        _ => "*".repeat(local.chars().count()),
    };
    Some(format!("{masked}@{domain}"))
}

/// Keeps the first three characters and replaces the rest with `X`.
pub fn mask_national_id(value: &str) -> String {
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < NATIONAL_ID_VISIBLE { c } else { 'X' })
        .collect()
}

/// Digits become `X`, email addresses become [`MASKED_EMAIL`], and the result
/// is cut to [`NOTE_LIMIT`] characters followed by `...`.
pub fn mask_note(note: &str) -> String {
    let digits_masked = mask_digits(note);
    let masked = EMAIL_LIKE.replace_all(&digits_masked, MASKED_EMAIL);
    if masked.chars().count() > NOTE_LIMIT {
        let mut truncated: String = masked.chars().take(NOTE_LIMIT).collect();
        truncated.push_str("...");
        truncated
    } else {
        masked.into_owned()
    }
}

/// Every digit becomes `X`; separators and prefixes stay.
pub fn mask_phone(phone: &str) -> String {
    mask_digits(phone)
}

/// Only text values can be emails; anything else is blanked.
pub fn normalize_email(value: &RawValue) -> String {
    match value {
        RawValue::Text(text) => mask_email(text).unwrap_or_default(),
        _ => String::new(),
    }
}

pub fn normalize_national_id(value: &RawValue) -> String {
    mask_national_id(&value.to_text())
}

pub fn normalize_note(value: &RawValue) -> String {
    if value.is_null() {
        return String::new();
    }
    mask_note(&value.to_text())
}

pub fn normalize_phone(value: &RawValue) -> String {
    mask_phone(&value.to_text())
}
