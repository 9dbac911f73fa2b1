//! Built-in recognizers for common PII categories
//!
//! This is a fixed, versioned table. It is not user-configurable; custom
//! definitions for the same label shadow a built-in instead of editing it.

use super::definition::{LanguageScope, RecognizerDefinition, Rule, Validator};

/// Version of the built-in table
pub const PREDEFINED_VERSION: &str = "2024.1";

struct PredefinedEntry {
    label: &'static str,
    rules: &'static [(&'static str, &'static str, f64)],
    context: &'static [&'static str],
    /// `None` applies to every language
    language: Option<&'static str>,
    validator: Option<Validator>,
}

const PREDEFINED: &[PredefinedEntry] = &[
    PredefinedEntry {
        label: "EMAIL_ADDRESS",
        rules: &[(
            "email",
            r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b",
            0.5,
        )],
        context: &["email", "e-mail", "mail"],
        language: None,
        validator: None,
    },
    PredefinedEntry {
        label: "PHONE_NUMBER",
        rules: &[
            (
                "uk_phone",
                r"(?:\B\+44\s?|\b0)(?:\d\s?){8,9}\d\b",
                0.4,
            ),
            (
                "us_phone",
                r"(?:\B\+1[\-.\s]?\(?|\b1[\-.\s]?\(?|\B\(|\b)\d{3}\)?[\-.\s]?\d{3}[\-.\s]?\d{4}\b",
                0.4,
            ),
            (
                "international_phone",
                r"\B\+\d{1,3}[\-.\s]?\d{2,4}[\-.\s]?\d{3,4}[\-.\s]?\d{3,4}\b",
                0.4,
            ),
        ],
        context: &["phone", "number", "telephone", "cell", "mobile", "call"],
        language: Some("en"),
        validator: None,
    },
    PredefinedEntry {
        label: "CREDIT_CARD",
        rules: &[("all_credit_cards", r"\b(?:\d{4}[\- ]?){3}\d{1,4}\b", 0.3)],
        context: &["credit", "card", "visa", "mastercard", "amex", "cc", "debit"],
        language: None,
        validator: Some(Validator::Luhn),
    },
    PredefinedEntry {
        label: "IBAN_CODE",
        rules: &[(
            "iban",
            r"\b[A-Z]{2}\d{2}[ ]?(?:[A-Z0-9]{4}[ ]?){2,7}[A-Z0-9]{1,4}\b",
            0.5,
        )],
        context: &["iban", "bank", "transaction"],
        language: None,
        validator: None,
    },
    PredefinedEntry {
        label: "IP_ADDRESS",
        rules: &[
            (
                "ipv4",
                r"\b(?:(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\b",
                0.6,
            ),
            ("ipv6", r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b", 0.6),
        ],
        context: &["ip", "ipv4", "ipv6"],
        language: None,
        validator: None,
    },
    PredefinedEntry {
        label: "URL",
        rules: &[(
            "url",
            r#"\b(?:https?://|www\.)[^\s<>"']+[^\s<>"'.,;:!?)]"#,
            0.5,
        )],
        context: &["url", "website", "link"],
        language: None,
        validator: None,
    },
    PredefinedEntry {
        label: "US_SSN",
        rules: &[(
            "ssn",
            r"\b(?:0(?:0[1-9]|[1-9]\d)|[1-578]\d\d|6(?:[0-57-9]\d|6[0-57-9]))-(?:0[1-9]|[1-9]\d)-(?:000[1-9]|00[1-9]\d|0[1-9]\d\d|[1-9]\d{3})\b",
            0.5,
        )],
        context: &["social", "security", "ssn", "ssns"],
        language: Some("en"),
        validator: None,
    },
    PredefinedEntry {
        label: "UK_NHS",
        rules: &[("nhs", r"\b\d{3}[ \-]?\d{3}[ \-]?\d{4}\b", 0.3)],
        context: &["nhs", "national health", "health service"],
        language: Some("en"),
        validator: None,
    },
    PredefinedEntry {
        label: "DATE_TIME",
        rules: &[
            (
                "numeric_date",
                r"\b(?:0?[1-9]|[12]\d|3[01])[/\-.](?:0?[1-9]|1[0-2])[/\-.](?:19|20)\d{2}\b",
                0.4,
            ),
            ("iso_date", r"\b(?:19|20)\d{2}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])\b", 0.5),
            (
                "written_date",
                r"(?i)\b(?:0?[1-9]|[12]\d|3[01])(?:st|nd|rd|th)?\s+(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\s+(?:19|20)\d{2}\b",
                0.6,
            ),
        ],
        context: &["birth", "dob", "date", "born"],
        language: Some("en"),
        validator: None,
    },
    PredefinedEntry {
        label: "CRYPTO",
        rules: &[(
            "bitcoin",
            r"\b(?:bc1|[13])[a-zA-HJ-NP-Z0-9]{25,59}\b",
            0.5,
        )],
        context: &["wallet", "btc", "bitcoin", "crypto"],
        language: None,
        validator: None,
    },
];

/// Build definitions for every built-in recognizer, in table order
pub fn predefined_definitions() -> Vec<RecognizerDefinition> {
    PREDEFINED
        .iter()
        .map(|entry| RecognizerDefinition {
            entity_label: entry.label.to_string(),
            rules: entry
                .rules
                .iter()
                .map(|(name, regex, score)| Rule::new(*name, *regex, *score))
                .collect(),
            context_keywords: entry.context.iter().map(|c| c.to_string()).collect(),
            language: entry
                .language
                .map(|code| LanguageScope::Only(code.to_string()))
                .unwrap_or(LanguageScope::Any),
            validator: entry.validator,
        })
        .collect()
}
