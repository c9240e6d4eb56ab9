use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Canonical form used to match integration names from the command line or
/// configuration against catalog names: spaces and `/` removed, lowercased.
///
/// `"Microsoft Azure Sentinel"`, `"microsoftazuresentinel"` and
/// `"MicrosoftAzureSentinel"` all normalize to the same value.
pub fn normalize_integration_name(name: &str) -> String {
    name.chars()
        .filter(|character| *character != ' ' && *character != '/')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split a comma separated list into normalized, non-empty integration names.
pub fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_integration_name)
        .filter(|name| !name.is_empty())
        .collect()
}

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)(appkey:\s*)([^\s,;]+)"#,
        r#"(?i)("appKey"\s*:\s*")([^"]*)"#,
        r#"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)"#,
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redact values that look like credentials before they reach a log line.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in SENSITIVE_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |caps: &Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}<redacted>")
            })
            .into_owned();
    }
    redacted
}
