// Corporate email-pattern generation for discovered contacts.
//
// Given a person's name and a company domain, produce the candidate
// addresses an outreach step would try. No verification happens here.

use std::collections::BTreeSet;

/// Split a display name into lowercase (first, last). Single-token names
/// yield an empty last name; middle names are dropped.
pub fn normalize_name(name: &str) -> (String, String) {
    let lowered = name.trim().to_lowercase();
    let mut parts = lowered.split_whitespace();

    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.last().unwrap_or_default().to_string();
    (first, last)
}

/// Generate the common corporate address shapes for (first, last) at
/// `domain`, deduplicated and sorted. Shapes that collapse to a bare
/// `@domain` (both name parts empty) are filtered out.
pub fn generate_patterns(first: &str, last: &str, domain: &str) -> Vec<String> {
    let fi = first.chars().next().map(String::from).unwrap_or_default();
    let li = last.chars().next().map(String::from).unwrap_or_default();

    let candidates = [
        format!("{first}@{domain}"),
        format!("{last}@{domain}"),
        format!("{first}{last}@{domain}"),
        format!("{first}.{last}@{domain}"),
        format!("{first}_{last}@{domain}"),
        format!("{first}-{last}@{domain}"),
        format!("{first}{li}@{domain}"),
        format!("{first}.{li}@{domain}"),
        format!("{fi}{last}@{domain}"),
        format!("{fi}.{last}@{domain}"),
        format!("{fi}{li}@{domain}"),
        format!("{first}{last}{li}@{domain}"),
        format!("{last}{first}@{domain}"),
    ];

    candidates
        .into_iter()
        .filter(|email| {
            let local = email.split('@').next().unwrap_or_default();
            !local.is_empty() && !local.starts_with(['.', '_', '-']) && !local.ends_with(['.', '_', '-'])
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Convenience wrapper for a raw display name.
pub fn patterns_for(name: &str, domain: &str) -> Vec<String> {
    let (first, last) = normalize_name(name);
    generate_patterns(&first, &last, domain)
}
