//! List and text helpers shared by the store and the interface.

use std::collections::HashSet;

/// Splits a comma-separated tag line, trims every entry, drops empties and
/// exact duplicates.  Order of first appearance is kept.
pub fn prettify_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_string()))
        .map(str::to_string)
        .collect()
}

/// `base` followed by every tag of `extra` not already present, compared
/// case-insensitively.
pub fn merge_tags(base: &[String], extra: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(base.len() + extra.len());
    for tag in base.iter().chain(extra) {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.to_lowercase()) {
            merged.push(tag.to_string());
        }
    }
    merged
}

/// Combines two note bodies.  When one already contains the other the
/// longer one wins, otherwise `extra` is appended after a blank line.
pub fn merge_text(base: &str, extra: &str) -> String {
    let (trimmed_base, trimmed_extra) = (base.trim(), extra.trim());
    if trimmed_extra.is_empty() || trimmed_base.contains(trimmed_extra) {
        return base.to_string();
    }
    if trimmed_base.is_empty() || trimmed_extra.contains(trimmed_base) {
        return extra.to_string();
    }
    format!("{}\n\n{}", base.trim_end(), extra.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn prettify_trims_and_dedupes() {
        assert_eq!(prettify_list(" go, lang,,go ,  "), list(&["go", "lang"]));
        assert!(prettify_list("").is_empty());
    }

    #[test]
    fn merge_tags_ignores_case_duplicates() {
        let merged = merge_tags(&list(&["Go", "lang"]), &list(&["go", "google", " "]));
        assert_eq!(merged, list(&["Go", "lang", "google"]));
    }

    #[test]
    fn merge_text_appends_new_content() {
        assert_eq!(merge_text("first", "second"), "first\n\nsecond");
    }

    #[test]
    fn merge_text_keeps_containing_side() {
        assert_eq!(merge_text("alpha beta", "beta"), "alpha beta");
        assert_eq!(merge_text("beta", "alpha beta"), "alpha beta");
        assert_eq!(merge_text("", "new"), "new");
        assert_eq!(merge_text("old", "  "), "old");
    }
}
