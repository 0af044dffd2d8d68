//! Name disambiguation strategies
//!
//! Targets and tasks resolve name collisions differently, and both
//! behaviours are observable in the names users see on the scan manager:
//!
//! - targets take the first vacant `"{name} ({n})"` slot, counting from 0;
//! - tasks append the number of existing matches, `"{name} ({count})"`.
//!
//! The mismatch looks accidental. It is kept until someone decides which
//! naming scheme existing installations should converge on.

use std::collections::HashSet;

/// First name not in `existing`: `name` itself, else `"{name} ({n})"` for the
/// smallest free `n >= 0`.
pub fn vacant_slot_name(name: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(name) {
        return name.to_string();
    }

    (0usize..)
        .map(|n| format!("{} ({})", name, n))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// `base` when nothing matches yet, else `"{base} ({matches})"`.
///
/// Does not check whether the suffixed name is itself taken.
pub fn count_suffixed_name(base: &str, matches: usize) -> String {
    if matches == 0 {
        base.to_string()
    } else {
        format!("{} ({})", base, matches)
    }
}

/// Manager filter matching names that contain `name`, all rows
pub fn name_filter(name: &str) -> String {
    format!("rows=-1 name~\"{}\"", name.replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vacant_slot_unused_name() {
        assert_eq!(vacant_slot_name("target", &names(&["other"])), "target");
    }

    #[test]
    fn test_vacant_slot_first_free_counter() {
        let existing = names(&["target", "target (0)", "target (1)"]);
        assert_eq!(vacant_slot_name("target", &existing), "target (2)");
    }

    #[test]
    fn test_vacant_slot_fills_gap() {
        let existing = names(&["target", "target (1)", "target (2)"]);
        assert_eq!(vacant_slot_name("target", &existing), "target (0)");
    }

    #[test]
    fn test_name_filter_quotes_value() {
        assert_eq!(name_filter("Quick Scan for a@x.com"), r#"rows=-1 name~"Quick Scan for a@x.com""#);
        assert_eq!(name_filter(r#"odd"name"#), r#"rows=-1 name~"oddname""#);
    }

    #[test]
    fn test_count_suffix() {
        assert_eq!(count_suffixed_name("Quick Scan for a@x.com", 0), "Quick Scan for a@x.com");
        assert_eq!(
            count_suffixed_name("Quick Scan for a@x.com", 2),
            "Quick Scan for a@x.com (2)"
        );
    }
}
