//! UTF-8 safe truncation.
//!
//! Payload bounds in the log are counted in characters, never bytes, and a
//! cut never lands inside a multi-byte character.

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
#[inline]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Keep the first `max_chars` characters of `s`.
///
/// Returns `s` unchanged when it is already short enough.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Replace a leading `home` prefix with `~`.
pub fn shorten_home(path: &str, home: Option<&str>) -> String {
    match home {
        Some(home) if !home.is_empty() && path.starts_with(home) => {
            format!("~{}", &path[home.len()..])
        }
        _ => path.to_owned(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bytes_within_limit() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn bytes_snap_back_from_multibyte() {
        // 'é' occupies bytes 3..5
        assert_eq!(truncate_str("café", 4), "caf");
        assert_eq!(truncate_str("café", 5), "café");
    }

    #[test]
    fn chars_exact_bound() {
        let long = "x".repeat(500);
        assert_eq!(truncate_chars(&long, 200).chars().count(), 200);
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn chars_count_multibyte_as_one() {
        assert_eq!(truncate_chars("ab—cd", 3), "ab—");
        assert_eq!(truncate_chars("hi🦀bye", 3), "hi🦀");
    }

    #[test]
    fn shorten_home_prefix() {
        assert_eq!(
            shorten_home("/home/dev/src/main.rs", Some("/home/dev")),
            "~/src/main.rs"
        );
        assert_eq!(shorten_home("/etc/hosts", Some("/home/dev")), "/etc/hosts");
        assert_eq!(shorten_home("/etc/hosts", Some("")), "/etc/hosts");
        assert_eq!(shorten_home("/etc/hosts", None), "/etc/hosts");
    }

    proptest! {
        #[test]
        fn truncate_chars_never_exceeds_bound(s in "\\PC{0,300}", max in 0usize..250) {
            let out = truncate_chars(&s, max);
            prop_assert!(out.chars().count() <= max);
            prop_assert!(s.starts_with(out));
            if s.chars().count() <= max {
                prop_assert_eq!(out, s.as_str());
            }
        }
    }
}
