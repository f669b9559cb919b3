/// Replace ASCII control characters (0x00-0x1F, 0x7F) with a space and trim.
///
/// Keeps user text from breaking line-oriented output such as vCards.
pub fn sanitise(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_control() { ' ' } else { c })
        .collect::<String>()
        .trim_matches(is_trimmable)
        .to_string()
}

/// Unicode white space plus the byte-order mark, minus NEL (U+0085).
/// Matches the set trimmed by ECMAScript `String.prototype.trim`.
fn is_trimmable(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_char_becomes_space() {
        assert_eq!(sanitise("Jo\x01hn "), "Jo hn");
    }

    #[test]
    fn test_line_breaks_cannot_inject_vcard_fields() {
        assert_eq!(sanitise("Ann\r\nTEL:999"), "Ann  TEL:999");
    }

    #[test]
    fn test_only_controls_and_whitespace_is_empty() {
        assert_eq!(sanitise("\x00\t\x1f \x7f\n"), "");
        assert_eq!(sanitise("   "), "");
    }

    #[test]
    fn test_trim_strips_bom_but_keeps_nel() {
        assert_eq!(sanitise("\u{feff}Ann\u{feff}"), "Ann");
        assert_eq!(sanitise("\u{feff} \u{2028}"), "");
        assert_eq!(sanitise("\u{85}Ann"), "\u{85}Ann");
    }

    #[test]
    fn test_unicode_is_preserved() {
        assert_eq!(sanitise("  Zoë Ünal\u{00a0}"), "Zoë Ünal");
        assert_eq!(sanitise("+62 812-3456"), "+62 812-3456");
    }
}
