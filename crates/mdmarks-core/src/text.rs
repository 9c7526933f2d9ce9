use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Terminal display width of `s`, in cells.
///
/// Wide glyphs (CJK, most emoji) count as two cells and zero-width marks as none, so a cell's
/// visual width never depends on its UTF-8 byte length. Both the offset tracker and the table
/// layout measure through this function.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

pub fn char_width(ch: char) -> usize {
    if ch == '\t' {
        return TAB_WIDTH;
    }
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

pub const TAB_WIDTH: usize = 4;

/// Right-pads `s` with spaces up to `width` cells. Longer input is returned unchanged.
pub fn pad_right(s: &str, width: usize) -> String {
    let w = display_width(s);
    let mut out = String::with_capacity(s.len() + width.saturating_sub(w));
    out.push_str(s);
    out.push_str(&" ".repeat(width.saturating_sub(w)));
    out
}

/// Number of bytes of leading ASCII whitespace.
pub fn leading_spaces(s: &str) -> usize {
    s.len() - s.trim_start_matches([' ', '\t']).len()
}

/// Number of bytes of trailing ASCII whitespace.
pub fn trailing_spaces(s: &str) -> usize {
    s.len() - s.trim_end_matches([' ', '\t']).len()
}

/// Byte index of the `]` closing the `[` at the start of `text`, honoring nesting and escapes.
pub fn closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, b) in text.bytes().enumerate() {
        match b {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'[' => depth += 1,
            b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_glyphs_count_as_two_cells() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!("日本".len(), 6);
        assert_eq!(display_width("é"), 1);
    }

    #[test]
    fn pad_right_uses_display_width() {
        assert_eq!(pad_right("日", 4), "日  ");
        assert_eq!(pad_right("abcdef", 3), "abcdef");
    }

    #[test]
    fn counts_surrounding_whitespace() {
        assert_eq!(leading_spaces("  a "), 2);
        assert_eq!(trailing_spaces("  a \t"), 2);
        assert_eq!(leading_spaces("   "), 3);
    }

    #[test]
    fn closing_bracket_balances_nesting() {
        assert_eq!(closing_bracket("[a [b] c](x)"), Some(8));
        assert_eq!(closing_bracket(r"[a \] b](x)"), Some(7));
        assert_eq!(closing_bracket("[open"), None);
    }
}
