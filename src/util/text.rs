use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns (CJK and emoji count 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns, appending
/// "..." when text was cut.
///
/// Widths of 3 or less have no room for the ellipsis and return as many
/// characters as fit. Returns the input borrowed when it already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let end = prefix_end(s, max_width);
        if end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..end].to_string());
    }

    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let end = prefix_end(s, max_width - ELLIPSIS_WIDTH);
    let mut out = String::with_capacity(end + ELLIPSIS.len());
    out.push_str(&s[..end]);
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Byte index of the longest prefix of `s` that fits in `width` columns.
fn prefix_end(s: &str, width: usize) -> usize {
    let mut current = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if current + w > width {
            break;
        }
        current += w;
        end = idx + c.len_utf8();
    }
    end
}
