use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Fit `s` into `max_cells` terminal cells, ending with `…` when cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    match max_cells {
        0 => String::new(),
        1 => "\u{2026}".to_string(),
        _ => {
            let mut out = take_width(s, max_cells - 1);
            out.push('\u{2026}');
            out
        }
    }
}

/// Pad or cut `s` to exactly `cells` terminal cells (left-aligned).
pub fn fit_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(w)));
    out
}

/// Keep the first `max` characters of `s`, followed by `...` when anything
/// was dropped.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Longest grapheme-aligned prefix of `s` no wider than `budget` cells.
fn take_width(s: &str, budget: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = grapheme_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out
}

/// Byte offset of the grapheme after the one at `byte_offset`, or None at the end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    let step = s[byte_offset..]
        .graphemes(true)
        .next()
        .map_or(s.len() - byte_offset, str::len);
    Some(byte_offset + step)
}

/// Byte offset of the grapheme before `byte_offset`, or None at the start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    let start = s[..byte_offset]
        .grapheme_indices(true)
        .next_back()
        .map_or(0, |(i, _)| i);
    Some(start)
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" { 4 } else { UnicodeWidthStr::width(g) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn width_of_mixed_text() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("a\tb"), 6);
        assert_eq!(display_width("cafe\u{0301}"), 4);
    }

    #[test]
    fn truncate_to_width_respects_wide_chars() {
        assert_eq!(truncate_to_width("hi", 10), "hi");
        assert_eq!(truncate_to_width("hello world", 8), "hello w\u{2026}");
        assert_eq!(truncate_to_width("你好世界", 5), "你好\u{2026}");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn fit_width_pads_and_cuts() {
        assert_eq!(fit_width("Bug", 6), "Bug   ");
        assert_eq!(fit_width("User Story", 6), "User \u{2026}");
    }

    #[test]
    fn truncate_chars_keeps_short_text() {
        let short = "x".repeat(150);
        assert_eq!(truncate_chars(&short, 200), short);
    }

    #[test]
    fn truncate_chars_cuts_long_text() {
        let long = "y".repeat(250);
        let out = truncate_chars(&long, 200);
        assert_eq!(out.chars().count(), 203);
        assert!(out.ends_with("y..."));
        assert_eq!(truncate_chars("Hello", 3), "Hel...");
    }

    #[test]
    fn grapheme_boundaries() {
        let s = "a🎉e\u{0301}";
        assert_eq!(next_grapheme_boundary(s, 0), Some(1));
        assert_eq!(next_grapheme_boundary(s, 1), Some(5));
        assert_eq!(next_grapheme_boundary(s, 5), Some(s.len()));
        assert_eq!(next_grapheme_boundary(s, s.len()), None);
        assert_eq!(prev_grapheme_boundary(s, s.len()), Some(5));
        assert_eq!(prev_grapheme_boundary(s, 1), Some(0));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }
}
