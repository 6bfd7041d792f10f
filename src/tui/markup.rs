//! Turn rich-text comment bodies into styled plain-text segments.
//!
//! Order matters: mention anchors are pulled out first so the generic
//! anchor pass does not treat them as links, then anchors and bare URLs
//! become link segments, then the remaining markup is stripped and entities
//! decoded. Truncation runs last, over the visible text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::util::unicode::truncate_chars;

/// Visible characters shown for one comment body.
pub const MAX_COMMENT_CHARS: usize = 200;

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*data-vss-mention="[^"]*"[^>]*>(.*?)</a>"#)
        .expect("valid mention regex")
});
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#)
        .expect("valid anchor regex")
});
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6])\s*>").expect("valid break regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex")
});
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("valid url regex"));
static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid blank line regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    Mention,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Segment {
            kind,
            text: text.into(),
        }
    }
}

/// Full pipeline for one comment body.
pub fn format_comment(html: &str) -> Vec<Segment> {
    let segments = split_mentions(html);
    let segments = flat_map_text(segments, split_anchors);
    let segments = flat_map_text(segments, |s| {
        vec![Segment::new(SegmentKind::Text, strip_tags(s))]
    });
    let segments = flat_map_text(segments, split_bare_urls);
    truncate_segments(tidy(segments), MAX_COMMENT_CHARS)
}

/// Concatenated visible text of a segment list.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

fn flat_map_text(segments: Vec<Segment>, f: impl Fn(&str) -> Vec<Segment>) -> Vec<Segment> {
    segments
        .into_iter()
        .flat_map(|seg| match seg.kind {
            SegmentKind::Text => f(&seg.text),
            _ => vec![seg],
        })
        .collect()
}

/// Split on regex matches, mapping each match to a segment and keeping the
/// text between matches as-is.
fn split_with(
    input: &str,
    re: &Regex,
    mut on_match: impl FnMut(&Captures<'_>) -> Segment,
) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            out.push(Segment::new(SegmentKind::Text, &input[last..whole.start()]));
        }
        out.push(on_match(&caps));
        last = whole.end();
    }
    if last < input.len() {
        out.push(Segment::new(SegmentKind::Text, &input[last..]));
    }
    out
}

fn split_mentions(html: &str) -> Vec<Segment> {
    split_with(html, &MENTION_RE, |caps| {
        let name = strip_tags(caps.get(1).map_or("", |m| m.as_str()));
        Segment::new(SegmentKind::Mention, name.trim())
    })
}

fn split_anchors(html: &str) -> Vec<Segment> {
    split_with(html, &ANCHOR_RE, |caps| {
        let href = decode_entities(caps.get(1).map_or("", |m| m.as_str()).trim());
        let inner = caps.get(2).map_or("", |m| m.as_str());
        if href.is_empty() || href.starts_with('#') {
            // Left as markup: the strip pass decodes it exactly once.
            return Segment::new(SegmentKind::Text, inner);
        }
        let text = strip_tags(inner);
        let text = text.trim();
        if text.is_empty() || text == href {
            Segment::new(SegmentKind::Link, href)
        } else {
            Segment::new(SegmentKind::Link, format!("{text} ({href})"))
        }
    })
}

fn split_bare_urls(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in URL_RE.find_iter(text) {
        let url = m
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']', '}']);
        let end = m.start() + url.len();
        if m.start() > last {
            out.push(Segment::new(SegmentKind::Text, &text[last..m.start()]));
        }
        out.push(Segment::new(SegmentKind::Link, url));
        last = end;
    }
    if last < text.len() {
        out.push(Segment::new(SegmentKind::Text, &text[last..]));
    }
    out
}

/// Drop markup, turning line breaks and block ends into newlines.
pub fn strip_tags(html: &str) -> String {
    let with_breaks = BREAK_RE.replace_all(html, "\n");
    let bare = TAG_RE.replace_all(&with_breaks, "");
    decode_entities(&bare)
}

/// Decode named and numeric HTML entities in a single pass.
pub fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &Captures<'_>| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if body.starts_with("#x") || body.starts_with("#X") => {
                    u32::from_str_radix(&body[2..], 16).ok().and_then(char::from_u32)
                }
                _ if body.starts_with('#') => body[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Merge adjacent text, collapse blank-line runs, trim the ends.
fn tidy(segments: Vec<Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments {
        if seg.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(prev) if prev.kind == SegmentKind::Text && seg.kind == SegmentKind::Text => {
                prev.text.push_str(&seg.text);
            }
            _ => merged.push(seg),
        }
    }
    for seg in merged.iter_mut().filter(|s| s.kind == SegmentKind::Text) {
        seg.text = BLANK_LINES_RE.replace_all(&seg.text, "\n\n").into_owned();
    }
    if let Some(first) = merged.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = merged.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
    merged.retain(|s| !s.text.is_empty());
    merged
}

/// Cut to `max` visible characters, appending `...` when anything was dropped.
fn truncate_segments(segments: Vec<Segment>, max: usize) -> Vec<Segment> {
    let total: usize = segments.iter().map(|s| s.text.chars().count()).sum();
    if total <= max {
        return segments;
    }
    let mut out = Vec::new();
    let mut budget = max;
    for seg in segments {
        if budget == 0 {
            break;
        }
        let len = seg.text.chars().count();
        if len <= budget {
            budget -= len;
            out.push(seg);
        } else {
            let cut: String = seg.text.chars().take(budget).collect();
            out.push(Segment::new(seg.kind, cut));
            budget = 0;
        }
    }
    out.push(Segment::new(SegmentKind::Text, "..."));
    out
}

/// Shorten a single-line summary of a comment body.
pub fn summary_line(html: &str, max: usize) -> String {
    let text = plain_text(&format_comment(html));
    let first = text.lines().next().unwrap_or("");
    truncate_chars(first, max)
}
