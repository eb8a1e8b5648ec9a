//! Single-span emphasis selection for bullet lines.
//!
//! Priority: the first maximal numeric/metric token, else the first leading
//! action verb, else nothing. Emphasis only marks a sub-range for bolding;
//! it never alters the bullet text.

use std::ops::Range;

/// Action verbs worth bolding when a bullet has no metric to point at.
const ACTION_VERBS: &[&str] = &[
    "analyzed",
    "architected",
    "automated",
    "built",
    "collaborated",
    "contributed",
    "created",
    "delivered",
    "designed",
    "developed",
    "drove",
    "enabled",
    "evaluated",
    "improved",
    "implemented",
    "investigated",
    "launched",
    "led",
    "managed",
    "mentored",
    "migrated",
    "optimized",
    "owned",
    "partnered",
    "proposed",
    "published",
    "reduced",
    "reviewed",
    "scaled",
    "shipped",
    "spearheaded",
    "supported",
];

/// Byte range of the single emphasis span for a normalized (ASCII) bullet,
/// or `None` when nothing qualifies.
pub fn emphasis_span(text: &str) -> Option<Range<usize>> {
    metric_span(text).or_else(|| leading_verb_span(text))
}

/// First maximal run of digits plus adjacent unit/percent characters:
/// interior `.`/`,` between digits, an optional leading `$`, and a trailing
/// unit run of `%`, `x`, `k`, `m`, `b`, `+` in either case.
/// Detects spans like `40%`, `$2.5M`, `3x`, `500k`, `100k+`.
fn metric_span(text: &str) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let first_digit = bytes.iter().position(|b| b.is_ascii_digit())?;

    let mut start = first_digit;
    if start > 0 && bytes[start - 1] == b'$' {
        start -= 1;
    }

    let mut end = first_digit;
    while end < bytes.len() {
        let b = bytes[end];
        if b.is_ascii_digit() {
            end += 1;
        } else if (b == b'.' || b == b',') && bytes.get(end + 1).is_some_and(|n| n.is_ascii_digit())
        {
            end += 1;
        } else {
            break;
        }
    }
    while end < bytes.len()
        && matches!(
            bytes[end],
            b'%' | b'x' | b'X' | b'k' | b'K' | b'm' | b'M' | b'b' | b'B' | b'+'
        )
    {
        end += 1;
    }
    Some(start..end)
}

/// The bullet's first word, if it is a recognized action verb.
fn leading_verb_span(text: &str) -> Option<Range<usize>> {
    let offset = text.len() - text.trim_start().len();
    let rest = &text[offset..];
    let word_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if word_len == 0 {
        return None;
    }
    let word = &rest[..word_len];
    ACTION_VERBS
        .iter()
        .any(|verb| verb.eq_ignore_ascii_case(word))
        .then_some(offset..offset + word_len)
}

/// Wraps the chosen span in `**` markers. At most one span per bullet.
pub fn emphasize(bullet: &str) -> String {
    match emphasis_span(bullet) {
        Some(span) => format!(
            "{}**{}**{}",
            &bullet[..span.start],
            &bullet[span.start..span.end],
            &bullet[span.end..]
        ),
        None => bullet.to_string(),
    }
}
