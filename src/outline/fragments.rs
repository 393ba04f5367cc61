use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::glyph::{BoundingBox, GlyphSpan, StyleKey};
use super::junk::{JunkFilter, is_word_char};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub text: String,
    pub style: StyleKey,
    pub page: usize,
    pub bbox: BoundingBox,
    pub position_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LineKey {
    page: usize,
    band: i64,
    style: StyleKey,
}

pub fn reconstruct_lines(
    spans: &[GlyphSpan],
    filter: &JunkFilter,
    line_eps: f64,
) -> Vec<TextBlock> {
    let mut order = Vec::<LineKey>::new();
    let mut groups = HashMap::<LineKey, Vec<&GlyphSpan>>::new();

    for span in spans {
        let key = LineKey {
            page: span.page,
            band: (span.bbox.y0 / line_eps).round_ties_even() as i64,
            style: span.style,
        };
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(span);
    }

    let mut blocks = Vec::new();
    for key in order {
        let Some(mut fragments) = groups.remove(&key) else {
            continue;
        };
        fragments.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let text = join_fragments(&fragments);
        if text.chars().count() <= 2 || filter.is_junk(&text) {
            continue;
        }

        let leftmost = fragments[0];
        blocks.push(TextBlock {
            text,
            style: key.style,
            page: leftmost.page,
            bbox: leftmost.bbox,
            position_score: leftmost.bbox.y0,
        });
    }

    blocks
}

fn join_fragments(fragments: &[&GlyphSpan]) -> String {
    let mut seen = HashSet::<&str>::new();
    let mut parts = Vec::<String>::new();

    for fragment in fragments {
        let text = fragment.text.trim();
        if text.is_empty() || !seen.insert(text) {
            continue;
        }

        let cleaned = collapse_char_repeats(text);
        if cleaned.chars().count() > 1 {
            parts.push(cleaned);
        }
    }

    let mut combined = String::new();
    for part in parts {
        if combined.is_empty() {
            combined = part;
            continue;
        }

        if continues_word(&combined, &part) {
            combined.push_str(&part);
        } else {
            combined.push(' ');
            combined.push_str(&part);
        }
    }

    let collapsed = combined.split_whitespace().collect::<Vec<&str>>().join(" ");
    collapse_repeated_words(&collapsed)
}

fn continues_word(running: &str, next: &str) -> bool {
    let ends_in_letter = running
        .chars()
        .last()
        .map(char::is_alphabetic)
        .unwrap_or(false);
    let starts_lowercase = next.chars().next().map(char::is_lowercase).unwrap_or(false);
    let last_word_len = running
        .split_whitespace()
        .last()
        .map(|word| word.chars().count())
        .unwrap_or(0);

    ends_in_letter && starts_lowercase && last_word_len < 8
}

/// Collapses a one- or two-character unit repeated four or more times in a
/// row into a single occurrence ("ababab ab" stays, "RRRR" becomes "R").
pub(crate) fn collapse_char_repeats(text: &str) -> String {
    let chars = text.chars().collect::<Vec<char>>();
    let mut out = String::with_capacity(text.len());
    let mut index = 0usize;

    'scan: while index < chars.len() {
        for unit_len in [2usize, 1] {
            if index + unit_len > chars.len() {
                continue;
            }
            let unit = &chars[index..index + unit_len];
            if unit.contains(&'\n') {
                continue;
            }

            let mut repeats = 1usize;
            while index + (repeats + 1) * unit_len <= chars.len()
                && &chars[index + repeats * unit_len..index + (repeats + 1) * unit_len] == unit
            {
                repeats += 1;
            }

            if repeats >= 4 {
                out.extend(unit.iter());
                index += repeats * unit_len;
                continue 'scan;
            }
        }

        out.push(chars[index]);
        index += 1;
    }

    out
}

/// Removes immediately repeated whole words in single-spaced text, keeping
/// surrounding punctuation ("the the end." becomes "the end.").
pub(crate) fn collapse_repeated_words(text: &str) -> String {
    let mut tokens = Vec::<String>::new();

    for token in text.split(' ').filter(|token| !token.is_empty()) {
        if let Some(previous) = tokens.last_mut() {
            let tail = trailing_word(previous);
            let head = leading_word(token);
            if !tail.is_empty() && tail == head {
                let rest = &token[head.len()..];
                previous.push_str(rest);
                continue;
            }
        }
        tokens.push(token.to_string());
    }

    tokens.join(" ")
}

fn trailing_word(token: &str) -> &str {
    let start = token
        .char_indices()
        .rev()
        .take_while(|(_, character)| is_word_char(*character))
        .last()
        .map(|(index, _)| index)
        .unwrap_or(token.len());
    &token[start..]
}

fn leading_word(token: &str) -> &str {
    let end = token
        .char_indices()
        .find(|(_, character)| !is_word_char(*character))
        .map(|(index, _)| index)
        .unwrap_or(token.len());
    &token[..end]
}
