//! Escaping applied to issue titles before they are written as Markdown.
//!
//! Each step leaves inline code spans alone, so escaping an already escaped
//! title changes nothing.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// A pure title transformation.
pub type Escape = fn(&str) -> String;

/// The escapes applied to every title, in order.
pub const TITLE_ESCAPES: [Escape; 3] = [escape_mentions, escape_html, escape_markdown];

pub fn escape_title(title: &str) -> String {
    TITLE_ESCAPES
        .iter()
        .fold(title.to_string(), |text, escape| escape(&text))
}

fn mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(^|[^\w])(@[\w-]+)").expect("valid mention pattern"))
}

fn html_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"</?[A-Za-z][\w-]*(?:\s[^<>]*)?/?>").expect("valid html pattern")
    })
}

/// Wrap `@name` in backticks so GitHub doesn't notify the user. A name that
/// already touches a backtick in the full title is left alone.
pub fn escape_mentions(text: &str) -> String {
    outside_code_at(text, |plain, offset| {
        mention_pattern()
            .replace_all(plain, |caps: &Captures| {
                let name = &caps[2];
                let start = offset + caps.get(2).map_or(0, |m| m.start());
                let end = start + name.len();
                let before = text[..start].chars().next_back();
                let after = text[end..].chars().next();
                if before == Some('`') || after == Some('`') {
                    caps[0].to_string()
                } else {
                    format!("{}`{}`", &caps[1], name)
                }
            })
            .into_owned()
    })
}

/// Wrap tag-like `<name ...>` text in backticks so it isn't rendered as HTML.
pub fn escape_html(text: &str) -> String {
    outside_code(text, |plain| {
        html_pattern()
            .replace_all(plain, |caps: &Captures| format!("`{}`", &caps[0]))
            .into_owned()
    })
}

/// Backslash `*`, `_` and `~` unless they are already escaped.
pub fn escape_markdown(text: &str) -> String {
    outside_code(text, |plain| {
        let mut escaped = String::with_capacity(plain.len());
        let mut previous = None;
        for c in plain.chars() {
            if matches!(c, '*' | '_' | '~') && previous != Some('\\') {
                escaped.push('\\');
            }
            escaped.push(c);
            previous = Some(c);
        }
        escaped
    })
}

/// Apply `f` to the text between inline code spans. An unterminated backtick
/// is treated as plain text.
fn outside_code(text: &str, f: impl Fn(&str) -> String) -> String {
    outside_code_at(text, |plain, _| f(plain))
}

/// Like [`outside_code`], also passing the byte offset of each plain segment.
fn outside_code_at(text: &str, f: impl Fn(&str, usize) -> String) -> String {
    let mut result = String::with_capacity(text.len());
    let mut offset = 0;
    loop {
        let rest = &text[offset..];
        let Some(open) = rest.find('`') else {
            result.push_str(&f(rest, offset));
            return result;
        };
        let Some(close) = rest[open + 1..].find('`').map(|i| open + 1 + i) else {
            result.push_str(&f(rest, offset));
            return result;
        };
        result.push_str(&f(&rest[..open], offset));
        result.push_str(&rest[open..=close]);
        offset += close + 1;
    }
}
