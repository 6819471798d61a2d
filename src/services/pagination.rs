use regex::Regex;
use std::sync::OnceLock;

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"^<(.+)>;\s*rel="(.+)"$"#).expect("valid link pattern"))
}

/// Extract the `rel="next"` target from a `Link` response header.
///
/// The header is a comma-separated list of `<url>; rel="name"` entries.
/// Entries that don't have that shape are ignored.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let captures = link_pattern().captures(entry.trim())?;
        (&captures[2] == "next").then(|| captures[1].to_string())
    })
}
