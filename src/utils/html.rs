//! HTML to plain text conversion.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_OR_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap());
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(p|div|li|ul|ol|h[1-6]|tr|table|section|article)\b[^>]*>").unwrap()
});
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!][^<>]*>").unwrap());
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&(#x[0-9a-f]+|#[0-9]+|[a-z]+);").unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert an HTML fragment into plain text.
///
/// Block and line-break tags become newlines, other tags are dropped
/// (a `<` not followed by a name is kept as text), standard entities are decoded, and runs of three or more
/// newlines collapse to a blank line. Tag removal and entity decoding repeat
/// until neither changes the text, so `strip_html(strip_html(x)) ==
/// strip_html(x)` for every input.
pub fn strip_html(html: &str) -> String {
    let mut text = html.replace("\r\n", "\n");

    loop {
        let next = decode_entities(&remove_tags(&text));
        if next == text {
            break;
        }
        text = next;
    }

    let trimmed_lines: Vec<&str> = text.split('\n').map(str::trim_end).collect();
    let joined = trimmed_lines.join("\n");
    EXCESS_NEWLINES
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

fn remove_tags(html: &str) -> String {
    let text = SCRIPT_OR_STYLE.replace_all(html, "");
    let text = COMMENT.replace_all(&text, "");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = BLOCK_TAG.replace_all(&text, "\n");
    ANY_TAG.replace_all(&text, "").into_owned()
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<String> {
    let lower = name.to_ascii_lowercase();
    let decoded = match lower.as_str() {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = if let Some(hex) = lower.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = lower.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            match char::from_u32(code)? {
                '\u{a0}' => ' ',
                c => c,
            }
        }
    };
    Some(decoded.to_string())
}

/// Collapse all whitespace (including newlines) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_blocks_and_breaks() {
        let html = "<h2>About</h2><p>We build <b>fast</b> things.</p><ul><li>Rust</li><li>Tokio</li></ul>line<br/>break";
        assert_eq!(
            strip_html(html),
            "About\n\nWe build fast things.\n\nRust\n\nTokio\n\nline\nbreak"
        );
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(strip_html("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(strip_html("it&#039;s &quot;ok&quot;"), "it's \"ok\"");
        assert_eq!(strip_html("a&nbsp;b &#x27;c&#x27;"), "a b 'c'");
        assert_eq!(strip_html("&unknown; stays"), "&unknown; stays");
    }

    #[test]
    fn test_strip_html_drops_scripts_and_comments() {
        let html = "<p>Keep</p><script>var x = '<p>no</p>';</script><!-- hidden --><style>p{}</style>";
        assert_eq!(strip_html(html), "Keep");
    }

    #[test]
    fn test_strip_html_collapses_newlines() {
        assert_eq!(strip_html("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(strip_html("  \n\n  text  \n\n  "), "text");
    }

    #[test]
    fn test_strip_html_idempotent_on_escaped_markup() {
        let inputs = [
            "&lt;p&gt;Escaped paragraph&lt;/p&gt;",
            "&amp;lt;b&amp;gt;double&amp;lt;/b&amp;gt;",
            "<<b>b>nested</b>",
            "&am<i></i>p;lt;",
            "a < b and c > d",
            "Salary &lt; 100k and experience &gt; 3 years. Apply.",
            "<div>\n\n\n<p>x</p>\n\n\n</div>",
            "",
        ];
        for input in inputs {
            let once = strip_html(input);
            assert_eq!(strip_html(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_strip_html_keeps_literal_angle_brackets() {
        assert_eq!(
            strip_html("Salary &lt; 100k and experience &gt; 3 years. Apply."),
            "Salary < 100k and experience > 3 years. Apply."
        );
        assert_eq!(strip_html("<p>We &lt;3 Rust</p>"), "We <3 Rust");
        assert_eq!(strip_html("&lt;b&gt;bold&lt;/b&gt; text"), "bold text");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Senior\n   Rust\tEngineer "), "Senior Rust Engineer");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
