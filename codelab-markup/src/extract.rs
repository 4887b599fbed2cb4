use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Paragraph the lesson starter leaves for the coach's answer.
pub const SNIPPET_PLACEHOLDER_ATTR: &str = r#"data-placeholder="ai-response""#;

fn jsx_comment_regex() -> &'static Regex {
    static JSX_COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    JSX_COMMENT_REGEX.get_or_init(|| Regex::new(r"\{/\*[\s\S]*?\*/\}").unwrap())
}

fn return_block_regex() -> &'static Regex {
    static RETURN_BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
    RETURN_BLOCK_REGEX.get_or_init(|| Regex::new(r"\breturn\s*\(([\s\S]*?)\);").unwrap())
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r#"<p\s+data-placeholder="ai-response">[\s\S]*?</p>"#).unwrap()
    })
}

/// Fragment wrappers stripped from the edges of a captured render block,
/// as (opening, closing) pairs.
const FRAGMENT_WRAPPERS: &[(&str, &str)] = &[
    ("<React.Fragment>", "</React.Fragment>"),
    ("<Fragment>", "</Fragment>"),
    ("<>", "</>"),
];

/// Removes every `{/* ... */}` comment from the source.
pub fn strip_jsx_comments(source: &str) -> String {
    jsx_comment_regex().replace_all(source, "").into_owned()
}

/// Returns the markup a component's render path would produce.
///
/// - `{/* ... */}` comments are removed first.
/// - The first `return ( ... );` block is captured, its fragment wrapper
///   (if any) is stripped and the result is trimmed.
/// - Without such a block the cleaned source is returned trimmed.
///
/// # Examples
///
/// - `"function A() { return (<p>Hi</p>); }"` → `"<p>Hi</p>"`
/// - `"<h1>Plain</h1>"` → `"<h1>Plain</h1>"`
pub fn extract_markup(source: &str) -> String {
    let cleaned = strip_jsx_comments(source);

    match return_block_regex().captures(&cleaned) {
        Some(caps) => {
            let block = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let markup = strip_fragment(block).trim().to_string();
            debug!(len = markup.len(), "extracted render block");
            markup
        }
        None => {
            debug!("no render block found, using cleaned source");
            cleaned.trim().to_string()
        }
    }
}

/// Strips one leading fragment opener and one trailing fragment closer.
///
/// Each edge is handled on its own, so an unbalanced wrapper only loses
/// the side that is present.
fn strip_fragment(block: &str) -> &str {
    let mut out = block;
    for (open, _) in FRAGMENT_WRAPPERS {
        let trimmed = out.trim_start();
        if let Some(rest) = trimmed.strip_prefix(open) {
            out = rest;
            break;
        }
    }
    for (_, close) in FRAGMENT_WRAPPERS {
        let trimmed = out.trim_end();
        if let Some(rest) = trimmed.strip_suffix(close) {
            out = rest;
            break;
        }
    }
    out
}

/// Inserts a snippet into component source.
///
/// Replaces the first placeholder paragraph
/// (`<p data-placeholder="ai-response">…</p>`) with `snippet`. Without a
/// placeholder the snippet is appended after the trimmed source, separated
/// by a blank line.
pub fn apply_snippet(source: &str, snippet: &str) -> String {
    let re = placeholder_regex();
    if re.is_match(source) {
        re.replacen(source, 1, regex::NoExpand(snippet)).into_owned()
    } else {
        format!("{}\n\n{}", source.trim(), snippet)
    }
}
