use std::fmt::Write;

/// Title of every preview document.
pub const PREVIEW_TITLE: &str = "Live Preview";

/// Baseline styles so bare lesson markup reads like a page.
const PREVIEW_BASE_STYLES: &str = "\
  body { font-family: 'Noto Sans JP', 'Segoe UI', sans-serif; margin: 0; padding: 24px; background: #ffffff; color: #1f2937; }
  h1, h2, h3 { margin: 0 0 12px; }
  p { margin: 0 0 12px; line-height: 1.6; }
  ul { margin: 0 0 12px; padding-left: 20px; }
  li { margin-bottom: 6px; }
";

/// Builds the preview document for `markup`. The fragment is embedded
/// verbatim; nothing is escaped or filtered.
pub fn build_preview_document(markup: &str) -> String {
    let mut html = String::with_capacity(markup.len() + 640);
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{}</title>
<style>
{}</style>
</head>
<body>
{}
</body>
</html>"#,
        PREVIEW_TITLE, PREVIEW_BASE_STYLES, markup
    );
    html
}
