//! HTML escaping for text and attribute values

/// Escape text for embedding in element content or a quoted attribute
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap content in an element carrying a single class
pub(crate) fn element(tag: &str, class: &str, content: &str) -> String {
    format!("<{tag} class=\"{class}\">{content}</{tag}>")
}
