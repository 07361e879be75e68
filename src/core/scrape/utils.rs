const SCRIPT_OPEN: &str = "<script";
const SCRIPT_CLOSE: &str = "</script>";

/// One `<script>` element of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Script<'a> {
    /// The opening tag, attributes included.
    pub(crate) tag: &'a str,
    /// Raw contents between the tags.
    pub(crate) body: &'a str,
}

impl Script<'_> {
    pub(crate) fn is_json(&self) -> bool {
        self.tag.contains("application/json")
    }
}

/// Walks the `<script>` elements of `html` in document order.
///
/// Stops at the first element that is not closed.
pub(crate) fn scripts(html: &str) -> impl Iterator<Item = Script<'_>> {
    let mut rest = html;
    std::iter::from_fn(move || {
        let element = &rest[rest.find(SCRIPT_OPEN)?..];
        let (tag, after_tag) = element.split_at(element.find('>')? + 1);
        let (body, after_body) = after_tag.split_at(after_tag.find(SCRIPT_CLOSE)?);
        rest = &after_body[SCRIPT_CLOSE.len()..];
        Some(Script { tag, body })
    })
}

/// Byte index of the `}` closing the object that opens at `start`.
///
/// Braces inside double-quoted strings do not count.
pub(crate) fn object_end(s: &str, start: usize) -> Option<usize> {
    if s.as_bytes().get(start) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, b) in s.bytes().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Undoes the entity escaping browsers expect inside attribute values.
pub(crate) fn unescape_html(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
