//! HTML escaping for the two contexts templates write into.

fn escape_into(out: &mut String, s: &str, quotes: bool) {
    // All replaced characters are ASCII, hence copying the unchanged
    // runs between them keeps UTF-8 sequences intact.
    let mut done = 0;
    for (i, b) in s.bytes().enumerate() {
        let replacement = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' if quotes => "&quot;",
            b'\'' if quotes => "&#39;",
            _ => continue
        };
        out.push_str(&s[done..i]);
        out.push_str(replacement);
        done = i + 1;
    }
    out.push_str(&s[done..]);
}

/// Append `s` to `out`, safe to be placed between tags.
pub fn push_escaped_text(out: &mut String, s: &str) {
    escape_into(out, s, false)
}

/// Append `s` to `out`, safe to be placed inside a double (or
/// single) quoted attribute value.
pub fn push_escaped_attribute(out: &mut String, s: &str) {
    escape_into(out, s, true)
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    push_escaped_text(&mut out, s);
    out
}

pub fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    push_escaped_attribute(&mut out, s);
    out
}
