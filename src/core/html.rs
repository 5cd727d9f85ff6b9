// src/core/html.rs
// Tolerant, case-insensitive tag slicing. No DOM; we only walk the byte offsets.
// Lower-casing is ASCII-only, so offsets into the lower-cased copy are valid in the original.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

#[inline]
fn is_name_end(b: Option<&u8>) -> bool {
    matches!(b, None | Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/'))
}

/// Offset just past the `>` closing the tag that starts at `lt`. Quoted `>` are skipped.
fn tag_end(s: &str, lt: usize) -> Option<usize> {
    let b = s.as_bytes();
    let mut i = lt + 1;
    let (mut in_s, mut in_d) = (false, false);
    while i < b.len() {
        match b[i] {
            b'\'' if !in_d => in_s = !in_s,
            b'"' if !in_s => in_d = !in_d,
            b'>' if !in_s && !in_d => return Some(i + 1),
            _ => {}
        }
        i += 1;
    }
    None
}

fn find_open(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("<{tag}");
    let mut pos = from;
    loop {
        let at = lc.get(pos..)?.find(&pat)? + pos;
        if is_name_end(lc.as_bytes().get(at + pat.len())) {
            return Some(at);
        }
        pos = at + pat.len();
    }
}

fn find_close(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("</{tag}");
    let mut pos = from;
    loop {
        let at = lc.get(pos..)?.find(&pat)? + pos;
        if is_name_end(lc.as_bytes().get(at + pat.len())) {
            return Some(at);
        }
        pos = at + pat.len();
    }
}

/// End of the block opened at `open_at`, matching nested blocks of the same tag by depth.
fn block_end(s: &str, lc: &str, tag: &str, open_at: usize) -> Option<usize> {
    let open_end = tag_end(s, open_at)?;
    if s.as_bytes()[open_end - 2] == b'/' {
        return Some(open_end); // <tag ... />
    }
    let mut depth = 1usize;
    let mut pos = open_end;
    loop {
        let close = find_close(lc, tag, pos)?;
        match find_open(lc, tag, pos) {
            Some(o) if o < close => {
                depth += 1;
                pos = tag_end(s, o)?;
            }
            _ => {
                let close_end = tag_end(s, close)?;
                depth -= 1;
                if depth == 0 {
                    return Some(close_end);
                }
                pos = close_end;
            }
        }
    }
}

/// Next `<tag …>…</tag>` block at or after `from`, as a byte range over `s`.
pub fn next_tag_block_ci(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let start = find_open(&lc, &tag, from)?;
    let end = block_end(s, &lc, &tag, start)?;
    Some((start, end))
}

/// Successive outermost `<tag>` blocks of a fragment.
pub struct Blocks<'a> {
    s: &'a str,
    lc: String,
    tag: String,
    pos: usize,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let start = find_open(&self.lc, &self.tag, self.pos)?;
        match block_end(self.s, &self.lc, &self.tag, start) {
            Some(end) => {
                self.pos = end;
                Some(&self.s[start..end])
            }
            None => {
                // unterminated: nothing after it can be trusted
                self.pos = self.s.len();
                None
            }
        }
    }
}

pub fn blocks<'a>(s: &'a str, tag: &str) -> Blocks<'a> {
    Blocks { s, lc: to_lower(s), tag: to_lower(tag), pos: 0 }
}

/// Every opening `<tag …>` in the fragment, nested ones included. For void tags like `<img>`.
pub fn open_tags<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(at) = find_open(&lc, &tag, pos) {
        match tag_end(s, at) {
            Some(end) => {
                out.push(&s[at..end]);
                pos = end;
            }
            None => break,
        }
    }
    out
}

/// Byte ranges of every `<tag>` block at any depth, in document order.
/// Nested blocks of the same tag are returned as well as their parents.
pub fn block_ranges(s: &str, tag: &str) -> Vec<(usize, usize)> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(at) = find_open(&lc, &tag, pos) {
        if let Some(end) = block_end(s, &lc, &tag, at) {
            out.push((at, end));
        }
        pos = at + tag.len() + 1;
    }
    out
}

/// The opening tag of a block, `<` through `>`.
pub fn open_tag(block: &str) -> &str {
    match tag_end(block, 0) {
        Some(end) => &block[..end],
        None => block,
    }
}

pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(oe) = tag_end(block, 0) {
        if let Some(cs) = block.rfind('<') {
            if cs >= oe {
                return &block[oe..cs];
            }
        }
    }
    ""
}

/// Attribute value from an opening tag, entities decoded. Names match whole, case-insensitive.
/// Attributes are read left to right, so text inside another attribute's value never matches.
/// A bare attribute (`<td nowrap>`) gives `Some("")`.
pub fn attr(open: &str, name: &str) -> Option<String> {
    let b = open.as_bytes();
    let len = b.len();
    let skip_ws = |mut i: usize| {
        while i < len && b[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    // tag name
    let mut i = usize::from(b.first() == Some(&b'<'));
    while i < len && !b[i].is_ascii_whitespace() && b[i] != b'>' && b[i] != b'/' {
        i += 1;
    }

    loop {
        while i < len && (b[i].is_ascii_whitespace() || b[i] == b'/') {
            i += 1;
        }
        if i >= len || b[i] == b'>' {
            return None;
        }

        let key_start = i;
        while i < len && !b[i].is_ascii_whitespace() && !matches!(b[i], b'=' | b'>' | b'/') {
            i += 1;
        }
        let key = &open[key_start..i];
        if key.is_empty() {
            // stray '='
            i += 1;
            continue;
        }

        i = skip_ws(i);
        let value = if b.get(i) == Some(&b'=') {
            i = skip_ws(i + 1);
            match b.get(i) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let start = i + 1;
                    let end = open[start..].find(q as char).map_or(len, |e| start + e);
                    i = (end + 1).min(len);
                    &open[start..end]
                }
                _ => {
                    let start = i;
                    while i < len && !b[i].is_ascii_whitespace() && b[i] != b'>' {
                        i += 1;
                    }
                    open[start..i].trim_end_matches('/')
                }
            }
        } else {
            ""
        };

        if key.eq_ignore_ascii_case(name) {
            return Some(normalize_entities(value));
        }
    }
}

pub fn has_class(open: &str, class: &str) -> bool {
    attr(open, "class")
        .map(|v| v.split_ascii_whitespace().any(|c| c.eq_ignore_ascii_case(class)))
        .unwrap_or(false)
}

/// Visible text: tags dropped, entities decoded, whitespace collapsed.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&normalize_entities(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_match_nested_tags_by_depth() {
        let s = r#"<span class="a"><span class="b">x</span>y</span><span>z</span>"#;
        let got: Vec<&str> = blocks(s, "span").collect();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0], r#"<span class="a"><span class="b">x</span>y</span>"#);
        assert_eq!(got[1], "<span>z</span>");
    }

    #[test]
    fn tag_names_need_a_boundary() {
        let s = "<abbr>no</abbr><a href=\"/x\">yes</a>";
        let got: Vec<&str> = blocks(s, "a").collect();
        assert_eq!(got, vec!["<a href=\"/x\">yes</a>"]);
    }

    #[test]
    fn case_insensitive_tags() {
        let s = "<TD Class=\"X\">Hi</TD>";
        let (a, b) = next_tag_block_ci(s, "td", 0).unwrap();
        assert_eq!(&s[a..b], s);
        assert!(has_class(open_tag(s), "x"));
    }

    #[test]
    fn attr_skips_prefixed_names() {
        let img = r#"<img data-src="https://a/b.png?cb=1" src="data:image/gif;base64,R0">"#;
        assert_eq!(attr(img, "src").as_deref(), Some("data:image/gif;base64,R0"));
        assert_eq!(attr(img, "data-src").as_deref(), Some("https://a/b.png?cb=1"));
        assert_eq!(attr(img, "alt"), None);
    }

    #[test]
    fn attr_handles_single_quotes_unquoted_and_entities() {
        assert_eq!(attr("<a title='Fish &amp; Chips'>", "title").as_deref(), Some("Fish & Chips"));
        assert_eq!(attr("<a href=/wiki/Water>", "href").as_deref(), Some("/wiki/Water"));
        assert_eq!(attr("<img src=x.png/>", "src").as_deref(), Some("x.png"));
    }

    #[test]
    fn quoted_gt_does_not_end_tag() {
        let s = r#"<a title="a > b">t</a>"#;
        assert_eq!(open_tag(s), r#"<a title="a > b">"#);
        assert_eq!(inner_after_open_tag(s), "t");
    }

    #[test]
    fn open_tags_finds_void_elements() {
        let s = "<p><img src=\"1\"><span><img src=\"2\" /></span></p>";
        let got = open_tags(s, "img");
        assert_eq!(got.len(), 2);
        assert_eq!(attr(got[1], "src").as_deref(), Some("2"));
    }

    #[test]
    fn strip_tags_decodes_and_collapses() {
        assert_eq!(strip_tags("<b>Fire</b>&nbsp;+\n <i>Water</i>"), "Fire + Water");
    }

    #[test]
    fn unterminated_block_is_ignored() {
        assert_eq!(blocks("<li>open", "li").count(), 0);
    }

    #[test]
    fn attr_ignores_names_inside_other_values() {
        let a = r#"<a href="/wiki/x?a title=Bogus" title="Real">"#;
        assert_eq!(attr(a, "title").as_deref(), Some("Real"));

        let img = r#"<img alt="see src=fake.png" class="icon" src="https://a/real.png">"#;
        assert_eq!(attr(img, "src").as_deref(), Some("https://a/real.png"));
        assert!(has_class(img, "icon"));
        assert!(!has_class(r#"<table summary=" class=list-table">"#, "list-table"));
    }

    #[test]
    fn attr_bare_and_spaced_forms() {
        assert_eq!(attr("<td nowrap class = \"x\">", "class").as_deref(), Some("x"));
        assert_eq!(attr("<td nowrap class=\"x\">", "nowrap").as_deref(), Some(""));
        assert_eq!(attr("<br/>", "class"), None);
    }

    #[test]
    fn block_ranges_include_nested_blocks() {
        let s = "<table class=\"outer\"><tr><td><table class=\"inner\"></table></td></tr></table>";
        let got: Vec<&str> = block_ranges(s, "table").into_iter().map(|(a, b)| &s[a..b]).collect();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0], s);
        assert_eq!(got[1], "<table class=\"inner\"></table>");
    }
}
