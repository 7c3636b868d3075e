//! Top-level tag matching
//!
//! The dialect is deliberately small:
//! - a tag name is `[A-Za-z_]*[0-9]*` and may be empty
//! - an opening tag is `<name` followed by any number of ` attr="value"`
//!   groups (one space each) and `>`
//! - a closing tag is exactly `</name>`
//!
//! Opening and closing tags are paired like brackets, one stack per name, so
//! an element's content runs to the `</name>` that balances its opening tag.
//! Text that no element covers is collected as leftover for the caller to
//! reject.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::xml::cursor::Cursor;

const DECLARATION_START: &str = "<?xml";
const DECLARATION_END: &str = "?>";

/// An element found at the top level of the scanned text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    /// Attribute name/value pairs in declaration order, duplicates kept
    pub attributes: Vec<(&'a str, &'a str)>,
    pub inner: &'a str,
}

/// Outcome of scanning one level of text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scan<'a> {
    pub tags: Vec<Tag<'a>>,
    /// Everything outside the matched elements, in order
    pub leftover: String,
}

/// Normalizes raw input before scanning: drops the `<?xml ... ?>`
/// declaration, every double space and every newline.
pub fn preprocess(text: &str) -> String {
    strip_declaration(text).replace("  ", "").replace('\n', "")
}

/// Removes the first declaration whose `?>` sits on the same line. The last
/// `?>` on that line closes it.
fn strip_declaration(text: &str) -> Cow<'_, str> {
    for (start, _) in text.match_indices(DECLARATION_START) {
        let body_start = start + DECLARATION_START.len();
        let body = text.get(body_start..).unwrap_or_default();
        let line = body.split(|c: char| matches!(c, '\n' | '\r')).next().unwrap_or_default();

        if let Some(offset) = line.rfind(DECLARATION_END) {
            let end = body_start + offset + DECLARATION_END.len();
            let before = text.get(..start).unwrap_or_default();
            let after = text.get(end..).unwrap_or_default();
            return Cow::Owned(format!("{before}{after}"));
        }
    }
    Cow::Borrowed(text)
}

/// Splits preprocessed text into top-level elements and leftover text
pub fn scan(source: &str) -> Scan<'_> {
    let tokens = tokenize(source);
    let closes = pair_tags(&tokens);
    let mut result = Scan::default();
    let mut cursor = Cursor::new(source);
    let mut next = 0;

    while !cursor.is_eof() {
        let start = cursor.pos();
        while tokens.get(next).is_some_and(|token| token.start() < start) {
            next += 1;
        }

        if let Some((tag, end)) = element_at(source, &tokens, &closes, next, start) {
            result.tags.push(tag);
            cursor = Cursor::at(source, end);
            continue;
        }

        cursor.advance();
        cursor.skip_to(b'<');
        result.leftover.push_str(cursor.slice_from(start));
    }

    result
}

/// An opening or closing tag, by byte offsets into the scanned text
#[derive(Clone, Debug, PartialEq, Eq)]
enum Token<'a> {
    Open {
        start: usize,
        name: &'a str,
        attributes: Vec<(&'a str, &'a str)>,
        content_start: usize,
    },
    Close {
        start: usize,
        name: &'a str,
        end: usize,
    },
}

impl Token<'_> {
    const fn start(&self) -> usize {
        match self {
            Self::Open { start, .. } | Self::Close { start, .. } => *start,
        }
    }
}

/// Collects every tag in one left-to-right pass. The inside of an opening
/// tag, attribute values included, never starts another tag.
fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);

    while cursor.skip_to(b'<') {
        let start = cursor.pos();
        let mut probe = Cursor::at(source, start);

        if let Some(name) = close_tag(&mut probe) {
            tokens.push(Token::Close {
                start,
                name,
                end: probe.pos(),
            });
            cursor = probe;
            continue;
        }

        probe = Cursor::at(source, start);
        match open_tag(&mut probe) {
            Some((name, attributes)) => {
                tokens.push(Token::Open {
                    start,
                    name,
                    attributes,
                    content_start: probe.pos(),
                });
                cursor = probe;
            }
            None => cursor.advance(),
        }
    }

    tokens
}

/// Pairs every opening tag with the closing tag that balances it, keeping
/// one stack of open tags per name. Indexed like `tokens`; holds the index
/// of the matching close.
fn pair_tags(tokens: &[Token<'_>]) -> Vec<Option<usize>> {
    let mut closes = vec![None; tokens.len()];
    let mut open: HashMap<&str, Vec<usize>> = HashMap::new();

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Open { name, .. } => open.entry(*name).or_default().push(index),
            Token::Close { name, .. } => {
                let opener = open.get_mut(name).and_then(Vec::pop);
                if let Some(slot) = opener.and_then(|opener| closes.get_mut(opener)) {
                    *slot = Some(index);
                }
            }
        }
    }

    closes
}

/// The element whose opening tag is `tokens[index]`, if that tag starts at
/// `start` and was closed. Returns it and the position past its closing tag.
fn element_at<'a>(
    source: &'a str,
    tokens: &[Token<'a>],
    closes: &[Option<usize>],
    index: usize,
    start: usize,
) -> Option<(Tag<'a>, usize)> {
    let Some(Token::Open {
        start: open_start,
        name,
        attributes,
        content_start,
    }) = tokens.get(index)
    else {
        return None;
    };
    if *open_start != start {
        return None;
    }

    let close = closes.get(index).copied().flatten()?;
    let Some(&Token::Close {
        start: content_end,
        end,
        ..
    }) = tokens.get(close)
    else {
        return None;
    };

    let tag = Tag {
        name: *name,
        attributes: attributes.clone(),
        inner: source.get(*content_start..content_end)?,
    };
    Some((tag, end))
}

type OpenTag<'a> = (&'a str, Vec<(&'a str, &'a str)>);

fn open_tag<'a>(cursor: &mut Cursor<'a>) -> Option<OpenTag<'a>> {
    if !cursor.consume(b'<') {
        return None;
    }
    let name = tag_name(cursor);

    let mut attributes = Vec::new();
    while cursor.consume(b' ') {
        let attribute = tag_name(cursor);
        if !cursor.consume_str("=\"") {
            return None;
        }
        let value_start = cursor.pos();
        if !cursor.skip_to(b'"') {
            return None;
        }
        attributes.push((attribute, cursor.slice_from(value_start)));
        cursor.advance();
    }

    cursor.consume(b'>').then_some((name, attributes))
}

fn close_tag<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    if !cursor.consume_str("</") {
        return None;
    }
    let name = tag_name(cursor);
    cursor.consume(b'>').then_some(name)
}

fn tag_name<'a>(cursor: &mut Cursor<'a>) -> &'a str {
    let start = cursor.pos();
    cursor.eat_while(|b| b.is_ascii_alphabetic() || b == b'_');
    cursor.eat_while(|b| b.is_ascii_digit());
    cursor.slice_from(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(scan: &Scan<'a>) -> Vec<&'a str> {
        scan.tags.iter().map(|tag| tag.name).collect()
    }

    #[test]
    fn test_preprocess_strips_declaration_spaces_and_newlines() {
        let text = "<?xml version=\"1.0\"?>\n<a>\n  <b>1</b>\n</a>";
        assert_eq!(preprocess(text), "<a><b>1</b></a>");
    }

    #[test]
    fn test_preprocess_three_spaces_leave_one() {
        assert_eq!(preprocess("<a>x   y</a>"), "<a>x y</a>");
        assert_eq!(preprocess("<a>x    y</a>"), "<a>xy</a>");
    }

    #[test]
    fn test_declaration_must_close_on_its_line() {
        assert_eq!(preprocess("<?xml\n?><a>1</a>"), "<?xml?><a>1</a>");
        assert_eq!(preprocess("<?xml a?>b?><a>1</a>"), "<a>1</a>");
    }

    #[test]
    fn test_scan_siblings() {
        let scan = scan("<a>1</a><b>2</b>");
        assert_eq!(names(&scan), vec!["a", "b"]);
        assert_eq!(scan.tags.first().map(|t| t.inner), Some("1"));
        assert!(scan.leftover.is_empty());
    }

    #[test]
    fn test_scan_duplicate_siblings_stay_separate() {
        let scan = scan("<a>1</a><a>2</a>");
        let inners: Vec<_> = scan.tags.iter().map(|t| t.inner).collect();
        assert_eq!(inners, vec!["1", "2"]);
    }

    #[test]
    fn test_scan_nested_same_name() {
        let scan = scan("<a><a>1</a></a>");
        assert_eq!(scan.tags.len(), 1);
        assert_eq!(scan.tags.first().map(|t| t.inner), Some("<a>1</a>"));
    }

    #[test]
    fn test_scan_attributes() {
        let scan = scan("<item id=\"7\" kind=\"x>y\">v</item>");
        let tag = scan.tags.first().cloned();
        assert_eq!(
            tag.map(|t| t.attributes),
            Some(vec![("id", "7"), ("kind", "x>y")])
        );
    }

    #[test]
    fn test_scan_collects_leftover() {
        let scan = scan("lead<a>1</a>mid<b>2</b>tail");
        assert_eq!(names(&scan), vec!["a", "b"]);
        assert_eq!(scan.leftover, "leadmidtail");
    }

    #[test]
    fn test_scan_unclosed_tag_is_leftover() {
        let scan = scan("<a>1</b>");
        assert!(scan.tags.is_empty());
        assert_eq!(scan.leftover, "<a>1</b>");
    }

    #[test]
    fn test_scan_rejects_malformed_open_tags() {
        assert!(scan("<a  b=\"c\">1</a>").tags.is_empty());
        assert!(scan("<a b='c'>1</a>").tags.is_empty());
        assert!(scan("<a1b>1</a1b>").tags.is_empty());
        assert!(scan("<a >1</a>").tags.is_empty());
    }

    #[test]
    fn test_scan_empty_name() {
        let scan = scan("<>x</>");
        assert_eq!(names(&scan), vec![""]);
    }

    #[test]
    fn test_scan_name_letters_then_digits() {
        let scan = scan("<item12>x</item12><_tag>y</_tag>");
        assert_eq!(names(&scan), vec!["item12", "_tag"]);
    }

    #[test]
    fn test_scan_same_name_inside_other_tags() {
        let scan = scan("<a><b><a>1</a></b></a><c>2</c>");
        assert_eq!(names(&scan), vec!["a", "c"]);
        assert_eq!(scan.tags.first().map(|t| t.inner), Some("<b><a>1</a></b>"));
    }

    #[test]
    fn test_scan_attribute_values_hold_no_tags() {
        let scan = scan("<a><b x=\"</a>\">1</b></a>");
        assert_eq!(names(&scan), vec!["a"]);
        assert_eq!(scan.tags.first().map(|t| t.inner), Some("<b x=\"</a>\">1</b>"));
        assert!(scan.leftover.is_empty());
    }

    #[test]
    fn test_scan_unmatched_close_before_element() {
        let scan = scan("</a><a>1</a>");
        assert_eq!(names(&scan), vec!["a"]);
        assert_eq!(scan.leftover, "</a>");
    }

    #[test]
    fn test_scan_inner_unclosed_tag_pairs_later() {
        let scan = scan("<a><a>1</a>");
        assert_eq!(scan.tags.first().map(|t| t.inner), Some("1"));
        assert_eq!(scan.leftover, "<a>");
    }

    #[test]
    fn test_pair_tags_balances_per_name() {
        let tokens = tokenize("<a><b></a></b>");
        assert_eq!(pair_tags(&tokens), vec![Some(2), Some(3), None, None]);
    }

    #[test]
    fn test_scan_name_punctuation_rejected() {
        for text in ["<a^>1</a^>", "<x[>1</x[>", "<`>1</`>"] {
            assert!(scan(text).tags.is_empty(), "{text} should not match");
        }
    }

    #[test]
    fn test_scan_non_ascii_leftover() {
        let scan = scan("é<a>1</a>ü");
        assert_eq!(scan.leftover, "éü");
    }
}
