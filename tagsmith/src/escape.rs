//! Entity escaping for text content and attribute values.
//!
//! Two flavours:
//! - [`escape`]: full escaping as used by the XSS-avoidance policy. Quotes,
//!   markup characters, named entities (HTML conventions) and characters the
//!   document type disallows.
//! - [`escape_special`]: only the five markup-significant characters, used by
//!   shortcuts that always escape (`alt`, `value`).

use std::borrow::Cow;

use crate::entities::named_entity;
use crate::options::OutputConvention;

/// Escape `input` for the given output convention.
///
/// Returns the input unchanged (borrowed) when nothing needs replacing.
pub fn escape(input: &str, convention: OutputConvention) -> Cow<'_, str> {
    if !input.chars().any(|c| needs_escape(c, convention)) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str(apos_entity(convention)),
            c if !is_allowed(c, convention) => out.push('\u{FFFD}'),
            c if !c.is_ascii() && convention.uses_named_entities() => match named_entity(c) {
                Some(name) => {
                    out.push('&');
                    out.push_str(name);
                    out.push(';');
                }
                None => out.push(c),
            },
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape only `& < > " '`, with `'` as `&#039;`.
pub fn escape_special(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn apos_entity(convention: OutputConvention) -> &'static str {
    match convention {
        OutputConvention::Html401 => "&#039;",
        _ => "&apos;",
    }
}

fn needs_escape(c: char, convention: OutputConvention) -> bool {
    matches!(c, '&' | '<' | '>' | '"' | '\'')
        || !is_allowed(c, convention)
        || (!c.is_ascii() && convention.uses_named_entities() && named_entity(c).is_some())
}

/// Whether a code point may appear in a document of this type.
fn is_allowed(c: char, convention: OutputConvention) -> bool {
    let cp = c as u32;
    let astral_ok = |cp: u32| (cp & 0xFFFF) < 0xFFFE && !(0xFDD0..=0xFDEF).contains(&cp);
    match convention {
        OutputConvention::Xml1 | OutputConvention::Xhtml => {
            matches!(cp, 0x09 | 0x0A | 0x0D)
                || (0x20..=0xD7FF).contains(&cp)
                || ((0xE000..=0x10FFFF).contains(&cp) && cp != 0xFFFE && cp != 0xFFFF)
        }
        OutputConvention::Html401 => {
            matches!(cp, 0x09 | 0x0A | 0x0D)
                || (0x20..=0x7E).contains(&cp)
                || (0xA0..=0xD7FF).contains(&cp)
                || ((0xE000..=0x10FFFF).contains(&cp) && astral_ok(cp))
        }
        OutputConvention::Html5 => {
            matches!(cp, 0x09 | 0x0A | 0x0C | 0x0D)
                || (0x20..=0x7E).contains(&cp)
                || (0xA0..=0xD7FF).contains(&cp)
                || ((0xE000..=0x10FFFF).contains(&cp) && astral_ok(cp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn script_tag_is_escaped() {
        assert_eq!(
            escape("<script>alert(1)</script>", OutputConvention::Xml1),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(
            escape("hello world", OutputConvention::Html5),
            Cow::Borrowed(_)
        ));
        assert!(matches!(escape_special("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn quotes_depend_on_convention() {
        assert_eq!(escape("'\"", OutputConvention::Xml1), "&apos;&quot;");
        assert_eq!(escape("'", OutputConvention::Html401), "&#039;");
        assert_eq!(escape("'", OutputConvention::Html5), "&apos;");
    }

    #[test]
    fn ampersand_is_always_encoded() {
        assert_eq!(escape("a &amp; b", OutputConvention::Xml1), "a &amp;amp; b");
    }

    #[test]
    fn named_entities_only_outside_xml() {
        assert_eq!(escape("café", OutputConvention::Xml1), "café");
        assert_eq!(escape("café", OutputConvention::Html401), "caf&eacute;");
        assert_eq!(escape("5 €", OutputConvention::Html5), "5 &euro;");
        assert_eq!(escape("ü", OutputConvention::Xhtml), "&uuml;");
    }

    #[test]
    fn disallowed_characters_become_replacement() {
        assert_eq!(escape("a\u{1}b", OutputConvention::Xml1), "a\u{FFFD}b");
        assert_eq!(escape("a\u{7F}b", OutputConvention::Xml1), "a\u{7F}b");
        assert_eq!(escape("a\u{7F}b", OutputConvention::Html5), "a\u{FFFD}b");
        assert_eq!(escape("\u{C}", OutputConvention::Html5), "\u{C}");
        assert_eq!(escape("\u{C}", OutputConvention::Html401), "\u{FFFD}");
        assert_eq!(escape("tab\there\n", OutputConvention::Html401), "tab\there\n");
    }

    #[test]
    fn special_uses_numeric_apostrophe() {
        assert_eq!(
            escape_special(r#"<a href="x">O'Neil & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#039;Neil &amp; co&lt;/a&gt;"
        );
        assert_eq!(escape_special("é"), "é");
    }
}
