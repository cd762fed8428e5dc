//! Known HTML tags and one builder method per tag.
//!
//! The table below generates the [`Tag`] enum, a child builder on
//! [`NodeMut`] (`node.div()` appends a `<div>` and returns it) and a root
//! factory on [`Markup`] (`Markup::div()`). Tags whose name is already taken
//! by a shortcut get a `_tag` suffix: `form_tag`, `label_tag`, `title_tag`,
//! `data_tag`, `style_tag`, `s_tag`.

use std::fmt;
use std::str::FromStr;

use crate::MarkupError;
use crate::markup::{Markup, NodeMut, is_autoclose_tag};

macro_rules! define_tags {
    ($($variant:ident => $name:literal, $method:ident;)*) => {
        /// A known HTML tag name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Tag {
            $($variant,)*
        }

        impl Tag {
            /// Every known tag, in table order.
            pub const ALL: &[Tag] = &[$(Tag::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Tag::$variant => $name,)*
                }
            }

            /// Exact (lowercase) lookup.
            pub fn from_name(name: &str) -> Option<Tag> {
                match name {
                    $($name => Some(Tag::$variant),)*
                    _ => None,
                }
            }
        }

        impl<'a> NodeMut<'a> {
            $(
                #[doc = concat!("Append a `<", $name, ">` child and return it.")]
                pub fn $method(self) -> NodeMut<'a> {
                    self.add_element(Tag::$variant)
                }
            )*
        }

        impl Markup {
            $(
                #[doc = concat!("Create a tree rooted at a `<", $name, ">` element.")]
                pub fn $method() -> Markup {
                    Markup::new($name)
                }
            )*
        }
    };
}

define_tags! {
    A => "a", a;
    Abbr => "abbr", abbr;
    Address => "address", address;
    Area => "area", area;
    Article => "article", article;
    Aside => "aside", aside;
    Audio => "audio", audio;
    B => "b", b;
    Base => "base", base;
    Bdi => "bdi", bdi;
    Bdo => "bdo", bdo;
    Blockquote => "blockquote", blockquote;
    Body => "body", body;
    Br => "br", br;
    Button => "button", button;
    Canvas => "canvas", canvas;
    Caption => "caption", caption;
    Cite => "cite", cite;
    Code => "code", code;
    Col => "col", col;
    Colgroup => "colgroup", colgroup;
    Command => "command", command;
    Data => "data", data_tag;
    Datalist => "datalist", datalist;
    Dd => "dd", dd;
    Del => "del", del;
    Details => "details", details;
    Dfn => "dfn", dfn;
    Dialog => "dialog", dialog;
    Div => "div", div;
    Dl => "dl", dl;
    Dt => "dt", dt;
    Em => "em", em;
    Embed => "embed", embed;
    Fieldset => "fieldset", fieldset;
    Figcaption => "figcaption", figcaption;
    Figure => "figure", figure;
    Footer => "footer", footer;
    Form => "form", form_tag;
    H1 => "h1", h1;
    H2 => "h2", h2;
    H3 => "h3", h3;
    H4 => "h4", h4;
    H5 => "h5", h5;
    H6 => "h6", h6;
    Head => "head", head;
    Header => "header", header;
    Hr => "hr", hr;
    Html => "html", html;
    I => "i", i;
    Iframe => "iframe", iframe;
    Img => "img", img;
    Input => "input", input;
    Ins => "ins", ins;
    Kbd => "kbd", kbd;
    Keygen => "keygen", keygen;
    Label => "label", label_tag;
    Legend => "legend", legend;
    Li => "li", li;
    Link => "link", link;
    Main => "main", main;
    Map => "map", map;
    Mark => "mark", mark;
    Menu => "menu", menu;
    Meta => "meta", meta;
    Meter => "meter", meter;
    Nav => "nav", nav;
    Noscript => "noscript", noscript;
    Object => "object", object;
    Ol => "ol", ol;
    Optgroup => "optgroup", optgroup;
    Option => "option", option;
    Output => "output", output;
    P => "p", p;
    Param => "param", param;
    Picture => "picture", picture;
    Pre => "pre", pre;
    Progress => "progress", progress;
    Q => "q", q;
    Rp => "rp", rp;
    Rt => "rt", rt;
    Ruby => "ruby", ruby;
    S => "s", s_tag;
    Samp => "samp", samp;
    Script => "script", script;
    Section => "section", section;
    Select => "select", select;
    Small => "small", small;
    Source => "source", source;
    Span => "span", span;
    Strong => "strong", strong;
    Style => "style", style_tag;
    Sub => "sub", sub;
    Summary => "summary", summary;
    Sup => "sup", sup;
    Table => "table", table;
    Tbody => "tbody", tbody;
    Td => "td", td;
    Template => "template", template;
    Textarea => "textarea", textarea;
    Tfoot => "tfoot", tfoot;
    Th => "th", th;
    Thead => "thead", thead;
    Time => "time", time;
    Title => "title", title_tag;
    Tr => "tr", tr;
    Track => "track", track;
    U => "u", u;
    Ul => "ul", ul;
    Var => "var", var;
    Video => "video", video;
    Wbr => "wbr", wbr;
}

impl Tag {
    /// Whether elements of this tag render as `<tag/>`.
    pub fn is_void(self) -> bool {
        is_autoclose_tag(self.as_str())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = MarkupError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::from_name(&s.to_ascii_lowercase()).ok_or_else(|| MarkupError::UnknownTag {
            name: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn names_roundtrip_through_from_str() {
        for tag in Tag::ALL {
            assert_eq!(tag.as_str().parse::<Tag>().unwrap(), *tag);
        }
        assert_eq!("DIV".parse::<Tag>().unwrap(), Tag::Div);
        assert!(matches!(
            "blink".parse::<Tag>(),
            Err(MarkupError::UnknownTag { .. })
        ));
    }

    #[test]
    fn void_tags_follow_the_autoclose_list() {
        assert!(Tag::Img.is_void());
        assert!(Tag::Source.is_void());
        assert!(!Tag::Div.is_void());
        // Not in the autoclose list, so it renders a closing tag.
        assert!(!Tag::Wbr.is_void());
    }

    #[test]
    fn builders_chain() {
        let mut markup = Markup::ul();
        markup.root_mut().li().text("one").parent().unwrap().li().text("two");
        assert_eq!(markup.to_html(), "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn suffixed_builders_use_the_plain_tag() {
        let mut markup = Markup::form_tag();
        markup.root_mut().label_tag().text("Name");
        assert_eq!(markup.to_html(), "<form><label>Name</label></form>");
    }
}
