//! Markup serializer.
//!
//! Walks a subtree and writes it out:
//!
//! - Elements render as `<tag attrs>children</tag>`
//! - Autoclosed elements render as `<tag attrs/>` and drop their children
//! - Fragments (empty tag) render their text, then their children
//! - Attributes render in insertion order; `Null` values are skipped and
//!   booleans follow the tree's output convention
//! - With `avoid_xss`, attribute values are escaped here (text was already
//!   escaped when it was added)

use std::fmt::{self, Write};

use indextree::NodeId;

use crate::attrs::{AttrValue, Attributes};
use crate::escape::escape;
use crate::markup::{Markup, NodeMut, NodeRef};
use crate::options::RenderOptions;

/// Render the subtree rooted at `id` to a string.
pub(crate) fn render_node(markup: &Markup, id: NodeId) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, markup);
    // Writing into a String cannot fail.
    let _ = ser.write_node(id);
    out
}

/// Render only the attribute list, with its leading spaces.
pub fn render_attributes(attrs: &Attributes, options: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = write_attributes(&mut out, attrs, options);
    out
}

struct Serializer<'a, W: Write> {
    out: &'a mut W,
    markup: &'a Markup,
}

impl<'a, W: Write> Serializer<'a, W> {
    fn new(out: &'a mut W, markup: &'a Markup) -> Self {
        Self { out, markup }
    }

    fn write_node(&mut self, id: NodeId) -> fmt::Result {
        let node = self.markup.data(id);

        if node.is_fragment() {
            self.out.write_str(node.text())?;
            return self.write_children(id);
        }

        write!(self.out, "<{}", node.tag())?;
        write_attributes(self.out, node.attrs(), self.markup.options())?;

        if node.is_autoclosed() {
            return self.out.write_str("/>");
        }

        self.out.write_char('>')?;
        self.write_children(id)?;
        write!(self.out, "</{}>", node.tag())
    }

    fn write_children(&mut self, id: NodeId) -> fmt::Result {
        for child in self.markup.children_of(id) {
            self.write_node(child)?;
        }
        Ok(())
    }
}

fn write_attributes<W: Write>(out: &mut W, attrs: &Attributes, options: &RenderOptions) -> fmt::Result {
    let xml = options.convention.is_xml_like();

    for (name, value) in attrs.iter() {
        match value {
            AttrValue::Null => {}
            AttrValue::Bool(true) if xml => write_attr(out, name, &[name], options)?,
            AttrValue::Bool(true) => {
                if options.bare_boolean_attributes {
                    write!(out, " {name}")?;
                }
            }
            AttrValue::Bool(false) if xml => write_attr(out, name, &[""], options)?,
            AttrValue::Bool(false) => {}
            AttrValue::Text(text) => write_attr(out, name, &[text.as_str()], options)?,
            AttrValue::List(items) => {
                let items: Vec<&str> = items.iter().map(String::as_str).collect();
                write_attr(out, name, &items, options)?
            }
        }
    }
    Ok(())
}

fn write_attr<W: Write>(out: &mut W, name: &str, values: &[&str], options: &RenderOptions) -> fmt::Result {
    write!(out, " {name}=\"")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        if options.avoid_xss {
            out.write_str(&escape(value, options.convention))?;
        } else {
            out.write_str(value)?;
        }
    }
    out.write_char('"')
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Serializer::new(f, self).write_node(self.root_id())
    }
}

/// Formats the whole tree the node belongs to, starting from its top.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Serializer::new(f, self.markup()).write_node(self.top().id())
    }
}

/// Formats the whole tree the node belongs to, starting from its top.
impl fmt::Display for NodeMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_node(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OutputConvention;
    use facet_testhelpers::test;

    fn html5() -> RenderOptions {
        RenderOptions::new().with_convention(OutputConvention::Html5)
    }

    #[test]
    fn element_with_text() {
        let mut markup = Markup::new("div");
        markup.root_mut().set("id", "x").text("hi");
        assert_eq!(markup.to_html(), r#"<div id="x">hi</div>"#);
    }

    #[test]
    fn autoclosed_drops_children() {
        let mut markup = Markup::new("img");
        markup.root_mut().set("src", "a.png").text("ignored").add_element("span");
        assert_eq!(markup.to_html(), r#"<img src="a.png"/>"#);
    }

    #[test]
    fn empty_root_renders_children_only() {
        let mut markup = Markup::new("");
        markup.root_mut().text("a").add_element("b").text("c");
        assert_eq!(markup.to_html(), "a<b>c</b>");
    }

    #[test]
    fn fragment_text_precedes_its_children() {
        let mut markup = Markup::new("p");
        markup.root_mut().add_element("").text("inner");
        assert_eq!(markup.to_html(), "<p>inner</p>");
    }

    #[test]
    fn list_values_are_space_joined() {
        let mut markup = Markup::new("span");
        markup.root_mut().set("class", ["a", "b", "c"]);
        assert_eq!(markup.to_html(), r#"<span class="a b c"></span>"#);
    }

    #[test]
    fn null_is_skipped() {
        let mut markup = Markup::new("span");
        markup.root_mut().set("title", None::<&str>).set("id", "k");
        assert_eq!(markup.to_html(), r#"<span id="k"></span>"#);
    }

    #[test]
    fn booleans_under_xml() {
        let mut markup = Markup::new("input");
        markup.root_mut().set("checked", true).set("disabled", false);
        assert_eq!(markup.to_html(), r#"<input checked="checked" disabled=""/>"#);
    }

    #[test]
    fn booleans_under_html_are_dropped() {
        let mut markup = Markup::with_options("input", html5());
        markup.root_mut().set("checked", true).set("disabled", false).set("type", "checkbox");
        assert_eq!(markup.to_html(), r#"<input type="checkbox"/>"#);
    }

    #[test]
    fn booleans_under_html_can_be_bare() {
        let opts = html5().with_bare_boolean_attributes(true);
        let mut markup = Markup::with_options("input", opts);
        markup.root_mut().set("checked", true).set("disabled", false);
        assert_eq!(markup.to_html(), "<input checked/>");
    }

    #[test]
    fn attribute_values_escaped_only_with_avoid_xss() {
        let mut plain = Markup::new("a");
        plain.root_mut().set("title", r#"say "hi""#);
        assert_eq!(plain.to_html(), r#"<a title="say "hi""></a>"#);

        let mut safe = Markup::with_options("a", RenderOptions::new().with_avoid_xss(true));
        safe.root_mut().set("title", r#"say "hi""#).set("class", ["<x>", "y"]);
        assert_eq!(
            safe.to_html(),
            r#"<a title="say &quot;hi&quot;" class="&lt;x&gt; y"></a>"#
        );
    }

    #[test]
    fn text_escaping_follows_options() {
        let mut plain = Markup::new("p");
        plain.root_mut().text("<script>");
        assert_eq!(plain.to_html(), "<p><script></p>");

        let mut safe = Markup::with_options("p", RenderOptions::new().with_avoid_xss(true));
        safe.root_mut().text("<script>");
        assert_eq!(safe.to_html(), "<p>&lt;script&gt;</p>");
    }

    #[test]
    fn display_renders_from_top() {
        let mut markup = Markup::new("div");
        let child = markup.root_mut().add_element("span").text("x").id();
        let node = markup.node(child).unwrap();
        assert_eq!(node.to_html(), "<span>x</span>");
        assert_eq!(node.to_string(), "<div><span>x</span></div>");
        assert_eq!(node.s(true), "<div><span>x</span></div>");
        assert_eq!(node.s(false), "");
    }

    #[test]
    fn render_attributes_alone() {
        let mut attrs = Attributes::new();
        attrs.set("a", "1".into());
        attrs.set("b", AttrValue::Null);
        attrs.set("c", true.into());
        assert_eq!(render_attributes(&attrs, &RenderOptions::default()), r#" a="1" c="c""#);
        assert_eq!(render_attributes(&attrs, &html5()), r#" a="1""#);
    }
}
