//! Builder shortcuts on top of the core tree.
//!
//! Everything here funnels through [`NodeMut::set`], [`NodeMut::add_element`]
//! and [`NodeMut::text`]. Shortcuts that only make sense on some tags
//! (`href` on `<a>`, `src` on `<img>`, ...) are silent no-ops elsewhere.

use std::fmt::Write as _;

use chrono::NaiveDate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::attrs::AttrValue;
use crate::escape::escape_special;
use crate::markup::{Markup, NodeMut, NodeRef};
use crate::options::RenderOptions;
use crate::tracing_macros::debug;

/// Characters left alone by form-style URL encoding (`urlencode`).
const FORM_URLENCODE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Produces URLs for named controller actions, routes and paths.
///
/// The builder never resolves these itself; the host application supplies
/// its router.
pub trait UrlGenerator {
    /// URL of a controller action.
    fn action(&self, action: &str, parameters: &[(&str, &str)]) -> String;

    /// URL of a named route.
    fn route(&self, route: &str, parameters: &[(&str, &str)]) -> String;

    /// Absolute URL for a path; `secure` forces the scheme when set.
    fn url(&self, path: &str, parameters: &[(&str, &str)], secure: Option<bool>) -> String;
}

/// Encode like PHP's `urlencode`: spaces become `+`, everything but
/// alphanumerics and `-_.` is percent-encoded.
pub(crate) fn form_urlencode(input: &str) -> String {
    utf8_percent_encode(input, FORM_URLENCODE)
        .to_string()
        .replace("%20", "+")
}

fn with_fragment(mut href: String, target: &str) -> String {
    if !target.is_empty() {
        href.push('#');
        href.push_str(target);
    }
    href
}

impl<'a> NodeMut<'a> {
    fn tag_is(&self, tags: &[&str]) -> bool {
        tags.contains(&self.tag())
    }

    /// Append to the `style` attribute, creating it when missing.
    fn append_style(mut self, style: &str) -> Self {
        let slot = self.attrs_mut().entry("style");
        let mut current = match std::mem::take(slot) {
            AttrValue::Text(text) => text,
            AttrValue::List(items) => items.join(" "),
            _ => String::new(),
        };
        current.push_str(style);
        *slot = AttrValue::Text(current);
        self
    }

    fn push_classes<'c>(&mut self, names: impl Iterator<Item = &'c str>) {
        let slot = self.attrs_mut().entry("class");
        let mut list = match std::mem::take(slot) {
            AttrValue::List(items) => items,
            AttrValue::Text(text) if !text.is_empty() => vec![text],
            _ => Vec::new(),
        };
        list.extend(
            names
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        );
        *slot = AttrValue::List(list);
    }

    /// Sets the `id` attribute ([`id`](NodeMut::id) returns the node id).
    pub fn set_id(self, value: impl Into<AttrValue>) -> Self {
        self.set("id", value)
    }

    pub fn name(self, value: impl Into<AttrValue>) -> Self {
        self.set("name", value)
    }

    pub fn title(self, value: impl Into<AttrValue>) -> Self {
        self.set("title", value)
    }

    pub fn lang(self, value: impl Into<AttrValue>) -> Self {
        self.set("lang", value)
    }

    pub fn role(self, value: impl Into<AttrValue>) -> Self {
        self.set("role", value)
    }

    pub fn width(self, value: impl Into<AttrValue>) -> Self {
        self.set("width", value)
    }

    pub fn height(self, value: impl Into<AttrValue>) -> Self {
        self.set("height", value)
    }

    pub fn tabindex(self, value: impl Into<AttrValue>) -> Self {
        self.set("tabindex", value)
    }

    pub fn target(self, value: impl Into<AttrValue>) -> Self {
        self.set("target", value)
    }

    pub fn pattern(self, value: impl Into<AttrValue>) -> Self {
        self.set("pattern", value)
    }

    pub fn placeholder(self, value: impl Into<AttrValue>) -> Self {
        self.set("placeholder", value)
    }

    pub fn form(self, value: impl Into<AttrValue>) -> Self {
        self.set("form", value)
    }

    pub fn download(self, value: impl Into<AttrValue>) -> Self {
        self.set("download", value)
    }

    /// Sets `for`.
    pub fn add_for(self, value: impl Into<AttrValue>) -> Self {
        self.set("for", value)
    }

    /// Sets `action`.
    pub fn add_action(self, url: impl Into<AttrValue>) -> Self {
        self.set("action", url)
    }

    /// Form method; the usual value is `POST`.
    pub fn method(self, value: impl Into<AttrValue>) -> Self {
        self.set("method", value)
    }

    pub fn set_attribute(self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set(name, value)
    }

    /// Sets `data-{name}`.
    pub fn data(self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set(&format!("data-{name}"), value)
    }

    /// Sets `aria-{name}`.
    pub fn aria(self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set(&format!("aria-{name}"), value)
    }

    /// Sets the `on{event}` handler attribute.
    pub fn on(self, event: &str, value: impl Into<AttrValue>) -> Self {
        self.set(&format!("on{event}"), value)
    }

    pub fn add_attributes<I, K, V>(self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        self.set_all(attrs)
    }

    /// Sets `alt`, escaping special characters.
    pub fn alt(self, value: impl AsRef<str>) -> Self {
        let value = escape_special(value.as_ref()).into_owned();
        self.set("alt", value)
    }

    /// Sets `value`, escaping special characters.
    pub fn value(self, value: impl AsRef<str>) -> Self {
        let value = escape_special(value.as_ref()).into_owned();
        self.set("value", value)
    }

    /// Text content; inside a `<textarea>` special characters are escaped
    /// first, whatever the tree's options say.
    pub fn content(self, value: impl AsRef<str>) -> Self {
        if self.tag() == "textarea" {
            let escaped = escape_special(value.as_ref()).into_owned();
            self.text(escaped)
        } else {
            self.text(value)
        }
    }

    /// Only on `<a>`.
    pub fn href(self, value: impl Into<AttrValue>) -> Self {
        if self.tag_is(&["a"]) {
            return self.set("href", value);
        }
        self
    }

    /// Only on `<img>`.
    pub fn src(self, value: impl Into<AttrValue>) -> Self {
        if self.tag_is(&["img"]) {
            return self.set("src", value);
        }
        self
    }

    /// Only on `<input>`.
    pub fn min(self, value: impl Into<AttrValue>) -> Self {
        if self.tag_is(&["input"]) {
            return self.set("min", value);
        }
        self
    }

    /// Only on `<input>`.
    pub fn max(self, value: impl Into<AttrValue>) -> Self {
        if self.tag_is(&["input"]) {
            return self.set("max", value);
        }
        self
    }

    /// Only on `<input>`.
    pub fn maxlength(self, value: impl Into<AttrValue>) -> Self {
        if self.tag_is(&["input"]) {
            return self.set("maxlength", value);
        }
        self
    }

    /// Only on `<textarea>`.
    pub fn rows(self, value: impl Into<AttrValue>) -> Self {
        if self.tag_is(&["textarea"]) {
            return self.set("rows", value);
        }
        self
    }

    /// Only on `<form>` and `<input>`. The usual value is `off`.
    pub fn autocomplete(self, value: impl Into<AttrValue>) -> Self {
        if self.tag_is(&["form", "input"]) {
            return self.set("autocomplete", value);
        }
        self
    }

    /// Only on focusable form controls.
    pub fn autofocus(self) -> Self {
        if self.tag_is(&["button", "input", "keygen", "select", "textarea"]) {
            return self.set("autofocus", "autofocus");
        }
        self
    }

    /// Open an `<a>` in a new window.
    pub fn open_new(self) -> Self {
        if self.tag_is(&["a"]) {
            return self.set("target", "_blank");
        }
        self
    }

    pub fn checked(self, on: bool) -> Self {
        if on {
            return self.set("checked", "checked");
        }
        self
    }

    pub fn disable(self, on: bool) -> Self {
        if on {
            return self.set("disabled", "disabled");
        }
        self
    }

    /// Also adds the `required` class and `aria-required="true"`.
    pub fn required(self, on: bool) -> Self {
        if on {
            return self
                .add_class("required")
                .aria("required", "true")
                .set("required", "required");
        }
        self
    }

    pub fn multiple(self) -> Self {
        self.set("multiple", "multiple")
    }

    pub fn selected(self) -> Self {
        self.set("selected", "selected")
    }

    /// `dir="rtl"` or `dir="ltr"`.
    pub fn rtl(self, is_rtl: bool) -> Self {
        self.set("dir", if is_rtl { "rtl" } else { "ltr" })
    }

    /// Add whitespace-separated class names.
    ///
    /// A class set earlier as a single value becomes the first list entry.
    pub fn add_class(mut self, value: impl AsRef<str>) -> Self {
        self.push_classes(value.as_ref().split_whitespace());
        self
    }

    /// Add class names as given, each trimmed; empty names are skipped.
    pub fn add_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        self.push_classes(names.iter().map(AsRef::as_ref));
        self
    }

    pub fn add_class_if(self, check: bool, when_true: &str, when_false: &str) -> Self {
        self.add_class(if check { when_true } else { when_false })
    }

    /// Remove the first occurrence of a class name.
    pub fn remove_class(mut self, value: &str) -> Self {
        let Some(slot) = self.attrs_mut().get_mut("class") else {
            return self;
        };
        let emptied = match slot {
            AttrValue::List(items) => {
                if let Some(pos) = items.iter().position(|item| item == value) {
                    items.remove(pos);
                }
                false
            }
            AttrValue::Text(text) => text == value,
            _ => false,
        };
        if emptied {
            *slot = AttrValue::List(Vec::new());
        }
        self
    }

    /// Append to `style`, or replace it.
    pub fn style(self, value: &str, replace: bool) -> Self {
        if replace {
            return self.set("style", value);
        }
        self.append_style(value)
    }

    pub fn add_style_if(self, check: bool, when_true: &str, when_false: &str) -> Self {
        self.style(if check { when_true } else { when_false }, false)
    }

    /// Appends `display:hidden;` to `style`.
    pub fn hidden(self) -> Self {
        self.append_style("display:hidden;")
    }

    /// Appends `opacity: x;` to `style`, where `x` is the percentage as a
    /// fraction rounded to two places.
    pub fn opacity(self, percent: f64) -> Self {
        let fraction = percent.round() / 100.0;
        self.append_style(&format!("opacity: {fraction};"))
    }

    /// Sets `type`; a checkbox also gets `value="1"`.
    pub fn type_(self, value: &str) -> Self {
        let node = if value == "checkbox" {
            self.value("1")
        } else {
            self
        };
        node.set("type", value)
    }

    /// Sets `value` to a formatted date (empty when there is none) and,
    /// if given, `data-datepicker-format`.
    pub fn value_date(self, date: Option<NaiveDate>, format: &str, picker_format: Option<&str>) -> Self {
        let mut value = String::new();
        if let Some(date) = date
            && write!(value, "{}", date.format(format)).is_err()
        {
            debug!(format, "invalid date format, leaving value empty");
            value.clear();
        }
        let node = match picker_format {
            Some(picker) => self.data("datepicker-format", picker),
            None => self,
        };
        node.set("value", value)
    }

    /// `href="javascript:void(...)"`; with an argument, it is quoted and URL-encoded.
    pub fn script_link(self, argument: Option<&str>) -> Self {
        let inner = match argument {
            Some(arg) => format!("'{}'", form_urlencode(&escape_special(arg))),
            None => "0".to_string(),
        };
        self.set("href", format!("javascript:void({inner});"))
    }

    /// Append an icon child (see [`Markup::icon`]) and return it.
    pub fn add_icon(self, icon: &str, tag: &str) -> NodeMut<'a> {
        decorate_icon(self.add_element(tag), icon, 0)
    }

    /// Append an `<a>` to a controller action and return it.
    pub fn action(
        self,
        urls: &dyn UrlGenerator,
        text: &str,
        action: &str,
        parameters: &[(&str, &str)],
    ) -> NodeMut<'a> {
        self.add_element("a")
            .text(text)
            .href(urls.action(action, parameters))
    }

    pub fn action_href(self, urls: &dyn UrlGenerator, action: &str, parameters: &[(&str, &str)]) -> Self {
        self.href(urls.action(action, parameters))
    }

    /// Append an `<a>` to a named route (with optional `#target`) and return it.
    pub fn route(
        self,
        urls: &dyn UrlGenerator,
        text: &str,
        route: &str,
        parameters: &[(&str, &str)],
        target: &str,
    ) -> NodeMut<'a> {
        let href = with_fragment(urls.route(route, parameters), target);
        self.add_element("a").text(text).href(href)
    }

    pub fn route_href(
        self,
        urls: &dyn UrlGenerator,
        route: &str,
        parameters: &[(&str, &str)],
        target: &str,
    ) -> Self {
        self.href(with_fragment(urls.route(route, parameters), target))
    }

    /// Append an `<a>` to a path and return it.
    pub fn url(
        self,
        urls: &dyn UrlGenerator,
        text: &str,
        path: &str,
        parameters: &[(&str, &str)],
        secure: Option<bool>,
    ) -> NodeMut<'a> {
        self.add_element("a")
            .text(text)
            .href(urls.url(path, parameters, secure))
    }

    /// A new `<label>` tree wrapping a copy of this node, then `text`.
    pub fn label(&self, text: &str) -> Markup {
        self.as_node().label(text)
    }
}

impl NodeRef<'_> {
    /// A new `<label>` tree wrapping a copy of this node, then `text`.
    ///
    /// When this node has an `id`, the label's `for` points at it.
    pub fn label(&self, text: &str) -> Markup {
        let mut label = Markup::with_options("label", self.markup().options().clone());
        let root = label.root_mut();
        let root = match self.get("id") {
            Some(id) => root.add_for(id.clone()),
            None => root,
        };
        root.add_element(*self);
        label.root_mut().text(text);
        label
    }
}

/// Turn `node` into a Font Awesome icon.
///
/// A leading `-` uses the rest of the name verbatim, otherwise it gets an
/// `fa-` prefix; a non-zero size adds `fa-{size}`.
pub(crate) fn decorate_icon<'a>(node: NodeMut<'a>, icon: &str, size: u32) -> NodeMut<'a> {
    let icon = match icon.strip_prefix('-') {
        Some(raw) => raw.to_string(),
        None => format!("fa-{icon}"),
    };
    let size = if size > 0 {
        format!(" fa-{size}")
    } else {
        String::new()
    };
    node.add_class(format!("fa {icon}{size}"))
        .aria("hidden", "true")
}

impl Markup {
    /// An icon element: `Markup::icon("home", 2, "i")` renders
    /// `<i class="fa fa-home fa-2" aria-hidden="true"></i>`.
    pub fn icon(icon: &str, size: u32, tag: &str) -> Markup {
        let mut markup = Markup::new(tag);
        decorate_icon(markup.root_mut(), icon, size);
        markup
    }

    /// A heading `<h{size}>` with text.
    pub fn h(size: u8, text: &str) -> Markup {
        Markup::element_with(&format!("h{size}"), text, &[])
    }

    /// An element with optional text, then named shortcuts applied in order.
    ///
    /// Shortcuts that are unknown or get unusable arguments are skipped.
    pub fn element_with(tag: &str, text: &str, shortcuts: &[(&str, &[&str])]) -> Markup {
        Markup::element_in(tag, text, shortcuts, RenderOptions::default())
    }

    pub(crate) fn element_in(
        tag: &str,
        text: &str,
        shortcuts: &[(&str, &[&str])],
        options: RenderOptions,
    ) -> Markup {
        let mut markup = Markup::with_options(tag, options);
        if !text.is_empty() {
            markup.root_mut().text(text);
        }
        for &(name, args) in shortcuts {
            if let Err(_err) = markup.root_mut().call(name, args) {
                debug!(shortcut = name, error = %_err, "skipping shortcut");
            }
        }
        markup
    }

    /// An `<a>` tree linking to a controller action.
    pub fn action_link(urls: &dyn UrlGenerator, text: &str, action: &str, parameters: &[(&str, &str)]) -> Markup {
        let mut markup = Markup::a();
        markup
            .root_mut()
            .text(text)
            .href(urls.action(action, parameters));
        markup
    }

    /// An `<a>` tree linking to a named route, with `extra` appended to the
    /// URL and named shortcuts applied to the link.
    pub fn route_link(
        urls: &dyn UrlGenerator,
        text: &str,
        route: &str,
        parameters: &[(&str, &str)],
        shortcuts: &[(&str, &[&str])],
        extra: &str,
    ) -> Markup {
        let href = format!("{}{extra}", urls.route(route, parameters));
        let mut markup = Markup::a();
        markup.root_mut().text(text).href(href);
        for &(name, args) in shortcuts {
            if let Err(_err) = markup.root_mut().call(name, args) {
                debug!(shortcut = name, error = %_err, "skipping shortcut");
            }
        }
        markup
    }

    /// An `<a>` tree linking to a path.
    pub fn url_link(
        urls: &dyn UrlGenerator,
        text: &str,
        path: &str,
        parameters: &[(&str, &str)],
        secure: Option<bool>,
    ) -> Markup {
        let mut markup = Markup::a();
        markup
            .root_mut()
            .text(text)
            .href(urls.url(path, parameters, secure));
        markup
    }
}
