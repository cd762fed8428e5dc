//! Calling shortcuts by name with string arguments.
//!
//! Templates and configuration only have strings, so every shortcut that
//! takes plain values is reachable through [`Shortcut`]. Names match either
//! spelling: `addClass`, `add_class` and `ADDCLASS` are the same shortcut.
//!
//! Argument conversion:
//! - flags are false for `""`, `"0"`, `"false"` and `"null"`, true otherwise
//! - numbers must parse, or the call fails with [`MarkupError::NotANumber`]
//! - missing optional arguments take the defaults of the typed methods

use crate::MarkupError;
use crate::forms::FormSettings;
use crate::html::decorate_icon;
use crate::markup::{Markup, NodeMut};
use crate::options::RenderOptions;
use crate::tags::Tag;
use crate::tracing_macros::{debug, trace};

macro_rules! define_shortcuts {
    ($($variant:ident => $name:literal, $required:literal;)*) => {
        /// A shortcut callable by name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Shortcut {
            $($variant,)*
        }

        impl Shortcut {
            pub const ALL: &[Shortcut] = &[$(Shortcut::$variant,)*];

            /// The camelCase name.
            pub fn name(self) -> &'static str {
                match self {
                    $(Shortcut::$variant => $name,)*
                }
            }

            /// How many arguments must be given.
            pub fn required_args(self) -> usize {
                match self {
                    $(Shortcut::$variant => $required,)*
                }
            }
        }
    };
}

define_shortcuts! {
    AddAction => "addAction", 1;
    AddClass => "addClass", 1;
    AddClassIf => "addClassIf", 1;
    AddFor => "addFor", 1;
    AddIcon => "addIcon", 1;
    AddStyleIf => "addStyleIf", 1;
    Alt => "alt", 1;
    Aria => "aria", 2;
    Attr => "attr", 1;
    Autocomplete => "autocomplete", 0;
    Autofocus => "autofocus", 0;
    Checked => "checked", 0;
    Data => "data", 2;
    Disable => "disable", 0;
    Download => "download", 1;
    Form => "form", 1;
    Height => "height", 1;
    Hidden => "hidden", 0;
    Href => "href", 0;
    Id => "id", 1;
    Lang => "lang", 1;
    Max => "max", 1;
    Maxlength => "maxlength", 1;
    Method => "method", 0;
    Min => "min", 1;
    Multiple => "multiple", 0;
    Name => "name", 1;
    On => "on", 2;
    OpenNew => "openNew", 0;
    Opacity => "opacity", 1;
    Pattern => "pattern", 1;
    Placeholder => "placeholder", 1;
    RemoveClass => "removeClass", 1;
    Required => "required", 0;
    Role => "role", 1;
    Rows => "rows", 1;
    Rtl => "rtl", 0;
    ScriptLink => "scriptLink", 0;
    Selected => "selected", 0;
    Set => "set", 1;
    SetAttribute => "setAttribute", 2;
    SetTag => "setTag", 1;
    Src => "src", 1;
    Style => "style", 1;
    Tabindex => "tabindex", 1;
    Target => "target", 1;
    Text => "text", 1;
    Title => "title", 1;
    Type => "type", 1;
    Unset => "unset", 1;
    Value => "value", 0;
    Width => "width", 1;
}

/// Lowercase with underscores removed.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "null"
    )
}

fn number<T: std::str::FromStr>(shortcut: &str, value: &str) -> Result<T, MarkupError> {
    value.trim().parse().map_err(|_| MarkupError::NotANumber {
        name: shortcut.to_string(),
        value: value.to_string(),
    })
}

/// Positional string arguments with defaults for missing ones.
struct Args<'s, S> {
    args: &'s [S],
}

impl<'s, S: AsRef<str>> Args<'s, S> {
    fn get(&self, index: usize) -> Option<&'s str> {
        self.args.get(index).map(|arg| arg.as_ref())
    }

    fn or(&self, index: usize, default: &'s str) -> &'s str {
        self.get(index).unwrap_or(default)
    }

    /// A required argument; presence is checked before dispatch.
    fn at(&self, index: usize) -> &'s str {
        self.or(index, "")
    }

    fn flag_or(&self, index: usize, default: bool) -> bool {
        self.get(index).map_or(default, flag)
    }
}

impl Shortcut {
    /// Look up a shortcut by camelCase or snake_case name.
    pub fn from_name(name: &str) -> Option<Shortcut> {
        let wanted = normalize(name);
        Shortcut::ALL
            .iter()
            .copied()
            .find(|shortcut| normalize(shortcut.name()) == wanted)
    }

    /// Apply this shortcut to `node`.
    ///
    /// Returns the node the shortcut hands back: the same node for setters,
    /// the new child for `addIcon`.
    pub fn apply<'a, S: AsRef<str>>(self, node: NodeMut<'a>, args: &[S]) -> Result<NodeMut<'a>, MarkupError> {
        if args.len() < self.required_args() {
            return Err(MarkupError::MissingArgument {
                name: self.name().to_string(),
                expected: self.required_args(),
                got: args.len(),
            });
        }
        let a = Args { args };

        let node = match self {
            Shortcut::AddAction => node.add_action(a.at(0)),
            Shortcut::AddClass if args.len() > 1 => node.add_classes((0..args.len()).map(|i| a.at(i))),
            Shortcut::AddClass => node.add_class(a.at(0)),
            Shortcut::AddClassIf => node.add_class_if(flag(a.at(0)), a.or(1, ""), a.or(2, "")),
            Shortcut::AddFor => node.add_for(a.at(0)),
            Shortcut::AddIcon => node.add_icon(a.at(0), a.or(1, "i")),
            Shortcut::AddStyleIf => node.add_style_if(flag(a.at(0)), a.or(1, ""), a.or(2, "")),
            Shortcut::Alt => node.alt(a.at(0)),
            Shortcut::Aria => node.aria(a.at(0), a.at(1)),
            Shortcut::Attr | Shortcut::Set => node.set(a.at(0), a.get(1)),
            Shortcut::Autocomplete => node.autocomplete(a.or(0, "off")),
            Shortcut::Autofocus => node.autofocus(),
            Shortcut::Checked => node.checked(a.flag_or(0, true)),
            Shortcut::Data => node.data(a.at(0), a.at(1)),
            Shortcut::Disable => node.disable(a.flag_or(0, true)),
            Shortcut::Download => node.download(a.at(0)),
            Shortcut::Form => node.form(a.at(0)),
            Shortcut::Height => node.height(a.at(0)),
            Shortcut::Hidden => node.hidden(),
            Shortcut::Href => node.href(a.or(0, "")),
            Shortcut::Id => node.set_id(a.at(0)),
            Shortcut::Lang => node.lang(a.at(0)),
            Shortcut::Max => node.max(a.at(0)),
            Shortcut::Maxlength => node.maxlength(a.at(0)),
            Shortcut::Method => node.method(a.or(0, "POST")),
            Shortcut::Min => node.min(a.at(0)),
            Shortcut::Multiple => node.multiple(),
            Shortcut::Name => node.name(a.at(0)),
            Shortcut::On => node.on(a.at(0), a.at(1)),
            Shortcut::OpenNew if a.flag_or(0, false) => node,
            Shortcut::OpenNew => node.open_new(),
            Shortcut::Opacity => node.opacity(number(self.name(), a.at(0))?),
            Shortcut::Pattern => node.pattern(a.at(0)),
            Shortcut::Placeholder => node.placeholder(a.at(0)),
            Shortcut::RemoveClass => node.remove_class(a.at(0)),
            Shortcut::Required => node.required(a.flag_or(0, true)),
            Shortcut::Role => node.role(a.at(0)),
            Shortcut::Rows => node.rows(a.at(0)),
            Shortcut::Rtl => node.rtl(a.flag_or(0, false)),
            Shortcut::ScriptLink => node.script_link(a.get(0)),
            Shortcut::Selected => node.selected(),
            Shortcut::SetAttribute => node.set_attribute(a.at(0), a.at(1)),
            Shortcut::SetTag => node.set_tag(a.at(0)),
            Shortcut::Src => node.src(a.at(0)),
            Shortcut::Style => node.style(a.at(0), a.flag_or(1, false)),
            Shortcut::Tabindex => node.tabindex(a.at(0)),
            Shortcut::Target => node.target(a.at(0)),
            Shortcut::Text => node.content(a.at(0)),
            Shortcut::Title => node.title(a.at(0)),
            Shortcut::Type => node.type_(a.at(0)),
            Shortcut::Unset => node.unset(a.at(0)),
            Shortcut::Value => node.value(a.or(0, "")),
            Shortcut::Width => node.width(a.at(0)),
        };
        Ok(node)
    }
}

impl<'a> NodeMut<'a> {
    /// Call a shortcut by name.
    ///
    /// A name that is no shortcut but a known tag appends a child of that
    /// tag (extra arguments are ignored) and returns it.
    pub fn call<S: AsRef<str>>(self, name: &str, args: &[S]) -> Result<NodeMut<'a>, MarkupError> {
        if let Some(shortcut) = Shortcut::from_name(name) {
            trace!(shortcut = shortcut.name(), args = args.len(), "dispatch");
            return shortcut.apply(self, args);
        }
        if let Some(tag) = Tag::from_name(&name.to_ascii_lowercase()) {
            debug!(tag = tag.as_str(), "no shortcut by that name, adding child element");
            return Ok(self.add_element(tag));
        }
        Err(MarkupError::UnknownShortcut {
            name: name.to_string(),
        })
    }
}

impl Markup {
    /// Call a static factory by name.
    ///
    /// - `icon(name, size = 0, tag = "i")`
    /// - `h(size, text)`
    /// - `createElement(tag, text = "")`
    /// - `addForm(file_upload = false)`
    /// - any known tag: `div(text = "")`
    pub fn build<S: AsRef<str>>(name: &str, args: &[S]) -> Result<Markup, MarkupError> {
        Markup::build_with(name, args, RenderOptions::default())
    }

    /// [`build`](Markup::build) with explicit render options for the new tree.
    pub fn build_with<S: AsRef<str>>(
        name: &str,
        args: &[S],
        options: RenderOptions,
    ) -> Result<Markup, MarkupError> {
        let a = Args { args };
        let missing = |expected: usize| MarkupError::MissingArgument {
            name: name.to_string(),
            expected,
            got: args.len(),
        };

        let markup = match normalize(name).as_str() {
            "icon" => {
                let icon = a.get(0).ok_or_else(|| missing(1))?;
                let size = match a.get(1) {
                    Some(size) => number(name, size)?,
                    None => 0,
                };
                let mut markup = Markup::with_options(a.or(2, "i"), options);
                decorate_icon(markup.root_mut(), icon, size);
                markup
            }
            "h" => {
                if args.len() < 2 {
                    return Err(missing(2));
                }
                let size: u8 = number(name, a.at(0))?;
                Markup::element_in(&format!("h{size}"), a.at(1), &[], options)
            }
            "createelement" | "element" => {
                let tag = a.get(0).ok_or_else(|| missing(1))?;
                Markup::element_in(tag, a.or(1, ""), &[], options)
            }
            "addform" => {
                let settings = FormSettings {
                    file_upload: a.flag_or(0, false),
                    ..FormSettings::default()
                };
                Markup::form_in(&settings, options)
            }
            other => match Tag::from_name(other) {
                Some(tag) => Markup::element_in(tag.as_str(), a.or(0, ""), &[], options),
                None => {
                    return Err(MarkupError::UnknownShortcut {
                        name: name.to_string(),
                    });
                }
            },
        };
        Ok(markup)
    }
}
