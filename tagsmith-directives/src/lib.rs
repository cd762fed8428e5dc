//! Template directives for tagsmith.
//!
//! Two directives turn template text into markup:
//!
//! - `@icon(name)` renders an icon; `name` is a literal (quotes optional) or a
//!   `$variable` from the [`Context`]
//! - `@html(factory(args)->shortcut(args)...)` builds a tree with a named
//!   factory, applies chained shortcuts, and renders the whole tree
//!
//! Expressions are compiled into an [`Expr`] first, then evaluated by a
//! [`Renderer`] against a context of template variables. `@@` escapes a
//! literal `@`.
//!
//! ```rust
//! use tagsmith_directives::{Context, Renderer};
//!
//! let renderer = Renderer::default();
//! let ctx = Context::new().with("name", "Ada");
//! let out = renderer
//!     .expand("Hi @html(strong($name)->addClass('who'))! @icon(star)", &ctx)
//!     .unwrap();
//! assert_eq!(
//!     out,
//!     r#"Hi <strong class="who">Ada</strong>! <i class="fa fa-star" aria-hidden="true"></i>"#
//! );
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use facet::Facet;
use tagsmith::MarkupError;

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($tt:tt)*) => { ::tracing::debug!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => { ::tracing::trace!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

mod expand;
mod parse;
mod registry;

pub use expand::Renderer;
pub use parse::{Arg, Call, Expr, compile};
pub use registry::{Factory, Registry};

/// A template directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum Directive {
    /// `@icon(name)`
    Icon,
    /// `@html(expression)`
    Html,
}

impl Directive {
    pub fn name(self) -> &'static str {
        match self {
            Directive::Icon => "icon",
            Directive::Html => "html",
        }
    }

    pub fn from_name(name: &str) -> Option<Directive> {
        match name {
            "icon" => Some(Directive::Icon),
            "html" => Some(Directive::Html),
            _ => None,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Directive {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Directive::from_name(s).ok_or_else(|| DirectiveError::UnknownDirective {
            name: s.to_string(),
        })
    }
}

/// Errors from compiling, evaluating or expanding directives.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum DirectiveError {
    /// unknown directive {name}
    UnknownDirective { name: String },

    /// syntax error at offset {position}: {message}
    Syntax { message: String, position: usize },

    /// undefined template variable ${name}
    UndefinedVariable { name: String },

    /// unknown factory {name}
    UnknownFactory { name: String },

    /// unclosed directive @{name} at offset {position}
    Unclosed { name: String, position: usize },

    /// {error}
    Markup { error: MarkupError },
}

impl From<MarkupError> for DirectiveError {
    fn from(error: MarkupError) -> Self {
        DirectiveError::Markup { error }
    }
}

/// Template variables, by name (without the `$`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Facet)]
#[facet(default)]
pub struct Context {
    #[facet(default)]
    pub vars: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Load variables from `{"vars": {"name": "value", ...}}`.
    pub fn from_json(json: &str) -> Result<Self, DirectiveError> {
        facet_json::from_str::<Context>(json).map_err(|e| DirectiveError::Syntax {
            message: e.to_string(),
            position: 0,
        })
    }
}
