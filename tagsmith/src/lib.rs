//! Fluent HTML/XML markup builder.
//!
//! tagsmith provides:
//! - **Markup trees**: arena-backed element trees built with chainable calls
//! - **Rendering**: attribute and boolean rules per output convention, void
//!   elements, optional entity escaping against XSS
//! - **Shortcuts**: attribute helpers, class and style lists, icons, labels,
//!   option lists and forms
//! - **Named dispatch**: shortcuts and tags callable by name with string
//!   arguments, for templates and configuration
//!
//! # Example
//!
//! ```rust
//! use tagsmith::{Markup, OutputConvention, RenderOptions};
//!
//! let mut list = Markup::ul();
//! list.root_mut()
//!     .add_class("menu")
//!     .li()
//!     .text("Home")
//!     .parent()
//!     .unwrap()
//!     .li()
//!     .text("About");
//! assert_eq!(
//!     list.to_html(),
//!     r#"<ul class="menu"><li>Home</li><li>About</li></ul>"#
//! );
//!
//! // Escaping and boolean attributes are per tree.
//! let options = RenderOptions::new()
//!     .with_avoid_xss(true)
//!     .with_convention(OutputConvention::Html5);
//! let mut input = Markup::with_options("input", options);
//! input.root_mut().set("value", "<b>").set("disabled", false);
//! assert_eq!(input.to_html(), r#"<input value="&lt;b&gt;"/>"#);
//! ```

mod tracing_macros;

mod attrs;
mod entities;
mod error;
mod escape;
mod forms;
mod html;
mod markup;
mod options;
mod serialize;
mod shortcut;
mod tags;

pub use attrs::{AttrValue, Attributes};
pub use error::MarkupError;
pub use escape::{escape, escape_special};
pub use forms::{BREAK, FormSettings, SelectOption, UploadLimits, parse_size, prepare_options};
pub use html::UrlGenerator;
pub use markup::{AUTOCLOSE_TAGS, ElementSource, Markup, NodeData, NodeMut, NodeRef, is_autoclose_tag};
pub use options::{OutputConvention, RenderOptions};
pub use serialize::render_attributes;
pub use shortcut::Shortcut;
pub use tags::Tag;

// Re-export for users that address nodes by id
pub use indextree::NodeId;
