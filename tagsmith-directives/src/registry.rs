//! Named factories that create the tree an `@html(...)` expression starts from.

use std::collections::HashMap;
use std::fmt;

use tagsmith::{Markup, MarkupError, RenderOptions};

use crate::DirectiveError;

/// Builds a new tree from resolved string arguments.
pub type Factory =
    Box<dyn Fn(&[String], &RenderOptions) -> Result<Markup, MarkupError> + Send + Sync>;

/// Factories by name. Built-in factories (`icon`, `h`, `element`, `addForm`
/// and every known tag) are always available; registered ones take precedence.
#[derive(Default)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any earlier one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&[String], &RenderOptions) -> Result<Markup, MarkupError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn build(
        &self,
        name: &str,
        args: &[String],
        options: &RenderOptions,
    ) -> Result<Markup, DirectiveError> {
        if let Some(factory) = self.factories.get(name) {
            debug!(name, args = args.len(), "custom factory");
            return Ok(factory(args, options)?);
        }
        Markup::build_with(name, args, options.clone()).map_err(|error| match error {
            MarkupError::UnknownShortcut { .. } => DirectiveError::UnknownFactory {
                name: name.to_string(),
            },
            error => error.into(),
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("factories", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn builtins() {
        let registry = Registry::new();
        let options = RenderOptions::default();
        let icon = registry.build("icon", &args(&["star", "2"]), &options).unwrap();
        assert_eq!(
            icon.to_html(),
            r#"<i class="fa fa-star fa-2" aria-hidden="true"></i>"#
        );
        let p = registry.build("p", &args(&["hello"]), &options).unwrap();
        assert_eq!(p.to_html(), "<p>hello</p>");
    }

    #[test]
    fn custom_factories_win() {
        let mut registry = Registry::new();
        registry.register("p", |args: &[String], options: &RenderOptions| {
            let mut markup = Markup::with_options("p", options.clone());
            markup.root_mut().add_class("lead").text(args.join(" "));
            Ok(markup)
        });
        assert!(registry.contains("p"));
        let p = registry
            .build("p", &args(&["a", "b"]), &RenderOptions::default())
            .unwrap();
        assert_eq!(p.to_html(), r#"<p class="lead">a b</p>"#);
        assert_eq!(format!("{registry:?}"), r#"Registry { factories: ["p"] }"#);
    }

    #[test]
    fn unknown_names() {
        let err = Registry::new()
            .build("blink", &[], &RenderOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            DirectiveError::UnknownFactory {
                name: "blink".to_string()
            }
        );
    }

    #[test]
    fn factory_errors_pass_through() {
        let err = Registry::new()
            .build("h", &args(&["big", "x"]), &RenderOptions::default())
            .unwrap_err();
        assert!(
            matches!(
                err,
                DirectiveError::Markup {
                    error: MarkupError::NotANumber { .. }
                }
            ),
            "{err:?}"
        );
    }
}
