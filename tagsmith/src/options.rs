//! Render configuration, fixed per tree at root creation.

use facet::Facet;
use std::fmt;
use std::str::FromStr;

use crate::MarkupError;

/// Output convention used for boolean attributes and entity escaping.
///
/// `Xml1` and `Xhtml` are XML-like: boolean attributes always carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Facet)]
#[repr(u8)]
pub enum OutputConvention {
    /// XML 1.0 (default)
    #[default]
    Xml1,
    /// XHTML
    Xhtml,
    /// HTML 4.01
    Html401,
    /// HTML5
    Html5,
}

impl OutputConvention {
    /// Whether boolean attributes follow the XML rules (`name="name"`).
    pub fn is_xml_like(self) -> bool {
        matches!(self, OutputConvention::Xml1 | OutputConvention::Xhtml)
    }

    /// Whether non-ASCII characters with a named entity get replaced by it.
    pub fn uses_named_entities(self) -> bool {
        !matches!(self, OutputConvention::Xml1)
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputConvention::Xml1 => "xml1",
            OutputConvention::Xhtml => "xhtml",
            OutputConvention::Html401 => "html401",
            OutputConvention::Html5 => "html5",
        }
    }
}

impl fmt::Display for OutputConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputConvention {
    type Err = MarkupError;

    /// Accepts `xml1`, `xhtml`, `html401` and `html5`, in any case, with or
    /// without an `ent_` prefix (`ENT_HTML5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("ent_").unwrap_or(&lower);
        match name {
            "xml1" | "xml" => Ok(OutputConvention::Xml1),
            "xhtml" => Ok(OutputConvention::Xhtml),
            "html401" | "html4" => Ok(OutputConvention::Html401),
            "html5" | "html" => Ok(OutputConvention::Html5),
            _ => Err(MarkupError::UnknownConvention {
                name: s.to_string(),
            }),
        }
    }
}

/// Options that control how a tree escapes and renders.
///
/// These replace what would otherwise be process-wide switches: every
/// [`Markup`](crate::Markup) carries its own copy, so trees with different
/// policies can coexist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Facet)]
#[facet(default)]
pub struct RenderOptions {
    /// Escape text content and attribute values (default: false)
    #[facet(default)]
    pub avoid_xss: bool,
    /// Output convention for boolean attributes and escaping (default: `Xml1`)
    #[facet(default)]
    pub convention: OutputConvention,
    /// Under HTML-like conventions, render `true` attributes as a bare name
    /// instead of dropping them (default: false)
    #[facet(default)]
    pub bare_boolean_attributes: bool,
}

impl RenderOptions {
    /// Create new default options (no escaping, XML convention).
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn escaping of text and attribute values on or off.
    pub fn with_avoid_xss(mut self, avoid_xss: bool) -> Self {
        self.avoid_xss = avoid_xss;
        self
    }

    /// Set the output convention.
    pub fn with_convention(mut self, convention: OutputConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Render `true` attributes as bare names under HTML-like conventions.
    pub fn with_bare_boolean_attributes(mut self, bare: bool) -> Self {
        self.bare_boolean_attributes = bare;
        self
    }

    /// Load options from a JSON object; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, MarkupError> {
        facet_json::from_str::<RenderOptions>(json).map_err(|e| MarkupError::InvalidOptions {
            message: e.to_string(),
        })
    }

    /// Serialize these options to JSON.
    pub fn to_json(&self) -> Result<String, MarkupError> {
        facet_json::to_string(self).map_err(|e| MarkupError::InvalidOptions {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn default_is_xml_without_escaping() {
        let opts = RenderOptions::default();
        assert!(!opts.avoid_xss);
        assert_eq!(opts.convention, OutputConvention::Xml1);
        assert!(opts.convention.is_xml_like());
    }

    #[test]
    fn convention_from_str() {
        assert_eq!("html5".parse::<OutputConvention>().unwrap(), OutputConvention::Html5);
        assert_eq!("ENT_XHTML".parse::<OutputConvention>().unwrap(), OutputConvention::Xhtml);
        assert_eq!("Html401".parse::<OutputConvention>().unwrap(), OutputConvention::Html401);
        assert_eq!(
            "sgml".parse::<OutputConvention>(),
            Err(MarkupError::UnknownConvention {
                name: "sgml".to_string()
            })
        );
    }

    #[test]
    fn html_conventions_are_not_xml_like() {
        assert!(!OutputConvention::Html5.is_xml_like());
        assert!(!OutputConvention::Html401.is_xml_like());
        assert!(OutputConvention::Xhtml.is_xml_like());
    }

    #[test]
    fn builder_setters() {
        let opts = RenderOptions::new()
            .with_avoid_xss(true)
            .with_convention(OutputConvention::Html5)
            .with_bare_boolean_attributes(true);
        assert!(opts.avoid_xss);
        assert_eq!(opts.convention, OutputConvention::Html5);
        assert!(opts.bare_boolean_attributes);
    }

    #[test]
    fn json_roundtrip() {
        let opts = RenderOptions::new()
            .with_avoid_xss(true)
            .with_convention(OutputConvention::Html401);
        let json = opts.to_json().unwrap();
        assert_eq!(RenderOptions::from_json(&json).unwrap(), opts);
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(matches!(
            RenderOptions::from_json("{ not json"),
            Err(MarkupError::InvalidOptions { .. })
        ));
    }
}
