//! Form helpers: `<option>` lists and upload-aware `<form>` roots.

use facet::Facet;

use crate::MarkupError;
use crate::markup::{Markup, NodeMut};
use crate::options::RenderOptions;

/// Label that turns an option into a disabled separator.
pub const BREAK: &str = "BREAK";

/// One entry of a `<select>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Facet)]
#[facet(default)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[facet(default)]
    pub style: Option<String>,
    #[facet(default)]
    pub class: Option<String>,
    #[facet(default)]
    pub id: Option<String>,
    #[facet(default)]
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// A separator; `value`, when not empty, is shown as `--- value ---`.
    pub fn separator(value: impl Into<String>) -> Self {
        Self::new(value, BREAK)
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Turn `(value, label)` pairs into options, optionally preceded by a blank
/// entry carrying `blank_value`.
pub fn prepare_options<I, V, L>(pairs: I, blank_first: bool, blank_value: &str) -> Vec<SelectOption>
where
    I: IntoIterator<Item = (V, L)>,
    V: Into<String>,
    L: Into<String>,
{
    let mut options = Vec::new();
    if blank_first {
        options.push(SelectOption::new(blank_value, ""));
    }
    options.extend(pairs.into_iter().map(|(v, l)| SelectOption::new(v, l)));
    options
}

impl<'a> NodeMut<'a> {
    /// Append one `<option>` per entry and return this node.
    ///
    /// Entries labelled [`BREAK`] become disabled separators with an empty
    /// value. Options whose value is in `selected` get `selected`.
    pub fn add_options<I>(mut self, options: I, selected: &[&str]) -> Self
    where
        I: IntoIterator<Item = SelectOption>,
    {
        for option in options {
            let SelectOption {
                mut value,
                mut label,
                style,
                class,
                id,
                mut disabled,
            } = option;

            if label == BREAK {
                label = if value.is_empty() {
                    "--------------------".to_string()
                } else {
                    format!("--- {value} ---")
                };
                value.clear();
                disabled = true;
            }

            let is_selected = selected.contains(&value.as_str());
            self = self.with_child("option", |node| {
                let mut node = node.value(&value).text(&label);
                for (name, attr) in [("style", style), ("class", class), ("id", id)] {
                    if let Some(attr) = attr {
                        node = node.set(name, attr);
                    }
                }
                if disabled {
                    node = node.set("disabled", "disabled");
                }
                if is_selected {
                    node = node.selected();
                }
                node
            });
        }
        self
    }
}

/// Server-side upload limits, as size strings (`8M`, `512K`, `1G`).
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
#[facet(default)]
pub struct UploadLimits {
    /// Largest accepted request body (default: `8M`)
    pub post_max_size: String,
    /// Largest accepted single file; zero means no limit (default: `2M`)
    pub upload_max_filesize: String,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            post_max_size: "8M".to_string(),
            upload_max_filesize: "2M".to_string(),
        }
    }
}

impl UploadLimits {
    pub fn from_json(json: &str) -> Result<Self, MarkupError> {
        facet_json::from_str::<UploadLimits>(json).map_err(|e| MarkupError::InvalidOptions {
            message: e.to_string(),
        })
    }

    /// The effective limit as written in the configuration.
    pub fn max_size_string(&self) -> &str {
        let post = parse_size(&self.post_max_size);
        let upload = parse_size(&self.upload_max_filesize);
        if upload > 0 && upload < post {
            &self.upload_max_filesize
        } else {
            &self.post_max_size
        }
    }

    /// The effective limit in bytes: the post limit, lowered to the upload
    /// limit when that one is set and smaller.
    pub fn max_size_bytes(&self) -> u64 {
        parse_size(self.max_size_string())
    }
}

/// Convert a size like `2M` or `1.5k` to bytes.
///
/// The first unit letter (`b k m g t p e z y`, any case) picks the power of
/// 1024; everything but digits and `.` is ignored for the number.
pub fn parse_size(size: &str) -> u64 {
    const UNITS: &str = "bkmgtpezy";

    let unit = size
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .find(|c| UNITS.contains(*c));
    let number: String = size
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let number: f64 = number.parse().unwrap_or(0.0);

    let power = unit.and_then(|u| UNITS.find(u)).unwrap_or(0) as i32;
    // Saturates on overflow.
    (number * 1024f64.powi(power)).round() as u64
}

/// Settings for [`Markup::add_form`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Facet)]
#[facet(default)]
pub struct FormSettings {
    /// Add a hidden `MAX_FILE_SIZE` input
    #[facet(default)]
    pub file_upload: bool,
    #[facet(default)]
    pub limits: UploadLimits,
}

impl FormSettings {
    pub fn from_json(json: &str) -> Result<Self, MarkupError> {
        facet_json::from_str::<FormSettings>(json).map_err(|e| MarkupError::InvalidOptions {
            message: e.to_string(),
        })
    }
}

impl Markup {
    /// A `<form>` root. With `file_upload`, it starts with a hidden
    /// `MAX_FILE_SIZE` input holding the upload limit in bytes.
    pub fn add_form(settings: &FormSettings) -> Markup {
        Markup::form_in(settings, RenderOptions::default())
    }

    pub(crate) fn form_in(settings: &FormSettings, options: RenderOptions) -> Markup {
        let mut form = Markup::with_options("form", options);
        if settings.file_upload {
            form.root_mut()
                .input()
                .type_("hidden")
                .name("MAX_FILE_SIZE")
                .value(settings.limits.max_size_bytes().to_string());
        }
        form
    }
}
