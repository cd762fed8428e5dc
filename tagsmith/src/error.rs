use facet::Facet;

/// Errors from the fallible edges of the builder: option parsing and
/// calling shortcuts by name.
///
/// Building and rendering a tree never fails; these only come up when input
/// arrives as strings (configuration files, template directives).
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum MarkupError {
    /// unknown output convention {name}
    UnknownConvention { name: String },

    /// invalid render options: {message}
    InvalidOptions { message: String },

    /// unknown tag {name}
    UnknownTag { name: String },

    /// unknown shortcut or tag {name}
    UnknownShortcut { name: String },

    /// {name} expects at least {expected} argument(s), got {got}
    MissingArgument {
        name: String,
        expected: usize,
        got: usize,
    },

    /// {name} expects a number, got {value}
    NotANumber { name: String, value: String },
}
