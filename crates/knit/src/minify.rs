//! Minification of the combined bundle text.
//!
//! The combined text is re-parsed as a script, optionally compressed and
//! mangled by `oxc_minifier`, then printed with minified codegen options.

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BundleError, Result};

/// Validated minification level.
///
/// Controls how aggressively the bundle is minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinifyLevel {
    /// No minification - output readable code.
    None,
    /// Remove whitespace and comments only.
    Whitespace,
    /// Syntax-level optimizations (property names preserved).
    Syntax,
    /// Full minification including identifier mangling.
    #[default]
    Identifiers,
}

impl MinifyLevel {
    /// Parse a minification level from a string.
    ///
    /// # Supported Values
    ///
    /// - `"none"` / `"false"` - No minification
    /// - `"whitespace"` - Remove whitespace only
    /// - `"syntax"` - Syntax-level minification
    /// - `"identifiers"` / `"true"` - Full minification with identifier mangling
    ///
    /// Values are case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use knit::MinifyLevel;
    ///
    /// assert_eq!(MinifyLevel::parse("none").unwrap(), MinifyLevel::None);
    /// assert_eq!(MinifyLevel::parse("IDENTIFIERS").unwrap(), MinifyLevel::Identifiers);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error for unrecognized values.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "false" => Ok(Self::None),
            "whitespace" => Ok(Self::Whitespace),
            "syntax" => Ok(Self::Syntax),
            "identifiers" | "true" => Ok(Self::Identifiers),
            _ => Err(BundleError::InvalidOptions(format!(
                "Invalid minify level: '{}'. Expected: none, whitespace, syntax, identifiers",
                s
            ))),
        }
    }

    /// Returns true if any minification is enabled.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    fn options(self) -> MinifierOptions {
        MinifierOptions {
            mangle: matches!(self, Self::Identifiers).then(MangleOptions::default),
            compress: matches!(self, Self::Syntax | Self::Identifiers)
                .then(CompressOptions::default),
        }
    }
}

impl std::fmt::Display for MinifyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Whitespace => write!(f, "whitespace"),
            Self::Syntax => write!(f, "syntax"),
            Self::Identifiers => write!(f, "identifiers"),
        }
    }
}

impl std::str::FromStr for MinifyLevel {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for MinifyLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts either a level name or a boolean.
impl<'de> Deserialize<'de> for MinifyLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(true) => Ok(Self::Identifiers),
            Repr::Flag(false) => Ok(Self::None),
            Repr::Name(name) => Self::parse(&name).map_err(serde::de::Error::custom),
        }
    }
}

/// Minify `code` at `level`. `MinifyLevel::None` returns it unchanged.
///
/// # Errors
///
/// Returns `BundleError::Minify` if the text does not parse as a script.
pub fn minify(code: &str, level: MinifyLevel) -> Result<String> {
    if !level.is_enabled() {
        return Ok(code.to_string());
    }

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, SourceType::cjs()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(BundleError::Minify(message));
    }

    let mut program = ret.program;
    let minified = Minifier::new(level.options()).minify(&allocator, &mut program);

    let output = Codegen::new()
        .with_options(CodegenOptions::minify())
        .with_scoping(minified.scoping)
        .build(&program);

    tracing::debug!(
        "minified bundle ({}): {} -> {} bytes",
        level,
        code.len(),
        output.code.len()
    );

    Ok(output.code)
}
