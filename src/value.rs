use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

/// A value produced by a [`ValueParser`], tagged with its runtime type.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    /// An arbitrary string.
    Str(String),
    /// A signed decimal integer.
    Int(i64),
    /// An IEEE-754 double.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A filesystem path.
    Path(PathBuf),
}

impl ParsedValue {
    /// The string arm, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParsedValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The integer arm, if this value is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParsedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The float arm, if this value is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParsedValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The boolean arm, if this value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParsedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The path arm, if this value is one.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ParsedValue::Path(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Str(value) => write!(f, "{value}"),
            ParsedValue::Int(value) => write!(f, "{value}"),
            ParsedValue::Float(value) => write!(f, "{value}"),
            ParsedValue::Bool(value) => write!(f, "{value}"),
            ParsedValue::Path(value) => write!(f, "{}", value.display()),
        }
    }
}

/// A value-parse failure, reported without the owning argument id.
/// The parser driver re-wraps it with the id before surfacing.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value '{value}': expected {expected}")]
pub struct ValueError {
    pub(crate) value: String,
    pub(crate) expected: String,
}

impl ValueError {
    fn new(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// The verdict of a [`ValueParser::Custom`] callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomOutcome {
    /// Keep the raw token unchanged.
    Accept,
    /// Substitute the raw token with this value.
    Replace(String),
    /// Reject the raw token as invalid.
    Reject,
}

/// The callback type held by [`ValueParser::Custom`].
pub type CustomParseFn = Arc<dyn Fn(&str) -> CustomOutcome + Send + Sync>;

/// Transforms a raw command line token into a typed [`ParsedValue`].
///
/// ### Example
/// ```
/// use clargs::{ParsedValue, ValueParser};
///
/// assert_eq!(ValueParser::Int.parse("42"), Ok(ParsedValue::Int(42)));
/// assert!(ValueParser::Int.parse("forty-two").is_err());
///
/// let level = ValueParser::choice_ignore_case(["Debug", "Info", "Warn"]);
/// // Matching is case-insensitive, but the canonical spelling is returned.
/// assert_eq!(level.parse("INFO"), Ok(ParsedValue::Str("Info".to_string())));
/// ```
#[derive(Clone)]
pub enum ValueParser {
    /// Accept anything, unchanged.
    Str,
    /// A signed decimal integer.
    Int,
    /// An IEEE-754 double.
    Float,
    /// `true`/`yes`/`1`/`on` or `false`/`no`/`0`/`off`, case-insensitive.
    Bool,
    /// A filesystem path, optionally required to exist.
    Path {
        /// Reject tokens that do not name an existing filesystem entry.
        must_exist: bool,
    },
    /// A member of a fixed set, returned in its canonical spelling.
    Choice {
        /// The accepted spellings, in registration order.
        choices: Vec<String>,
        /// Match case-insensitively.
        ignore_case: bool,
    },
    /// A string matching a fixed pattern.
    Pattern(Regex),
    /// An integer within an inclusive interval.
    IntRange {
        /// The inclusive lower bound.
        min: i64,
        /// The inclusive upper bound.
        max: i64,
    },
    /// A `scheme://host[/path]` URL with an http, https, or ftp scheme.
    Url,
    /// A user-supplied callback.
    Custom(CustomParseFn),
}

impl ValueParser {
    /// Create a case-sensitive choice parser.
    pub fn choice(choices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ValueParser::Choice {
            choices: choices.into_iter().map(Into::into).collect(),
            ignore_case: false,
        }
    }

    /// Create a case-insensitive choice parser.
    pub fn choice_ignore_case(choices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ValueParser::Choice {
            choices: choices.into_iter().map(Into::into).collect(),
            ignore_case: true,
        }
    }

    /// Create a pattern parser from a regular expression.
    /// Panics on an invalid expression; the expression is part of the command
    /// line description, not runtime input.
    pub fn pattern(expression: &str) -> Self {
        match Regex::new(expression) {
            Ok(regex) => ValueParser::Pattern(regex),
            Err(error) => panic!("invalid pattern expression '{expression}': {error}"),
        }
    }

    /// Create an integer parser bounded to `[min, max]`.
    pub fn int_range(min: i64, max: i64) -> Self {
        assert!(min <= max, "invalid integer range [{min}, {max}]");
        ValueParser::IntRange { min, max }
    }

    /// Create a path parser.
    pub fn path(must_exist: bool) -> Self {
        ValueParser::Path { must_exist }
    }

    /// Create a custom parser from a callback.
    pub fn custom(callback: impl Fn(&str) -> CustomOutcome + Send + Sync + 'static) -> Self {
        ValueParser::Custom(Arc::new(callback))
    }

    /// Parse a raw token into a typed value.
    pub fn parse(&self, raw: &str) -> Result<ParsedValue, ValueError> {
        match self {
            ValueParser::Str => Ok(ParsedValue::Str(raw.to_string())),
            ValueParser::Int => raw
                .parse::<i64>()
                .map(ParsedValue::Int)
                .map_err(|_| ValueError::new(raw, "an integer")),
            ValueParser::Float => raw
                .parse::<f64>()
                .map(ParsedValue::Float)
                .map_err(|_| ValueError::new(raw, "a number")),
            ValueParser::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(ParsedValue::Bool(true)),
                "false" | "no" | "0" | "off" => Ok(ParsedValue::Bool(false)),
                _ => Err(ValueError::new(raw, "a boolean")),
            },
            ValueParser::Path { must_exist } => {
                if *must_exist && !Path::new(raw).exists() {
                    Err(ValueError::new(raw, "an existing path"))
                } else {
                    Ok(ParsedValue::Path(PathBuf::from(raw)))
                }
            }
            ValueParser::Choice {
                choices,
                ignore_case,
            } => {
                let canonical = choices.iter().find(|choice| {
                    if *ignore_case {
                        choice.eq_ignore_ascii_case(raw)
                    } else {
                        choice.as_str() == raw
                    }
                });

                match canonical {
                    Some(choice) => Ok(ParsedValue::Str(choice.clone())),
                    None => Err(ValueError::new(
                        raw,
                        format!("one of {{{}}}", choices.join(", ")),
                    )),
                }
            }
            ValueParser::Pattern(regex) => {
                if regex.is_match(raw) {
                    Ok(ParsedValue::Str(raw.to_string()))
                } else {
                    Err(ValueError::new(
                        raw,
                        format!("matching pattern {}", regex.as_str()),
                    ))
                }
            }
            ValueParser::IntRange { min, max } => {
                let expected = format!("an integer between {min} and {max}");

                match raw.parse::<i64>() {
                    Ok(n) if (*min..=*max).contains(&n) => Ok(ParsedValue::Int(n)),
                    _ => Err(ValueError::new(raw, expected)),
                }
            }
            ValueParser::Url => {
                if url_shaped(raw) {
                    Ok(ParsedValue::Str(raw.to_string()))
                } else {
                    Err(ValueError::new(raw, "an http, https, or ftp url"))
                }
            }
            ValueParser::Custom(callback) => match callback(raw) {
                CustomOutcome::Accept => Ok(ParsedValue::Str(raw.to_string())),
                CustomOutcome::Replace(value) => Ok(ParsedValue::Str(value)),
                CustomOutcome::Reject => Err(ValueError::new(raw, "a valid value")),
            },
        }
    }

    /// A short description of what this parser produces, used in help text.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueParser::Str => "string",
            ValueParser::Int => "integer",
            ValueParser::Float => "number",
            ValueParser::Bool => "boolean",
            ValueParser::Path { .. } => "path",
            ValueParser::Choice { .. } => "choice",
            ValueParser::Pattern(_) => "pattern",
            ValueParser::IntRange { .. } => "integer",
            ValueParser::Url => "url",
            ValueParser::Custom(_) => "custom",
        }
    }

    /// The closed set of accepted spellings, where one exists.
    pub fn possible_values(&self) -> Option<Vec<String>> {
        match self {
            ValueParser::Bool => Some(
                ["true", "yes", "1", "on", "false", "no", "0", "off"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ),
            ValueParser::Choice { choices, .. } => Some(choices.clone()),
            _ => None,
        }
    }
}

impl Default for ValueParser {
    fn default() -> Self {
        ValueParser::Str
    }
}

impl fmt::Debug for ValueParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueParser::Str => write!(f, "Str"),
            ValueParser::Int => write!(f, "Int"),
            ValueParser::Float => write!(f, "Float"),
            ValueParser::Bool => write!(f, "Bool"),
            ValueParser::Path { must_exist } => write!(f, "Path {{ must_exist: {must_exist} }}"),
            ValueParser::Choice {
                choices,
                ignore_case,
            } => write!(f, "Choice {{ {choices:?}, ignore_case: {ignore_case} }}"),
            ValueParser::Pattern(regex) => write!(f, "Pattern({})", regex.as_str()),
            ValueParser::IntRange { min, max } => write!(f, "IntRange [{min}, {max}]"),
            ValueParser::Url => write!(f, "Url"),
            ValueParser::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

fn url_shaped(raw: &str) -> bool {
    let Some((scheme, rest)) = raw.split_once("://") else {
        return false;
    };

    if !matches!(scheme, "http" | "https" | "ftp") {
        return false;
    }

    let host = rest.split('/').next().unwrap_or("");
    !host.is_empty()
}
