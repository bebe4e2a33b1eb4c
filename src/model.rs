use rand::{distributions::Standard, prelude::Distribution, Rng};

/// The number of values an argument may bind, as an inclusive interval.
///
/// A `None` upper bound means the argument accepts arbitrarily many values.
/// A `[0, 0]` range marks a flag: the argument binds no values at all.
///
/// ### Example
/// ```
/// use clargs::ValueRange;
///
/// let range = ValueRange::new(1, Some(3));
/// assert!(range.includes(2));
/// assert!(!range.includes(4));
/// assert!(ValueRange::ANY.includes(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRange {
    min: u32,
    max: Option<u32>,
}

impl ValueRange {
    /// No values at all; the flag contract.
    pub const ZERO: ValueRange = ValueRange {
        min: 0,
        max: Some(0),
    };

    /// Precisely one value.
    pub const ONE: ValueRange = ValueRange {
        min: 1,
        max: Some(1),
    };

    /// Zero or one value.
    pub const OPTIONAL: ValueRange = ValueRange {
        min: 0,
        max: Some(1),
    };

    /// Any number of values, including none.
    pub const ANY: ValueRange = ValueRange { min: 0, max: None };

    /// Create a range from an inclusive lower bound and an optional inclusive
    /// upper bound (`None` meaning unbounded).
    pub fn new(min: u32, max: Option<u32>) -> Self {
        if let Some(max) = max {
            assert!(min <= max, "invalid value range [{min}, {max}]");
        }

        Self { min, max }
    }

    /// Create a range accepting precisely `n` values.
    pub fn exactly(n: u32) -> Self {
        Self::new(n, Some(n))
    }

    /// Create a range accepting `n` or more values.
    pub fn at_least(n: u32) -> Self {
        Self::new(n, None)
    }

    /// The inclusive lower bound.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// The inclusive upper bound, or `None` when unbounded.
    pub fn max(&self) -> Option<u32> {
        self.max
    }

    /// Whether `n` values satisfy this range.
    pub fn includes(&self, n: u32) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }

    /// Whether this range accepts precisely one value.
    pub fn is_one(&self) -> bool {
        self.min == 1 && self.max == Some(1)
    }

    /// Whether this range accepts zero or one value.
    pub fn is_optional(&self) -> bool {
        self.min == 0 && self.max == Some(1)
    }

    /// Whether this range can bind more than one value.
    pub fn is_multiple(&self) -> bool {
        self.max.map_or(true, |max| max > 1)
    }

    /// Whether at least one value must be bound.
    pub fn is_required(&self) -> bool {
        self.min > 0
    }

    /// Whether the upper bound is unbounded.
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}, {}]", self.min, max),
            None => write!(f, "[{}, ∞)", self.min),
        }
    }
}

impl Distribution<ValueRange> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ValueRange {
        match rng.gen_range(0..2) {
            0 => {
                let max: u32 = rng.gen_range(0..16);
                ValueRange::new(rng.gen_range(0..=max), Some(max))
            }
            1 => ValueRange::at_least(rng.gen_range(0..16)),
            _ => unreachable!("internal error - impossible gen_range()"),
        }
    }
}

/// What binding a value (or merely encountering a flag) does to the matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgAction {
    /// Replace any previously stored value.
    Set,
    /// Accumulate values across occurrences.
    Append,
    /// Toggle the flag on.
    SetTrue,
    /// Toggle the flag off (the argument still registers as present).
    SetFalse,
    /// Count occurrences, as in `-vvv`.
    Count,
    /// Display the help message.
    Help,
    /// Display the version.
    Version,
}

impl ArgAction {
    /// Whether this action binds no values.
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            ArgAction::SetTrue
                | ArgAction::SetFalse
                | ArgAction::Count
                | ArgAction::Help
                | ArgAction::Version
        )
    }
}

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// The argument's declared default (or an inherited global binding).
    Default,
    /// The argument's environment variable.
    Env,
    /// A token on the command line.
    CommandLine,
}

/// A display-only hint about the kind of value an argument expects.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ValueHint {
    /// No particular expectation.
    #[default]
    Unknown,
    /// Any filesystem path.
    AnyPath,
    /// A path to a file.
    FilePath,
    /// A path to a directory.
    DirPath,
    /// A path to an executable.
    ExecutablePath,
    /// The name of a command.
    CommandName,
    /// A URL.
    Url,
    /// A username.
    Username,
    /// A hostname.
    Hostname,
    /// An email address.
    EmailAddress,
}

/// Behavior toggles recognized on a [`Command`](crate::Command).
///
/// Settings without parse-time semantics are carried for the help renderer
/// and future display layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// Subcommands without their own version inherit the parent's.
    PropagateVersion,
    /// Fail unless a subcommand is selected.
    SubcommandRequired,
    /// Accept subcommand names that were never declared.
    AllowExternalSubcommands,
    /// Prefer a subcommand over a positional when both could match.
    SubcommandPrecedenceOverArg,
    /// Omit the author line from help output.
    HideAuthor,
    /// Display help instead of failing when nothing was matched.
    ArgRequiredElseHelp,
    /// Do not synthesize the builtin `-h/--help` flag.
    DisableHelpFlag,
    /// Do not synthesize the builtin `-V/--version` flag.
    DisableVersionFlag,
    /// Render help without color.
    DisableColoredHelp,
    /// Order help entries by declaration.
    DeriveDisplayOrder,
    /// Accept values that begin with a hyphen.
    AllowHyphenValues,
    /// Treat tokens like `-3` or `-1.5` as values rather than options.
    AllowNegativeNumbers,
    /// Continue past recoverable parse errors.
    IgnoreErrors,
    /// Inline subcommand help into the parent's.
    FlattenHelp,
    /// Place help text on the line after each entry.
    NextLineHelp,
    /// Omit possible-value listings from help output.
    HidePossibleValues,
    /// Keep each argument spelled out in the usage line.
    DontCollapseArgsInUsage,
    /// Match long options by unique prefix.
    InferLongArgs,
    /// Match subcommands by unique prefix.
    InferSubcommands,
}
