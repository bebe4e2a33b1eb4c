use thiserror::Error;

/// Programmatic discriminant for an [`Error`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A token failed value parsing.
    InvalidValue,
    /// A required argument was absent.
    MissingRequiredArgument,
    /// An argument bound more values than its contract allows.
    TooManyValues,
    /// An argument bound fewer values than its contract requires.
    TooFewValues,
    /// A token looked like an option but matched nothing.
    UnknownArgument,
    /// Two mutually exclusive arguments were both present.
    ArgumentConflict,
    /// A present argument's dependency was absent.
    MissingDependency,
    /// A token in subcommand position matched no subcommand.
    InvalidSubcommand,
    /// A subcommand was required but none was selected.
    MissingSubcommand,
    /// A required group had no present member.
    MissingRequiredGroup,
    /// The help flag was encountered; the payload is the help text.
    DisplayHelp,
    /// The version flag was encountered; the payload is the version line.
    DisplayVersion,
}

/// A parse or validation failure.
///
/// Errors unwind out of [`Command::get_matches`](crate::Command::get_matches)
/// without printing or exiting; the message texts below are stable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A token failed value parsing for the named argument.
    #[error("invalid value '{value}' for argument '{id}': expected {expected}")]
    InvalidValue {
        /// The owning argument id.
        id: String,
        /// The offending raw token.
        value: String,
        /// A description of what was expected.
        expected: String,
    },

    /// A required argument was absent from the command line, the environment,
    /// and the defaults.
    #[error("required argument '{id}' was not provided{}", context_suffix(.context))]
    MissingRequiredArgument {
        /// The absent argument id.
        id: String,
        /// Extra detail for conditional requirements.
        context: Option<String>,
    },

    /// An argument bound fewer values than its contract requires.
    #[error("argument '{id}' received {actual} values but requires at least {minimum}")]
    TooFewValues {
        /// The argument id.
        id: String,
        /// The contract's lower bound.
        minimum: u32,
        /// How many values were bound.
        actual: usize,
    },

    /// An argument bound more values than its contract allows.
    #[error("argument '{id}' received {actual} values but only accepts {maximum}")]
    TooManyValues {
        /// The argument id.
        id: String,
        /// The contract's upper bound.
        maximum: u32,
        /// How many values were bound.
        actual: usize,
    },

    /// A token looked like an option but matched nothing.
    #[error("unknown argument '{token}'{}", did_you_mean(.suggestions))]
    UnknownArgument {
        /// The raw offending token.
        token: String,
        /// Near-miss names, closest first.
        suggestions: Vec<String>,
    },

    /// Two mutually exclusive arguments were both present.
    #[error("argument '{left}' cannot be used with '{right}'")]
    ArgumentConflict {
        /// The argument declaring (or first hitting) the conflict.
        left: String,
        /// The argument it collided with.
        right: String,
    },

    /// A present argument's dependency was absent.
    #[error("argument '{id}' requires '{required}'")]
    MissingDependency {
        /// The present argument.
        id: String,
        /// The absent dependency.
        required: String,
    },

    /// A token in subcommand position matched no subcommand.
    #[error("unknown subcommand '{name}'{}", did_you_mean(.suggestions))]
    InvalidSubcommand {
        /// The raw offending token.
        name: String,
        /// Near-miss subcommand names, closest first.
        suggestions: Vec<String>,
    },

    /// A subcommand was required but none was selected.
    #[error("a subcommand is required but none was provided")]
    MissingSubcommand,

    /// A required group had no present member.
    #[error("one of the arguments in group '{group}' is required")]
    MissingRequiredGroup {
        /// The group id.
        group: String,
    },

    /// The help flag was encountered; carries the rendered help text.
    #[error("{0}")]
    DisplayHelp(String),

    /// The version flag was encountered; carries the rendered version line.
    #[error("{0}")]
    DisplayVersion(String),
}

impl Error {
    /// The programmatic discriminant for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidValue { .. } => ErrorKind::InvalidValue,
            Error::MissingRequiredArgument { .. } => ErrorKind::MissingRequiredArgument,
            Error::TooFewValues { .. } => ErrorKind::TooFewValues,
            Error::TooManyValues { .. } => ErrorKind::TooManyValues,
            Error::UnknownArgument { .. } => ErrorKind::UnknownArgument,
            Error::ArgumentConflict { .. } => ErrorKind::ArgumentConflict,
            Error::MissingDependency { .. } => ErrorKind::MissingDependency,
            Error::InvalidSubcommand { .. } => ErrorKind::InvalidSubcommand,
            Error::MissingSubcommand => ErrorKind::MissingSubcommand,
            Error::MissingRequiredGroup { .. } => ErrorKind::MissingRequiredGroup,
            Error::DisplayHelp(_) => ErrorKind::DisplayHelp,
            Error::DisplayVersion(_) => ErrorKind::DisplayVersion,
        }
    }

    /// The process exit code for this error: `0` for help/version display,
    /// `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::DisplayHelp(_) | Error::DisplayVersion(_) => 0,
            _ => 1,
        }
    }

    /// Whether this error belongs on stderr. Help and version output goes to
    /// stdout.
    pub fn use_stderr(&self) -> bool {
        self.exit_code() != 0
    }

    /// Print this error to the appropriate stream.
    pub fn print(&self) {
        if self.use_stderr() {
            eprintln!("{self}");
        } else {
            println!("{self}");
        }
    }

    /// Print this error and exit the process with [`Error::exit_code`].
    pub fn exit(&self) -> ! {
        self.print();
        std::process::exit(self.exit_code());
    }
}

fn context_suffix(context: &Option<String>) -> &str {
    context.as_deref().unwrap_or("")
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::default()
    } else {
        format!("\n\n\tDid you mean: {}?", suggestions.join(", "))
    }
}
