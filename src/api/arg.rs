use crate::model::{ArgAction, ValueHint, ValueRange};
use crate::value::ValueParser;

/// The static description of one option, flag, or positional slot.
///
/// An `Arg` is a pure builder: every setter consumes and returns `self`, and
/// the description becomes immutable once attached to a
/// [`Command`](crate::Command).
///
/// ### Example
/// ```
/// use clargs::{Arg, ArgAction, ValueParser};
///
/// let config = Arg::new("config")
///     .short('c')
///     .long("config")
///     .default_value("default.conf")
///     .help("The configuration file to load.");
///
/// let verbose = Arg::new("verbose")
///     .short('v')
///     .action(ArgAction::Count);
///
/// let jobs = Arg::new("jobs")
///     .long("jobs")
///     .value_parser(ValueParser::int_range(1, 64));
/// ```
#[derive(Debug, Clone)]
pub struct Arg {
    pub(crate) id: String,
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) index: Option<i32>,
    pub(crate) help: Option<String>,
    pub(crate) required: bool,
    pub(crate) global: bool,
    pub(crate) hidden: bool,
    pub(crate) default_value: Option<String>,
    pub(crate) default_missing_value: Option<String>,
    pub(crate) env_var: Option<String>,
    pub(crate) num_args: ValueRange,
    pub(crate) value_delimiter: Option<char>,
    pub(crate) value_names: Vec<String>,
    pub(crate) action: ArgAction,
    pub(crate) value_parser: ValueParser,
    pub(crate) value_hint: ValueHint,
    pub(crate) conflicts: Vec<String>,
    pub(crate) requires: Vec<String>,
    pub(crate) required_unless: Vec<String>,
    pub(crate) required_if: Vec<(String, String)>,
    pub(crate) groups: Vec<String>,
    pub(crate) allow_multiple: bool,
    pub(crate) hide_possible_values: bool,
    pub(crate) hide_default_value: bool,
}

impl Arg {
    /// Create an argument keyed by `id`.
    ///
    /// The id is the stable lookup key in
    /// [`ArgMatches`](crate::ArgMatches) and in cross-argument constraints;
    /// it must be unique within its command. A fresh argument takes exactly
    /// one value with [`ArgAction::Set`] and the identity string parser.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short: None,
            long: None,
            index: None,
            help: None,
            required: false,
            global: false,
            hidden: false,
            default_value: None,
            default_missing_value: None,
            env_var: None,
            num_args: ValueRange::ONE,
            value_delimiter: None,
            value_names: Vec::default(),
            action: ArgAction::Set,
            value_parser: ValueParser::Str,
            value_hint: ValueHint::Unknown,
            conflicts: Vec::default(),
            requires: Vec::default(),
            required_unless: Vec::default(),
            required_if: Vec::default(),
            groups: Vec::default(),
            allow_multiple: false,
            hide_possible_values: false,
            hide_default_value: false,
        }
    }

    /// The argument's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the short flag, as in `-c`.
    pub fn short(mut self, short: char) -> Self {
        self.short.replace(short);
        self
    }

    /// Set the long flag, as in `--config`.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long.replace(long.into());
        self
    }

    /// Set the positional slot explicitly. `-1` means auto-assign the next
    /// slot when the argument is attached to a command.
    pub fn index(mut self, index: i32) -> Self {
        self.index.replace(index);
        self
    }

    /// Document the help message for this argument.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Require this argument to be bound from some source.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Propagate this argument's binding into subcommand matches.
    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    /// Omit this argument from help output.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Bind this value when nothing else supplies one.
    ///
    /// Precedence is command line, then environment, then default.
    ///
    /// ### Example
    /// ```
    /// use clargs::{Arg, Command, ValueSource};
    ///
    /// let command = Command::new("tool")
    ///     .arg(Arg::new("config").long("config").default_value("default.conf"));
    ///
    /// let matches = command.get_matches(Vec::<String>::new()).unwrap();
    /// assert_eq!(matches.get_one("config").unwrap().to_string(), "default.conf");
    /// assert_eq!(matches.value_source("config"), Some(ValueSource::Default));
    /// ```
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value.replace(value.into());
        self
    }

    /// Bind this value when the option is named but given no value, as in
    /// `--color` standing for `--color=auto`.
    pub fn default_missing_value(mut self, value: impl Into<String>) -> Self {
        self.default_missing_value.replace(value.into());
        self
    }

    /// Fall back to this environment variable when the command line does not
    /// bind the argument. Read once during parser setup.
    pub fn env(mut self, variable: impl Into<String>) -> Self {
        self.env_var.replace(variable.into());
        self
    }

    /// Limit how many raw tokens may be bound per occurrence.
    pub fn num_args(mut self, range: ValueRange) -> Self {
        self.num_args = range;
        self
    }

    /// Split each bound token on `delimiter` before value parsing, so
    /// `--include a,b,c` produces three values.
    pub fn value_delimiter(mut self, delimiter: char) -> Self {
        self.value_delimiter.replace(delimiter);
        self
    }

    /// Set the display name used for this argument's value in help output.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_names = vec![name.into()];
        self
    }

    /// Set the display names used for this argument's values in help output.
    pub fn value_names(mut self, names: Vec<impl Into<String>>) -> Self {
        self.value_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set what binding does. Choosing a flag action forces the value
    /// contract to [`ValueRange::ZERO`].
    ///
    /// ### Example
    /// ```
    /// use clargs::{Arg, ArgAction, Command};
    ///
    /// let command = Command::new("tool")
    ///     .arg(Arg::new("verbose").short('v').action(ArgAction::Count));
    ///
    /// let matches = command.get_matches(["-vvv"]).unwrap();
    /// assert_eq!(matches.get_count("verbose"), 3);
    /// ```
    pub fn action(mut self, action: ArgAction) -> Self {
        if action.is_flag() {
            self.num_args = ValueRange::ZERO;
        }

        self.action = action;
        self
    }

    /// Set the value parser applied to each bound token.
    pub fn value_parser(mut self, parser: ValueParser) -> Self {
        self.value_parser = parser;
        self
    }

    /// Set the display-only hint for this argument's value.
    pub fn value_hint(mut self, hint: ValueHint) -> Self {
        self.value_hint = hint;
        self
    }

    /// Declare that this argument cannot appear together with `other`.
    pub fn conflicts_with(mut self, other: impl Into<String>) -> Self {
        self.conflicts.push(other.into());
        self
    }

    /// Declare that this argument needs `other` to also be present.
    pub fn requires(mut self, other: impl Into<String>) -> Self {
        self.requires.push(other.into());
        self
    }

    /// Require this argument unless `other` is present.
    pub fn required_unless(mut self, other: impl Into<String>) -> Self {
        self.required_unless.push(other.into());
        self
    }

    /// Require this argument whenever `other` was bound to exactly `value`.
    ///
    /// ### Example
    /// ```
    /// use clargs::{Arg, Command, ErrorKind};
    ///
    /// let command = Command::new("tool")
    ///     .arg(Arg::new("format").long("format"))
    ///     .arg(Arg::new("schema").long("schema").required_if("format", "json"));
    ///
    /// let error = command.get_matches(["--format", "json"]).unwrap_err();
    /// assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    /// ```
    pub fn required_if(mut self, other: impl Into<String>, value: impl Into<String>) -> Self {
        self.required_if.push((other.into(), value.into()));
        self
    }

    /// Place this argument into the named group.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Let a positional slot greedily collect every remaining positional
    /// token.
    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    /// Omit the possible-value listing from help output.
    pub fn hide_possible_values(mut self, hide: bool) -> Self {
        self.hide_possible_values = hide;
        self
    }

    /// Omit the default value from help output.
    pub fn hide_default_value(mut self, hide: bool) -> Self {
        self.hide_default_value = hide;
        self
    }

    /// Whether this argument is matched by position rather than by flag.
    pub fn is_positional(&self) -> bool {
        self.short.is_none() && self.long.is_none()
    }

    /// Whether this argument binds no values.
    pub fn is_flag(&self) -> bool {
        self.action.is_flag()
    }

    /// Whether this argument consumes value tokens.
    pub fn takes_value(&self) -> bool {
        !self.is_flag() && self.num_args.max() != Some(0)
    }

    /// The preferred display form: long flag, then short flag, then `<ID>`.
    pub fn display_name(&self) -> String {
        if let Some(long) = &self.long {
            format!("--{long}")
        } else if let Some(short) = self.short {
            format!("-{short}")
        } else {
            format!("<{}>", self.id.to_ascii_uppercase())
        }
    }

    /// Whether `name` names this argument by id or long flag.
    pub fn matches_name(&self, name: &str) -> bool {
        self.id == name || self.matches_long(name)
    }

    /// Whether `name` is this argument's long flag.
    pub fn matches_long(&self, name: &str) -> bool {
        self.long.as_deref() == Some(name)
    }

    /// Whether `flag` is this argument's short flag.
    pub fn matches_short(&self, flag: char) -> bool {
        self.short == Some(flag)
    }
}
