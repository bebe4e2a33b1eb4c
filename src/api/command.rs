use std::collections::HashSet;
use std::env;
use std::sync::Arc;

use crate::api::{Arg, ArgGroup};
use crate::constant::{
    HELP_ID, HELP_MESSAGE, HELP_SHORT, VERSION_ID, VERSION_MESSAGE, VERSION_SHORT,
};
use crate::error::Error;
use crate::matcher::ArgMatches;
use crate::model::{ArgAction, Setting};
use crate::parser::Parser;
use crate::validator;

/// The callback invoked by [`Command::dispatch`] for the selected command.
pub type ActionHandler = Arc<dyn Fn(&ArgMatches) + Send + Sync>;

/// A node in the command tree: its arguments, groups, subcommands, settings,
/// aliases, and an optional action handler.
///
/// A `Command` is immutable once construction finishes; parsing never
/// mutates it, so one tree may serve any number of threads, each with its
/// own argv.
///
/// ### Example
/// ```
/// use clargs::{Arg, ArgAction, Command};
///
/// let command = Command::new("archive")
///     .version("1.2.0")
///     .about("Packs and unpacks archives.")
///     .arg(Arg::new("verbose").short('v').action(ArgAction::Count).global(true))
///     .subcommand(
///         Command::new("pack")
///             .arg(Arg::new("input").required(true))
///             .arg(Arg::new("output").long("output").default_value("out.tar")),
///     );
///
/// let matches = command.get_matches(["-v", "pack", "data/"]).unwrap();
/// assert_eq!(matches.subcommand_name(), Some("pack"));
///
/// let pack = matches.subcommand_matches("pack").unwrap();
/// assert_eq!(pack.get_one("input").unwrap().to_string(), "data/");
/// ```
#[derive(Clone)]
pub struct Command {
    pub(crate) name: String,
    pub(crate) display_name: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) about: Option<String>,
    pub(crate) long_about: Option<String>,
    pub(crate) usage_override: Option<String>,
    pub(crate) before_help: Option<String>,
    pub(crate) after_help: Option<String>,
    pub(crate) args: Vec<Arg>,
    pub(crate) groups: Vec<ArgGroup>,
    pub(crate) subcommands: Vec<Command>,
    pub(crate) aliases: Vec<String>,
    pub(crate) hidden_aliases: Vec<String>,
    pub(crate) settings: HashSet<Setting>,
    pub(crate) path: Vec<String>,
    pub(crate) positional_counter: u32,
    pub(crate) action: Option<ActionHandler>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("args", &self.args.len())
            .field("subcommands", &self.subcommands.len())
            .finish()
    }
}

impl Command {
    /// Create a command named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            version: None,
            author: None,
            about: None,
            long_about: None,
            usage_override: None,
            before_help: None,
            after_help: None,
            args: Vec::default(),
            groups: Vec::default(),
            subcommands: Vec::default(),
            aliases: Vec::default(),
            hidden_aliases: Vec::default(),
            settings: HashSet::default(),
            path: Vec::default(),
            positional_counter: 0,
            action: None,
        }
    }

    /// The command's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Override the name used in help and usage output.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name.replace(name.into());
        self
    }

    /// Set the version string; this also enables the builtin `-V/--version`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version.replace(version.into());
        self
    }

    /// Document the author, shown in help output.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author.replace(author.into());
        self
    }

    /// Document the one-line about message.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Document the long about message, preferred over
    /// [`Command::about`] in help output when set.
    pub fn long_about(mut self, description: impl Into<String>) -> Self {
        self.long_about.replace(description.into());
        self
    }

    /// Replace the generated usage line.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage_override.replace(usage.into());
        self
    }

    /// Text printed above the help message.
    pub fn before_help(mut self, text: impl Into<String>) -> Self {
        self.before_help.replace(text.into());
        self
    }

    /// Text printed below the help message.
    pub fn after_help(mut self, text: impl Into<String>) -> Self {
        self.after_help.replace(text.into());
        self
    }

    /// Add an alias this command may be invoked by.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add an alias that works but never shows in help output.
    pub fn hidden_alias(mut self, alias: impl Into<String>) -> Self {
        self.hidden_aliases.push(alias.into());
        self
    }

    /// Enable a behavior toggle.
    pub fn setting(mut self, setting: Setting) -> Self {
        self.settings.insert(setting);
        self
    }

    /// Whether a behavior toggle is enabled.
    pub fn is_set(&self, setting: Setting) -> bool {
        self.settings.contains(&setting)
    }

    /// Attach an argument.
    ///
    /// Positional arguments with no explicit slot (or the `-1` sentinel) are
    /// assigned the next slot in attachment order. Duplicating an id, short
    /// flag, or long flag panics: the command line description is wrong, not
    /// the input.
    pub fn arg(mut self, mut arg: Arg) -> Self {
        assert!(
            !self.args.iter().any(|existing| existing.id == arg.id),
            "cannot duplicate the argument '{}'",
            arg.id
        );

        if let Some(short) = arg.short {
            assert!(
                !self.args.iter().any(|existing| existing.short == Some(short)),
                "cannot duplicate the short flag '-{short}'"
            );
        }

        if let Some(long) = &arg.long {
            assert!(
                !self.args.iter().any(|existing| existing.long.as_deref() == Some(long)),
                "cannot duplicate the long flag '--{long}'"
            );
        }

        if arg.is_positional() {
            match arg.index {
                None | Some(-1) => {
                    arg.index.replace(self.positional_counter as i32);
                    self.positional_counter += 1;
                }
                Some(index) => {
                    assert!(index >= 0, "invalid positional slot {index}");

                    if index as u32 >= self.positional_counter {
                        self.positional_counter = index as u32 + 1;
                    }
                }
            }
        }

        self.args.push(arg);
        self
    }

    /// Attach several arguments in order.
    pub fn args(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        for arg in args {
            self = self.arg(arg);
        }

        self
    }

    /// Attach an argument group.
    pub fn group(mut self, group: ArgGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Attach a subcommand.
    ///
    /// With [`Setting::PropagateVersion`] enabled, subcommands without their
    /// own version inherit this command's.
    pub fn subcommand(mut self, mut subcommand: Command) -> Self {
        if self.is_set(Setting::PropagateVersion) {
            subcommand.inherit_version(self.version.clone());
        }

        subcommand.refresh_path(&self.path, self.invocation_name());
        self.subcommands.push(subcommand);
        self
    }

    /// Attach several subcommands in order.
    pub fn subcommands(mut self, subcommands: impl IntoIterator<Item = Command>) -> Self {
        for subcommand in subcommands {
            self = self.subcommand(subcommand);
        }

        self
    }

    /// Set the handler invoked by [`Command::dispatch`] when this command is
    /// the selected one.
    pub fn action(mut self, handler: impl Fn(&ArgMatches) + Send + Sync + 'static) -> Self {
        self.action.replace(Arc::new(handler));
        self
    }

    fn inherit_version(&mut self, version: Option<String>) {
        if self.version.is_none() {
            self.version = version;
        }

        for subcommand in &mut self.subcommands {
            subcommand.inherit_version(self.version.clone());
        }
    }

    fn refresh_path(&mut self, parent_path: &[String], parent_name: &str) {
        self.path = parent_path.to_vec();
        self.path.push(parent_name.to_string());

        let own_path = self.path.clone();
        let own_name = self.invocation_name().to_string();

        for subcommand in &mut self.subcommands {
            subcommand.refresh_path(&own_path, &own_name);
        }
    }

    pub(crate) fn invocation_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// The space-joined chain of names from the root command to this one.
    pub fn full_name(&self) -> String {
        if self.path.is_empty() {
            self.invocation_name().to_string()
        } else {
            format!("{} {}", self.path.join(" "), self.invocation_name())
        }
    }

    /// Find an argument by id.
    pub fn find_arg(&self, id: &str) -> Option<&Arg> {
        self.args.iter().find(|arg| arg.id == id)
    }

    /// Find an argument by short flag.
    pub fn find_arg_by_short(&self, short: char) -> Option<&Arg> {
        self.args.iter().find(|arg| arg.matches_short(short))
    }

    /// Find an argument by long flag.
    pub fn find_arg_by_long(&self, long: &str) -> Option<&Arg> {
        self.args.iter().find(|arg| arg.matches_long(long))
    }

    /// Find a subcommand by name or any alias, hidden aliases included.
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|subcommand| {
            subcommand.name == name
                || subcommand.aliases.iter().any(|alias| alias == name)
                || subcommand.hidden_aliases.iter().any(|alias| alias == name)
        })
    }

    /// The positional arguments, sorted by slot.
    pub fn positional_args(&self) -> Vec<&Arg> {
        let mut positionals: Vec<&Arg> =
            self.args.iter().filter(|arg| arg.is_positional()).collect();
        positionals.sort_by_key(|arg| arg.index);
        positionals
    }

    /// The non-positional arguments, in declaration order.
    pub fn optional_args(&self) -> Vec<&Arg> {
        self.args.iter().filter(|arg| !arg.is_positional()).collect()
    }

    // The builtin help/version args, synthesized on demand so the command
    // stays immutable during parsing.
    pub(crate) fn builtin_args(&self) -> Vec<Arg> {
        let mut builtins = Vec::default();

        if !self.is_set(Setting::DisableHelpFlag) && self.find_arg(HELP_ID).is_none() {
            builtins.push(
                Arg::new(HELP_ID)
                    .short(HELP_SHORT)
                    .long(HELP_ID)
                    .help(HELP_MESSAGE)
                    .action(ArgAction::Help),
            );
        }

        if self.version.is_some()
            && !self.is_set(Setting::DisableVersionFlag)
            && self.find_arg(VERSION_ID).is_none()
        {
            builtins.push(
                Arg::new(VERSION_ID)
                    .short(VERSION_SHORT)
                    .long(VERSION_ID)
                    .help(VERSION_MESSAGE)
                    .action(ArgAction::Version),
            );
        }

        builtins
    }

    /// Parse `argv` against this command tree and validate the result.
    ///
    /// All failures, including help and version display, surface as
    /// [`Error`]; nothing is printed and the process never exits from here.
    pub fn get_matches<I, T>(&self, argv: I) -> Result<ArgMatches, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tokens: Vec<String> = argv.into_iter().map(Into::into).collect();
        let matches = Parser::new(self).parse(&tokens)?;
        validator::validate(self, &matches)?;
        Ok(matches)
    }

    /// Parse the process argv, dispatch the action handler, and exit on any
    /// failure (code `0` for help/version display, `1` otherwise).
    pub fn run(&self) -> ArgMatches {
        let argv: Vec<String> = env::args().skip(1).collect();

        match self.get_matches(argv) {
            Ok(matches) => {
                self.dispatch(&matches);
                matches
            }
            Err(error) => error.exit(),
        }
    }

    /// Invoke the action handler of the deepest selected command, if any.
    pub fn dispatch(&self, matches: &ArgMatches) {
        if let Some((name, subcommand_matches)) = matches.subcommand() {
            if let Some(subcommand) = self.find_subcommand(name) {
                subcommand.dispatch(subcommand_matches);
                return;
            }
        }

        if let Some(action) = &self.action {
            action(matches);
        }
    }
}
