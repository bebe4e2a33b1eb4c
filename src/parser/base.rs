use std::collections::HashMap;
use std::env;

use crate::api::{Arg, Command};
use crate::error::Error;
use crate::matcher::{ArgMatches, MatchedValue};
use crate::model::{ArgAction, Setting, ValueSource};
use crate::parser::{printer, suggest};
use crate::value::ParsedValue;

#[cfg(feature = "debug")]
use tracing::debug;

// The option currently accumulating values. Holds a clone of the owning arg:
// the current arg may be a parser-synthesized builtin, which the command
// itself cannot name.
struct Pending {
    arg: Arg,
    values: Vec<String>,
}

/// The tokenizer state machine, scoped to a single command.
///
/// Walks an argv left to right, classifying each token as long option, short
/// option cluster, option value, positional, subcommand, or trailing, and
/// builds up an [`ArgMatches`]. Subcommand tokens recurse into a fresh
/// parser seeded with the global bindings gathered so far.
pub(crate) struct Parser<'c> {
    command: &'c Command,
    builtins: Vec<Arg>,
    matches: ArgMatches,
    positional_index: usize,
    trailing_mode: bool,
    pending: Option<Pending>,
    inherited_values: HashMap<String, Vec<MatchedValue>>,
    inherited_flags: HashMap<String, u32>,
}

impl<'c> Parser<'c> {
    pub(crate) fn new(command: &'c Command) -> Self {
        Self {
            command,
            builtins: command.builtin_args(),
            matches: ArgMatches::default(),
            positional_index: 0,
            trailing_mode: false,
            pending: None,
            inherited_values: HashMap::default(),
            inherited_flags: HashMap::default(),
        }
    }

    fn seed(
        &mut self,
        values: HashMap<String, Vec<MatchedValue>>,
        flags: HashMap<String, u32>,
    ) {
        self.inherited_values = values;
        self.inherited_flags = flags;
    }

    pub(crate) fn parse(mut self, tokens: &[String]) -> Result<ArgMatches, Error> {
        self.setup()?;

        let mut index = 0;

        while index < tokens.len() {
            let token = tokens[index].as_str();
            index += 1;

            if self.trailing_mode {
                self.matches.add_trailing(token.to_string());
                continue;
            }

            if token == "--" {
                self.flush()?;
                self.trailing_mode = true;
                continue;
            }

            if let Some(body) = token.strip_prefix("--") {
                self.flush()?;
                self.long_option(body)?;
                continue;
            }

            if token.len() > 1 && token.starts_with('-') && !self.negative_number(token) {
                self.flush()?;
                self.short_cluster(token)?;
                continue;
            }

            if self.pending.is_some() {
                self.accumulate(token)?;
                continue;
            }

            if let Some(subcommand) = self.matched_subcommand(token) {
                #[cfg(feature = "debug")]
                debug!("descending into subcommand '{}'", subcommand.name);

                let (values, flags) = self.global_bindings();
                let mut sub_parser = Parser::new(subcommand);
                sub_parser.seed(values, flags);

                let sub_matches = sub_parser.parse(&tokens[index..])?;
                self.matches
                    .set_subcommand(subcommand.name.clone(), sub_matches);
                break;
            }

            self.positional(token)?;
        }

        self.flush()?;
        Ok(self.matches)
    }

    // Seed inherited globals, then defaults, then environment fallbacks.
    // Precedence for the upcoming token walk is command line over env over
    // default, because binding a command line value replaces these seeds.
    fn setup(&mut self) -> Result<(), Error> {
        for (id, values) in std::mem::take(&mut self.inherited_values) {
            for matched in &values {
                self.matches.append_matched(&id, matched.clone());
            }
            self.inherited_values.insert(id, values);
        }

        for (id, count) in std::mem::take(&mut self.inherited_flags) {
            for _ in 0..count {
                self.matches.increment_flag(&id);
            }
            self.inherited_flags.insert(id, count);
        }

        for arg in &self.command.args {
            if !arg.takes_value() {
                continue;
            }

            if let Some(default) = &arg.default_value {
                if !self.matches.contains(&arg.id) {
                    let values = match convert(arg, std::slice::from_ref(default)) {
                        Ok(values) => values,
                        Err(error) => {
                            panic!("invalid default value for argument '{}': {error}", arg.id)
                        }
                    };
                    self.matches
                        .set_values(&arg.id, values, ValueSource::Default);
                }
            }
        }

        for arg in &self.command.args {
            if !arg.takes_value() {
                continue;
            }

            let Some(variable) = &arg.env_var else {
                continue;
            };

            if self.matches.value_source(&arg.id) == Some(ValueSource::CommandLine) {
                continue;
            }

            if let Ok(raw) = env::var(variable) {
                if !raw.is_empty() {
                    let values = convert(arg, &[raw])?;
                    self.matches.set_values(&arg.id, values, ValueSource::Env);
                }
            }
        }

        Ok(())
    }

    fn long_option(&mut self, body: &str) -> Result<(), Error> {
        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let arg = self.lookup_long(name)?;

        #[cfg(feature = "debug")]
        debug!("matched '--{name}' to argument '{}'", arg.id);

        if arg.is_flag() {
            // An attached value on a flag action is silently discarded.
            return self.perform_flag(&arg);
        }

        match attached {
            Some(value) => self.bind(&arg, &[value.to_string()]),
            None => {
                self.pending.replace(Pending {
                    arg,
                    values: Vec::default(),
                });
                Ok(())
            }
        }
    }

    fn short_cluster(&mut self, token: &str) -> Result<(), Error> {
        let cluster: Vec<char> = token.chars().skip(1).collect();
        let mut position = 0;

        while position < cluster.len() {
            let flag = cluster[position];
            let arg = self.lookup_short(flag)?;

            if arg.is_flag() {
                self.perform_flag(&arg)?;
                position += 1;
                continue;
            }

            // Only the final option of a cluster may take values: anything
            // left in the cluster is this option's attached value.
            let remainder: String = cluster[position + 1..].iter().collect();

            if remainder.is_empty() {
                self.pending.replace(Pending {
                    arg,
                    values: Vec::default(),
                });
            } else {
                let value = remainder.strip_prefix('=').unwrap_or(remainder.as_str());
                self.bind(&arg, &[value.to_string()])?;
            }

            break;
        }

        Ok(())
    }

    fn perform_flag(&mut self, arg: &Arg) -> Result<(), Error> {
        match arg.action {
            ArgAction::SetTrue => self.matches.set_flag(&arg.id, true),
            ArgAction::SetFalse => self.matches.set_flag(&arg.id, false),
            ArgAction::Count => self.matches.increment_flag(&arg.id),
            ArgAction::Help => {
                return Err(Error::DisplayHelp(printer::render_help(
                    self.command,
                    &self.builtins,
                )));
            }
            ArgAction::Version => {
                return Err(Error::DisplayVersion(printer::render_version(self.command)));
            }
            ArgAction::Set | ArgAction::Append => {
                unreachable!("internal error - '{}' is not a flag action", arg.id)
            }
        }

        Ok(())
    }

    fn accumulate(&mut self, token: &str) -> Result<(), Error> {
        let pending = self
            .pending
            .as_mut()
            .expect("internal error - accumulating without a pending option");
        pending.values.push(token.to_string());

        if let Some(max) = pending.arg.num_args.max() {
            if pending.values.len() as u32 >= max {
                return self.flush();
            }
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        let Some(Pending { arg, values }) = self.pending.take() else {
            return Ok(());
        };

        if values.is_empty() {
            if let Some(missing) = &arg.default_missing_value {
                return self.bind(&arg, std::slice::from_ref(missing));
            }

            if arg.num_args.min() > 0 {
                return Err(Error::TooFewValues {
                    id: arg.id.clone(),
                    minimum: arg.num_args.min(),
                    actual: 0,
                });
            }

            return Ok(());
        }

        self.bind(&arg, &values)
    }

    fn bind(&mut self, arg: &Arg, tokens: &[String]) -> Result<(), Error> {
        let values = convert(arg, tokens)?;

        match arg.action {
            ArgAction::Set => {
                // Each value replaces the previous one: last writer wins.
                for value in values {
                    self.matches
                        .set_value(&arg.id, value, ValueSource::CommandLine);
                }
            }
            ArgAction::Append => {
                for value in values {
                    self.matches
                        .append_value(&arg.id, value, ValueSource::CommandLine);
                }
            }
            _ => unreachable!("internal error - flag action '{}' cannot bind values", arg.id),
        }

        Ok(())
    }

    fn positional(&mut self, token: &str) -> Result<(), Error> {
        let slot = self
            .command
            .positional_args()
            .get(self.positional_index)
            .map(|arg| (*arg).clone());

        match slot {
            Some(arg) => {
                self.bind(&arg, &[token.to_string()])?;

                // Greedy slots keep collecting; everything else advances.
                if arg.action != ArgAction::Append && !arg.allow_multiple {
                    self.positional_index += 1;
                }

                Ok(())
            }
            None => {
                if self.command.subcommands.is_empty() {
                    Err(Error::UnknownArgument {
                        token: token.to_string(),
                        suggestions: Vec::default(),
                    })
                } else {
                    let candidates = self.command.subcommands.iter().flat_map(|subcommand| {
                        std::iter::once(subcommand.name.as_str())
                            .chain(subcommand.aliases.iter().map(String::as_str))
                    });

                    Err(Error::InvalidSubcommand {
                        name: token.to_string(),
                        suggestions: suggest::suggestions(token, candidates),
                    })
                }
            }
        }
    }

    fn matched_subcommand(&self, token: &str) -> Option<&'c Command> {
        let command: &'c Command = self.command;

        if let Some(subcommand) = command.find_subcommand(token) {
            return Some(subcommand);
        }

        if command.is_set(Setting::InferSubcommands) {
            let hits: Vec<&'c Command> = command
                .subcommands
                .iter()
                .filter(|subcommand| {
                    subcommand.name.starts_with(token)
                        || subcommand
                            .aliases
                            .iter()
                            .chain(subcommand.hidden_aliases.iter())
                            .any(|alias| alias.starts_with(token))
                })
                .collect();

            if let [hit] = hits[..] {
                return Some(hit);
            }
        }

        None
    }

    // Bindings handed down to a subcommand parser: this command's global
    // args, plus anything this parser itself inherited from above.
    fn global_bindings(&self) -> (HashMap<String, Vec<MatchedValue>>, HashMap<String, u32>) {
        let mut ids: Vec<&str> = self
            .command
            .args
            .iter()
            .filter(|arg| arg.global)
            .map(|arg| arg.id.as_str())
            .collect();

        for id in self.inherited_values.keys().chain(self.inherited_flags.keys()) {
            if !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }

        let mut values = HashMap::default();
        let mut flags = HashMap::default();

        for id in ids {
            if let Some(raw) = self.matches.get_raw(id) {
                values.insert(
                    id.to_string(),
                    raw.iter()
                        .map(|matched| {
                            MatchedValue::new(matched.value().clone(), ValueSource::Default)
                        })
                        .collect(),
                );
            }

            let count = self.matches.get_count(id);

            if count > 0 {
                flags.insert(id.to_string(), count);
            }
        }

        (values, flags)
    }

    fn arg_iter(&self) -> impl Iterator<Item = &Arg> {
        self.command.args.iter().chain(self.builtins.iter())
    }

    fn lookup_long(&self, name: &str) -> Result<Arg, Error> {
        if let Some(arg) = self.arg_iter().find(|arg| arg.matches_long(name)) {
            return Ok(arg.clone());
        }

        if self.command.is_set(Setting::InferLongArgs) {
            let hits: Vec<&Arg> = self
                .arg_iter()
                .filter(|arg| {
                    arg.long
                        .as_deref()
                        .is_some_and(|long| long.starts_with(name))
                })
                .collect();

            if let [hit] = hits[..] {
                return Ok(hit.clone());
            }
        }

        let candidates = self.arg_iter().filter_map(|arg| arg.long.as_deref());
        let suggestions = suggest::suggestions(name, candidates)
            .into_iter()
            .map(|suggestion| format!("--{suggestion}"))
            .collect();

        Err(Error::UnknownArgument {
            token: format!("--{name}"),
            suggestions,
        })
    }

    fn lookup_short(&self, flag: char) -> Result<Arg, Error> {
        if let Some(arg) = self.arg_iter().find(|arg| arg.matches_short(flag)) {
            return Ok(arg.clone());
        }

        let probe = flag.to_string();
        let candidates = self.arg_iter().filter_map(|arg| arg.long.as_deref());
        let suggestions = suggest::suggestions(&probe, candidates)
            .into_iter()
            .map(|suggestion| format!("--{suggestion}"))
            .collect();

        Err(Error::UnknownArgument {
            token: format!("-{flag}"),
            suggestions,
        })
    }

    fn negative_number(&self, token: &str) -> bool {
        self.command.is_set(Setting::AllowNegativeNumbers) && token.parse::<f64>().is_ok()
    }
}

// Split on the delimiter first, then parse each piece, so delimiters compose
// with non-string parsers. Parse failures are re-wrapped with the owning id.
pub(crate) fn convert(arg: &Arg, tokens: &[String]) -> Result<Vec<ParsedValue>, Error> {
    let mut pieces: Vec<String> = Vec::default();

    for token in tokens {
        match arg.value_delimiter {
            Some(delimiter) => pieces.extend(token.split(delimiter).map(String::from)),
            None => pieces.push(token.clone()),
        }
    }

    let mut values = Vec::with_capacity(pieces.len());

    for piece in &pieces {
        let value = arg
            .value_parser
            .parse(piece)
            .map_err(|error| Error::InvalidValue {
                id: arg.id.clone(),
                value: error.value,
                expected: error.expected,
            })?;
        values.push(value);
    }

    Ok(values)
}
