use std::collections::{HashMap, HashSet};

use crate::model::ValueSource;
use crate::value::ParsedValue;

/// A bound value together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedValue {
    value: ParsedValue,
    source: ValueSource,
}

impl MatchedValue {
    pub(crate) fn new(value: ParsedValue, source: ValueSource) -> Self {
        Self { value, source }
    }

    /// The bound value.
    pub fn value(&self) -> &ParsedValue {
        &self.value
    }

    /// Where the value came from.
    pub fn source(&self) -> ValueSource {
        self.source
    }
}

/// The result of a successful parse: values, flag counts, presence, the
/// selected subcommand, and any tokens following `--`.
///
/// Populated by the parser; frozen once
/// [`Command::get_matches`](crate::Command::get_matches) returns.
///
/// ### Example
/// ```
/// use clargs::{Arg, ArgAction, Command};
///
/// let command = Command::new("tool")
///     .arg(Arg::new("input").long("input"))
///     .arg(Arg::new("verbose").short('v').action(ArgAction::Count));
///
/// let matches = command.get_matches(["--input", "a.txt", "-vv"]).unwrap();
/// assert_eq!(matches.get_one("input").unwrap().to_string(), "a.txt");
/// assert_eq!(matches.get_count("verbose"), 2);
/// assert!(matches.contains("input"));
/// assert!(!matches.contains("quiet"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgMatches {
    values: HashMap<String, Vec<MatchedValue>>,
    flags: HashMap<String, u32>,
    present: HashSet<String>,
    subcommand: Option<Box<(String, ArgMatches)>>,
    trailing: Vec<String>,
}

impl ArgMatches {
    /// The last value bound to `id`, if any.
    pub fn get_one(&self, id: &str) -> Option<&ParsedValue> {
        self.values
            .get(id)
            .and_then(|values| values.last())
            .map(MatchedValue::value)
    }

    /// The last value bound to `id`, or `default` when absent.
    pub fn get_one_or<'a>(&'a self, id: &str, default: &'a ParsedValue) -> &'a ParsedValue {
        self.get_one(id).unwrap_or(default)
    }

    /// All values bound to `id`, in insertion order.
    pub fn get_many(&self, id: &str) -> Option<Vec<&ParsedValue>> {
        self.values
            .get(id)
            .map(|values| values.iter().map(MatchedValue::value).collect())
    }

    /// The occurrence count for a counting or toggling flag.
    pub fn get_count(&self, id: &str) -> u32 {
        self.flags.get(id).copied().unwrap_or(0)
    }

    /// Whether the flag `id` was toggled on (count above zero).
    pub fn flag(&self, id: &str) -> bool {
        self.get_count(id) > 0
    }

    /// Whether `id` was bound at all - a value from any source, a flag count,
    /// or a toggle to off.
    pub fn contains(&self, id: &str) -> bool {
        self.present.contains(id)
    }

    /// Where the binding for `id` came from, if it exists.
    pub fn value_source(&self, id: &str) -> Option<ValueSource> {
        if let Some(values) = self.values.get(id) {
            return values.last().map(MatchedValue::source);
        }

        // Flags carry no per-value provenance; a present flag is command line.
        self.flags.get(id).map(|_| ValueSource::CommandLine)
    }

    /// The selected subcommand and its matches, if one was selected.
    pub fn subcommand(&self) -> Option<(&str, &ArgMatches)> {
        self.subcommand
            .as_deref()
            .map(|(name, matches)| (name.as_str(), matches))
    }

    /// The selected subcommand's name, if one was selected.
    pub fn subcommand_name(&self) -> Option<&str> {
        self.subcommand.as_deref().map(|(name, _)| name.as_str())
    }

    /// The selected subcommand's matches, if its name is `name`.
    pub fn subcommand_matches(&self, name: &str) -> Option<&ArgMatches> {
        match self.subcommand.as_deref() {
            Some((selected, matches)) if selected == name => Some(matches),
            _ => None,
        }
    }

    /// The raw source-tagged values bound to `id`.
    pub fn get_raw(&self, id: &str) -> Option<&[MatchedValue]> {
        self.values.get(id).map(Vec::as_slice)
    }

    /// Every id with a binding, sorted for determinism.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.present.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Whether nothing at all was bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
            && self.flags.is_empty()
            && self.subcommand.is_none()
            && self.trailing.is_empty()
    }

    /// The tokens following a `--` separator, verbatim and in order.
    pub fn trailing(&self) -> &[String] {
        &self.trailing
    }

    pub(crate) fn mark_present(&mut self, id: &str) {
        self.present.insert(id.to_string());
    }

    pub(crate) fn set_value(&mut self, id: &str, value: ParsedValue, source: ValueSource) {
        self.set_values(id, vec![value], source);
    }

    pub(crate) fn set_values(&mut self, id: &str, values: Vec<ParsedValue>, source: ValueSource) {
        self.mark_present(id);
        self.values.insert(
            id.to_string(),
            values
                .into_iter()
                .map(|value| MatchedValue::new(value, source))
                .collect(),
        );
    }

    pub(crate) fn append_value(&mut self, id: &str, value: ParsedValue, source: ValueSource) {
        self.append_matched(id, MatchedValue::new(value, source));
    }

    pub(crate) fn append_matched(&mut self, id: &str, matched: MatchedValue) {
        self.mark_present(id);
        self.values.entry(id.to_string()).or_default().push(matched);
    }

    pub(crate) fn increment_flag(&mut self, id: &str) {
        self.mark_present(id);
        *self.flags.entry(id.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn set_flag(&mut self, id: &str, value: bool) {
        self.mark_present(id);
        self.flags.insert(id.to_string(), u32::from(value));
    }

    pub(crate) fn set_subcommand(&mut self, name: String, matches: ArgMatches) {
        self.subcommand = Some(Box::new((name, matches)));
    }

    pub(crate) fn add_trailing(&mut self, token: String) {
        self.trailing.push(token);
    }

    // User input for this invocation specifically: seeded defaults and
    // environment fallbacks do not count.
    pub(crate) fn has_command_line_input(&self) -> bool {
        !self.flags.is_empty()
            || !self.trailing.is_empty()
            || self
                .values
                .values()
                .flatten()
                .any(|matched| matched.source == ValueSource::CommandLine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(value: &str) -> ParsedValue {
        ParsedValue::Str(value.to_string())
    }

    #[test]
    fn set_then_get_one() {
        // Setup
        let mut matches = ArgMatches::default();

        // Execute
        matches.set_value("config", string("a.conf"), ValueSource::Default);
        matches.set_value("config", string("b.conf"), ValueSource::CommandLine);

        // Verify - set replaces
        assert_eq!(matches.get_one("config"), Some(&string("b.conf")));
        assert_eq!(matches.get_many("config").unwrap().len(), 1);
        assert_eq!(
            matches.value_source("config"),
            Some(ValueSource::CommandLine)
        );
    }

    #[test]
    fn append_preserves_order() {
        // Setup
        let mut matches = ArgMatches::default();

        // Execute
        for value in ["a", "b", "c"] {
            matches.append_value("include", string(value), ValueSource::CommandLine);
        }

        // Verify
        assert_eq!(
            matches.get_many("include").unwrap(),
            vec![&string("a"), &string("b"), &string("c")]
        );
        assert_eq!(matches.get_one("include"), Some(&string("c")));
    }

    #[test]
    fn get_one_or_falls_back() {
        let matches = ArgMatches::default();
        let default = string("fallback");
        assert_eq!(matches.get_one_or("absent", &default), &default);
    }

    #[test]
    fn flag_counting() {
        // Setup
        let mut matches = ArgMatches::default();

        // Execute
        matches.increment_flag("verbose");
        matches.increment_flag("verbose");
        matches.increment_flag("verbose");

        // Verify
        assert_eq!(matches.get_count("verbose"), 3);
        assert!(matches.flag("verbose"));
        assert!(matches.contains("verbose"));
    }

    #[test]
    fn toggled_off_still_present() {
        // Setup
        let mut matches = ArgMatches::default();

        // Execute
        matches.set_flag("color", false);

        // Verify
        assert_eq!(matches.get_count("color"), 0);
        assert!(!matches.flag("color"));
        assert!(matches.contains("color"));
    }

    #[test]
    fn subcommand_access() {
        // Setup
        let mut inner = ArgMatches::default();
        inner.set_value("name", string("myproject"), ValueSource::CommandLine);
        let mut matches = ArgMatches::default();

        // Execute
        matches.set_subcommand("init".to_string(), inner);

        // Verify
        assert_eq!(matches.subcommand_name(), Some("init"));
        assert!(matches.subcommand_matches("init").is_some());
        assert!(matches.subcommand_matches("other").is_none());

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "init");
        assert_eq!(sub.get_one("name"), Some(&string("myproject")));
    }

    #[test]
    fn ids_sorted() {
        let mut matches = ArgMatches::default();
        matches.set_value("zeta", string("z"), ValueSource::CommandLine);
        matches.increment_flag("alpha");
        assert_eq!(matches.ids(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn emptiness() {
        let mut matches = ArgMatches::default();
        assert!(matches.is_empty());
        assert!(!matches.has_command_line_input());

        matches.set_value("config", string("a"), ValueSource::Default);
        assert!(!matches.is_empty());
        assert!(!matches.has_command_line_input());

        matches.set_value("config", string("b"), ValueSource::CommandLine);
        assert!(matches.has_command_line_input());
    }

    #[test]
    fn trailing_order() {
        let mut matches = ArgMatches::default();
        matches.add_trailing("-a".to_string());
        matches.add_trailing("-b".to_string());
        assert_eq!(matches.trailing(), &["-a".to_string(), "-b".to_string()]);
    }
}
