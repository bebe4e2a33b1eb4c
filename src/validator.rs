use crate::api::{Arg, ArgGroup, Command};
use crate::error::Error;
use crate::matcher::ArgMatches;
use crate::model::{ArgAction, Setting};
use crate::parser::printer;

/// Enforce the cross-argument constraints against a parsed [`ArgMatches`].
///
/// Checks run in a fixed order - required args, required groups, conflicts,
/// dependencies, conditional requirements, required-unless, value counts,
/// group exclusivity, subcommand requirement - and the first violation wins.
/// The selected subcommand's matches are validated recursively afterwards.
pub(crate) fn validate(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    required_args(command, matches)?;
    required_groups(command, matches)?;
    conflicts(command, matches)?;
    dependencies(command, matches)?;
    conditionally_required(command, matches)?;
    required_unless(command, matches)?;
    value_counts(command, matches)?;
    group_exclusivity(command, matches)?;
    subcommand_presence(command, matches)?;

    if let Some((name, sub_matches)) = matches.subcommand() {
        let subcommand = command
            .find_subcommand(name)
            .expect("internal error - the matched subcommand must exist");
        validate(subcommand, sub_matches)?;
    }

    Ok(())
}

fn required_args(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    for arg in &command.args {
        if arg.required && !matches.contains(&arg.id) {
            return Err(Error::MissingRequiredArgument {
                id: arg.id.clone(),
                context: None,
            });
        }
    }

    Ok(())
}

fn required_groups(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    for group in &command.groups {
        if group.required
            && !group_members(command, group)
                .iter()
                .any(|id| matches.contains(id))
        {
            return Err(Error::MissingRequiredGroup {
                group: group.id.clone(),
            });
        }
    }

    Ok(())
}

fn conflicts(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    for arg in &command.args {
        if !matches.contains(&arg.id) {
            continue;
        }

        for other in &arg.conflicts {
            if matches.contains(other) {
                return Err(Error::ArgumentConflict {
                    left: arg.id.clone(),
                    right: other.clone(),
                });
            }
        }
    }

    for group in &command.groups {
        let Some(member) = present_member(command, group, matches) else {
            continue;
        };

        for other in &group.conflicts_with {
            if matches.contains(other) {
                return Err(Error::ArgumentConflict {
                    left: member.to_string(),
                    right: other.clone(),
                });
            }
        }
    }

    Ok(())
}

fn dependencies(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    for arg in &command.args {
        if !matches.contains(&arg.id) {
            continue;
        }

        for required in &arg.requires {
            if !matches.contains(required) {
                return Err(Error::MissingDependency {
                    id: arg.id.clone(),
                    required: required.clone(),
                });
            }
        }
    }

    for group in &command.groups {
        let Some(member) = present_member(command, group, matches) else {
            continue;
        };

        for required in &group.requires {
            if !matches.contains(required) {
                return Err(Error::MissingDependency {
                    id: member.to_string(),
                    required: required.clone(),
                });
            }
        }
    }

    Ok(())
}

fn conditionally_required(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    for arg in &command.args {
        for (condition, expected) in &arg.required_if {
            if matches.contains(&arg.id) || !matches.contains(condition) {
                continue;
            }

            let bound = matches
                .get_one(condition)
                .map(|value| value.to_string());

            if bound.as_deref() == Some(expected.as_str()) {
                return Err(Error::MissingRequiredArgument {
                    id: arg.id.clone(),
                    context: Some(format!(" (when '{condition}' is '{expected}')")),
                });
            }
        }
    }

    Ok(())
}

fn required_unless(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    for arg in &command.args {
        if arg.required_unless.is_empty() || matches.contains(&arg.id) {
            continue;
        }

        if !arg.required_unless.iter().any(|id| matches.contains(id)) {
            return Err(Error::MissingRequiredArgument {
                id: arg.id.clone(),
                context: None,
            });
        }
    }

    Ok(())
}

fn value_counts(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    for arg in &command.args {
        if arg.is_flag() || !matches.contains(&arg.id) {
            continue;
        }

        let actual = matches.get_raw(&arg.id).map_or(0, |values| values.len());

        if (actual as u32) < arg.num_args.min() {
            return Err(Error::TooFewValues {
                id: arg.id.clone(),
                minimum: arg.num_args.min(),
                actual,
            });
        }

        // Accumulating args bound their value count per occurrence in the
        // parser; the total is allowed to exceed the upper bound.
        if accumulates(arg) {
            continue;
        }

        if let Some(maximum) = arg.num_args.max() {
            if actual as u32 > maximum {
                return Err(Error::TooManyValues {
                    id: arg.id.clone(),
                    maximum,
                    actual,
                });
            }
        }
    }

    Ok(())
}

fn group_exclusivity(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    for group in &command.groups {
        if group.multiple {
            continue;
        }

        let present: Vec<&str> = group_members(command, group)
            .into_iter()
            .filter(|id| matches.contains(id))
            .collect();

        if let [first, second, ..] = present[..] {
            return Err(Error::ArgumentConflict {
                left: first.to_string(),
                right: second.to_string(),
            });
        }
    }

    Ok(())
}

fn subcommand_presence(command: &Command, matches: &ArgMatches) -> Result<(), Error> {
    if !command.is_set(Setting::SubcommandRequired)
        || command.subcommands.is_empty()
        || matches.subcommand_name().is_some()
    {
        return Ok(());
    }

    if command.is_set(Setting::ArgRequiredElseHelp) && !matches.has_command_line_input() {
        return Err(Error::DisplayHelp(printer::render_help(
            command,
            &command.builtin_args(),
        )));
    }

    Err(Error::MissingSubcommand)
}

fn accumulates(arg: &Arg) -> bool {
    arg.action == ArgAction::Append || arg.allow_multiple
}

// A group's members: the ids it declares, plus any arg that declared the
// group on itself.
fn group_members<'c>(command: &'c Command, group: &'c ArgGroup) -> Vec<&'c str> {
    let mut members: Vec<&str> = group.args.iter().map(String::as_str).collect();

    for arg in &command.args {
        if arg.groups.iter().any(|id| id == &group.id) && !members.contains(&arg.id.as_str()) {
            members.push(&arg.id);
        }
    }

    members
}

fn present_member<'c>(
    command: &'c Command,
    group: &'c ArgGroup,
    matches: &ArgMatches,
) -> Option<&'c str> {
    group_members(command, group)
        .into_iter()
        .find(|id| matches.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::ValueRange;
    use rstest::rstest;

    fn run(command: &Command, argv: &[&str]) -> Result<ArgMatches, Error> {
        command.get_matches(argv.iter().map(|token| token.to_string()))
    }

    #[test]
    fn required_arg_missing() {
        // Setup
        let command = Command::new("tool").arg(Arg::new("input").required(true));

        // Execute
        let error = run(&command, &[]).unwrap_err();

        // Verify
        assert_eq!(
            error,
            Error::MissingRequiredArgument {
                id: "input".to_string(),
                context: None,
            }
        );
    }

    #[rstest]
    #[case(&[], false)]
    #[case(&["--input", "x"], true)]
    fn required_arg_satisfied_by_presence(#[case] argv: &[&str], #[case] expected_ok: bool) {
        let command = Command::new("tool").arg(Arg::new("input").long("input").required(true));
        assert_eq!(run(&command, argv).is_ok(), expected_ok);
    }

    #[test]
    fn required_arg_satisfied_by_default() {
        // Setup - a default counts as a binding
        let command = Command::new("tool")
            .arg(Arg::new("input").long("input").required(true).default_value("x"));

        // Execute & verify
        assert!(run(&command, &[]).is_ok());
    }

    #[test]
    fn required_group() {
        // Setup
        let command = Command::new("tool")
            .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
            .arg(Arg::new("yaml").long("yaml").action(ArgAction::SetTrue))
            .group(ArgGroup::new("format").arg("json").arg("yaml").required(true));

        // Execute & verify
        assert_eq!(
            run(&command, &[]).unwrap_err(),
            Error::MissingRequiredGroup {
                group: "format".to_string(),
            }
        );
        assert!(run(&command, &["--json"]).is_ok());
    }

    #[test]
    fn conflicting_arguments() {
        // Setup - the conflict is declared on 'quiet'
        let command = Command::new("tool")
            .arg(Arg::new("verbose").short('v').action(ArgAction::SetTrue))
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .action(ArgAction::SetTrue)
                    .conflicts_with("verbose"),
            );

        // Execute
        let error = run(&command, &["-v", "-q"]).unwrap_err();

        // Verify - declaration order fixes the naming
        assert_eq!(
            error,
            Error::ArgumentConflict {
                left: "quiet".to_string(),
                right: "verbose".to_string(),
            }
        );
    }

    #[test]
    fn conflict_requires_both_present() {
        let command = Command::new("tool")
            .arg(Arg::new("verbose").short('v').action(ArgAction::SetTrue))
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .action(ArgAction::SetTrue)
                    .conflicts_with("verbose"),
            );

        assert!(run(&command, &["-q"]).is_ok());
        assert!(run(&command, &["-v"]).is_ok());
    }

    #[test]
    fn group_conflict() {
        // Setup
        let command = Command::new("tool")
            .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
            .arg(Arg::new("raw").long("raw").action(ArgAction::SetTrue))
            .group(ArgGroup::new("format").arg("json").conflicts_with("raw"));

        // Execute
        let error = run(&command, &["--json", "--raw"]).unwrap_err();

        // Verify
        assert_eq!(
            error,
            Error::ArgumentConflict {
                left: "json".to_string(),
                right: "raw".to_string(),
            }
        );
    }

    #[test]
    fn missing_dependency() {
        // Setup
        let command = Command::new("tool")
            .arg(Arg::new("output").long("output"))
            .arg(
                Arg::new("compress")
                    .long("compress")
                    .action(ArgAction::SetTrue)
                    .requires("output"),
            );

        // Execute & verify
        assert_eq!(
            run(&command, &["--compress"]).unwrap_err(),
            Error::MissingDependency {
                id: "compress".to_string(),
                required: "output".to_string(),
            }
        );
        assert!(run(&command, &["--compress", "--output", "x"]).is_ok());
    }

    #[test]
    fn group_dependency() {
        let command = Command::new("tool")
            .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
            .arg(Arg::new("output").long("output"))
            .group(ArgGroup::new("format").arg("json").requires("output"));

        assert_eq!(
            run(&command, &["--json"]).unwrap_err().kind(),
            ErrorKind::MissingDependency
        );
    }

    #[rstest]
    #[case(&["--format", "json"], false)]
    #[case(&["--format", "yaml"], true)]
    #[case(&["--format", "json", "--schema", "s.json"], true)]
    #[case(&[], true)]
    fn conditionally_required_on_exact_value(
        #[case] argv: &[&str],
        #[case] expected_ok: bool,
    ) {
        // Setup
        let command = Command::new("tool")
            .arg(Arg::new("format").long("format"))
            .arg(Arg::new("schema").long("schema").required_if("format", "json"));

        // Execute
        let result = run(&command, argv);

        // Verify
        if expected_ok {
            assert!(result.is_ok());
        } else {
            assert_eq!(
                result.unwrap_err(),
                Error::MissingRequiredArgument {
                    id: "schema".to_string(),
                    context: Some(" (when 'format' is 'json')".to_string()),
                }
            );
        }
    }

    #[rstest]
    #[case(&[], false)]
    #[case(&["--token", "t"], true)]
    #[case(&["--anonymous"], true)]
    fn required_unless_alternative_present(#[case] argv: &[&str], #[case] expected_ok: bool) {
        // Setup
        let command = Command::new("tool")
            .arg(Arg::new("anonymous").long("anonymous").action(ArgAction::SetTrue))
            .arg(Arg::new("token").long("token").required_unless("anonymous"));

        // Execute & verify
        assert_eq!(run(&command, argv).is_ok(), expected_ok);
    }

    #[test]
    fn too_few_values_across_occurrence() {
        // Setup
        let command = Command::new("tool").arg(
            Arg::new("pair")
                .long("pair")
                .action(ArgAction::Append)
                .num_args(ValueRange::new(2, Some(2))),
        );

        // Execute
        let error = run(&command, &["--pair", "only-one"]).unwrap_err();

        // Verify
        assert_eq!(
            error,
            Error::TooFewValues {
                id: "pair".to_string(),
                minimum: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn appended_occurrences_ignore_upper_bound() {
        // Setup - three occurrences of a one-value-per-occurrence contract
        let command = Command::new("tool")
            .arg(Arg::new("include").short('I').action(ArgAction::Append));

        // Execute & verify
        let matches = run(&command, &["-I", "a", "-I", "b", "-I", "c"]).unwrap();
        assert_eq!(matches.get_many("include").unwrap().len(), 3);
    }

    #[test]
    fn group_exclusivity_names_first_two() {
        // Setup
        let command = Command::new("tool")
            .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
            .arg(Arg::new("yaml").long("yaml").action(ArgAction::SetTrue))
            .arg(Arg::new("toml").long("toml").action(ArgAction::SetTrue))
            .group(ArgGroup::new("format").arg("json").arg("yaml").arg("toml"));

        // Execute
        let error = run(&command, &["--yaml", "--toml"]).unwrap_err();

        // Verify - named in group declaration order
        assert_eq!(
            error,
            Error::ArgumentConflict {
                left: "yaml".to_string(),
                right: "toml".to_string(),
            }
        );
    }

    #[test]
    fn membership_declared_on_the_arg() {
        // Setup - 'toml' joins the group from its own builder
        let command = Command::new("tool")
            .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
            .arg(Arg::new("toml").long("toml").action(ArgAction::SetTrue).group("format"))
            .group(ArgGroup::new("format").arg("json"));

        // Execute
        let error = run(&command, &["--json", "--toml"]).unwrap_err();

        // Verify
        assert_eq!(
            error,
            Error::ArgumentConflict {
                left: "json".to_string(),
                right: "toml".to_string(),
            }
        );
    }

    #[test]
    fn multiple_group_members_allowed() {
        let command = Command::new("tool")
            .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
            .arg(Arg::new("yaml").long("yaml").action(ArgAction::SetTrue))
            .group(ArgGroup::new("format").arg("json").arg("yaml").multiple(true));

        assert!(run(&command, &["--json", "--yaml"]).is_ok());
    }

    #[test]
    fn subcommand_required() {
        // Setup
        let command = Command::new("tool")
            .setting(Setting::SubcommandRequired)
            .subcommand(Command::new("init"));

        // Execute & verify
        assert_eq!(run(&command, &[]).unwrap_err(), Error::MissingSubcommand);
        assert!(run(&command, &["init"]).is_ok());
    }

    #[test]
    fn subcommand_required_else_help() {
        // Setup
        let command = Command::new("tool")
            .setting(Setting::SubcommandRequired)
            .setting(Setting::ArgRequiredElseHelp)
            .arg(Arg::new("verbose").short('v').action(ArgAction::Count))
            .subcommand(Command::new("init"));

        // Execute
        let bare = run(&command, &[]).unwrap_err();
        let with_input = run(&command, &["-v"]).unwrap_err();

        // Verify - bare invocation surfaces help, any input restores the error
        assert_eq!(bare.kind(), ErrorKind::DisplayHelp);
        assert_eq!(with_input, Error::MissingSubcommand);
    }

    #[test]
    fn first_violation_wins() {
        // Setup - both a required arg and a conflict are violated; the
        // required check runs first
        let command = Command::new("tool")
            .arg(Arg::new("input").long("input").required(true))
            .arg(Arg::new("verbose").short('v').action(ArgAction::SetTrue))
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .action(ArgAction::SetTrue)
                    .conflicts_with("verbose"),
            );

        // Execute
        let error = run(&command, &["-v", "-q"]).unwrap_err();

        // Verify
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn subcommand_matches_validated_recursively() {
        // Setup
        let command = Command::new("tool").subcommand(
            Command::new("init").arg(Arg::new("name").required(true)),
        );

        // Execute
        let error = run(&command, &["init"]).unwrap_err();

        // Verify
        assert_eq!(
            error,
            Error::MissingRequiredArgument {
                id: "name".to_string(),
                context: None,
            }
        );
    }
}
