use clargs::{
    Arg, ArgAction, ArgGroup, Command, Error, ErrorKind, ParsedValue, Setting, ValueParser,
    ValueRange, ValueSource,
};

fn str_value(value: &str) -> ParsedValue {
    ParsedValue::Str(value.to_string())
}

#[test]
fn conflicting_flags() {
    let command = Command::new("cmd")
        .arg(Arg::new("config").short('c').long("config"))
        .arg(Arg::new("verbose").short('v').action(ArgAction::SetTrue))
        .arg(
            Arg::new("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        );

    let error = command.get_matches(["-v", "-q"]).unwrap_err();

    assert_eq!(
        error,
        Error::ArgumentConflict {
            left: "quiet".to_string(),
            right: "verbose".to_string(),
        }
    );
    assert_eq!(
        error.to_string(),
        "argument 'quiet' cannot be used with 'verbose'"
    );
}

#[test]
fn defaulted_option() {
    let command =
        Command::new("cmd").arg(Arg::new("config").long("config").default_value("default.conf"));

    let matches = command.get_matches(Vec::<String>::new()).unwrap();

    assert_eq!(matches.get_one("config"), Some(&str_value("default.conf")));
    assert_eq!(matches.value_source("config"), Some(ValueSource::Default));
}

#[test]
fn appended_occurrences() {
    let command = Command::new("cmd").arg(Arg::new("include").short('I').action(ArgAction::Append));

    let matches = command.get_matches(["-I", "a", "-I", "b", "-I", "c"]).unwrap();

    assert_eq!(
        matches.get_many("include").unwrap(),
        vec![&str_value("a"), &str_value("b"), &str_value("c")]
    );
}

#[test]
fn counted_cluster() {
    let command = Command::new("cmd").arg(Arg::new("verbose").short('v').action(ArgAction::Count));

    let matches = command.get_matches(["-vvv"]).unwrap();

    assert_eq!(matches.get_count("verbose"), 3);
}

#[test]
fn subcommand_with_required_positional() {
    let command =
        Command::new("cmd").subcommand(Command::new("init").arg(Arg::new("name").required(true)));

    let matches = command.get_matches(["init", "myproject"]).unwrap();

    assert_eq!(matches.subcommand_name(), Some("init"));
    let init = matches.subcommand_matches("init").unwrap();
    assert_eq!(init.get_one("name"), Some(&str_value("myproject")));
}

#[test]
fn trailing_after_separator() {
    let command = Command::new("cmd").arg(Arg::new("verbose").short('v').action(ArgAction::SetTrue));

    let matches = command.get_matches(["-v", "--", "-a", "-b"]).unwrap();

    assert!(matches.flag("verbose"));
    assert_eq!(matches.trailing(), &["-a".to_string(), "-b".to_string()]);
}

#[test]
fn empty_argv_with_defaults_only() {
    let command = Command::new("cmd")
        .arg(Arg::new("config").long("config").default_value("a.conf"))
        .arg(Arg::new("optional").long("optional"))
        .arg(Arg::new("verbose").short('v').action(ArgAction::Count));

    let matches = command.get_matches(Vec::<String>::new()).unwrap();

    assert!(matches.contains("config"));
    assert_eq!(matches.value_source("config"), Some(ValueSource::Default));
    assert!(!matches.contains("optional"));
    assert!(!matches.contains("verbose"));
    assert!(matches.trailing().is_empty());
}

#[test]
fn repeated_parse_structurally_equal() {
    let command = Command::new("cmd")
        .arg(Arg::new("config").long("config").default_value("a.conf"))
        .arg(Arg::new("include").short('I').action(ArgAction::Append))
        .arg(Arg::new("verbose").short('v').action(ArgAction::Count));

    let argv = ["-vv", "-I", "x", "-I", "y"];
    let first = command.get_matches(argv).unwrap();
    let second = command.get_matches(argv).unwrap();

    assert_eq!(first, second);
}

#[test]
fn command_line_beats_environment() {
    let command = Command::new("cmd").arg(
        Arg::new("level")
            .long("level")
            .env("CLARGS_E2E_LEVEL")
            .default_value("info"),
    );

    std::env::set_var("CLARGS_E2E_LEVEL", "debug");
    let matches = command.get_matches(["--level", "trace"]).unwrap();
    std::env::remove_var("CLARGS_E2E_LEVEL");

    assert_eq!(matches.get_one("level"), Some(&str_value("trace")));
    assert_eq!(matches.value_source("level"), Some(ValueSource::CommandLine));
}

#[test]
fn typed_values_end_to_end() {
    let command = Command::new("cmd")
        .arg(Arg::new("jobs").short('j').value_parser(ValueParser::int_range(1, 32)))
        .arg(Arg::new("ratio").long("ratio").value_parser(ValueParser::Float))
        .arg(Arg::new("cache").long("cache").value_parser(ValueParser::Bool))
        .arg(
            Arg::new("level")
                .long("level")
                .value_parser(ValueParser::choice_ignore_case(["Low", "High"])),
        );

    let matches = command
        .get_matches(["-j", "8", "--ratio", "0.5", "--cache", "yes", "--level", "HIGH"])
        .unwrap();

    assert_eq!(matches.get_one("jobs").unwrap().as_int(), Some(8));
    assert_eq!(matches.get_one("ratio").unwrap().as_float(), Some(0.5));
    assert_eq!(matches.get_one("cache").unwrap().as_bool(), Some(true));
    assert_eq!(matches.get_one("level"), Some(&str_value("High")));
}

#[test]
fn delimited_values_preserve_order() {
    let command = Command::new("cmd").arg(
        Arg::new("include")
            .short('I')
            .action(ArgAction::Append)
            .value_delimiter(','),
    );

    let matches = command.get_matches(["-I", "a,b", "-I", "c"]).unwrap();

    assert_eq!(
        matches.get_many("include").unwrap(),
        vec![&str_value("a"), &str_value("b"), &str_value("c")]
    );
}

#[test]
fn full_tree_walkthrough() {
    let command = Command::new("pkg")
        .version("2.1.0")
        .setting(Setting::PropagateVersion)
        .setting(Setting::SubcommandRequired)
        .arg(Arg::new("verbose").short('v').action(ArgAction::Count).global(true))
        .subcommand(
            Command::new("install")
                .arg(Arg::new("package").required(true))
                .arg(
                    Arg::new("features")
                        .long("features")
                        .action(ArgAction::Append)
                        .value_delimiter(','),
                )
                .arg(Arg::new("offline").long("offline").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("search").arg(Arg::new("query").required(true)));

    let matches = command
        .get_matches(["-vv", "install", "serde", "--features", "derive,std", "--offline"])
        .unwrap();

    assert_eq!(matches.get_count("verbose"), 2);
    assert_eq!(matches.subcommand_name(), Some("install"));

    let install = matches.subcommand_matches("install").unwrap();
    assert_eq!(install.get_count("verbose"), 2);
    assert_eq!(install.get_one("package"), Some(&str_value("serde")));
    assert_eq!(
        install.get_many("features").unwrap(),
        vec![&str_value("derive"), &str_value("std")]
    );
    assert!(install.flag("offline"));
}

#[test]
fn missing_subcommand_reported() {
    let command = Command::new("pkg")
        .setting(Setting::SubcommandRequired)
        .subcommand(Command::new("install"));

    let error = command.get_matches(Vec::<String>::new()).unwrap_err();

    assert_eq!(error, Error::MissingSubcommand);
    assert_eq!(error.exit_code(), 1);
}

#[test]
fn misspelled_option_suggests() {
    let command = Command::new("cmd")
        .arg(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue));

    let error = command.get_matches(["--vrebose"]).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    assert_eq!(
        error.to_string(),
        "unknown argument '--vrebose'\n\n\tDid you mean: --verbose?"
    );
}

#[test]
fn help_display_is_exit_zero() {
    let command = Command::new("cmd").about("A demo.");

    let error = command.get_matches(["--help"]).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::DisplayHelp);
    assert_eq!(error.exit_code(), 0);
    assert!(!error.use_stderr());
    assert!(error.to_string().contains("usage: cmd"));
}

#[test]
fn version_display_is_exit_zero() {
    let command = Command::new("cmd").version("0.3.0");

    let error = command.get_matches(["-V"]).unwrap_err();

    assert_eq!(error, Error::DisplayVersion("cmd 0.3.0".to_string()));
    assert_eq!(error.exit_code(), 0);
}

#[test]
fn exclusive_group_end_to_end() {
    let command = Command::new("cmd")
        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
        .arg(Arg::new("yaml").long("yaml").action(ArgAction::SetTrue))
        .group(ArgGroup::new("format").arg("json").arg("yaml"));

    let error = command.get_matches(["--json", "--yaml"]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ArgumentConflict);

    let matches = command.get_matches(["--json"]).unwrap();
    assert!(matches.flag("json"));
}

#[test]
fn multi_value_option_bounds() {
    let command = Command::new("cmd").arg(
        Arg::new("corner")
            .long("corner")
            .action(ArgAction::Append)
            .num_args(ValueRange::exactly(2))
            .value_parser(ValueParser::Int),
    );

    let matches = command.get_matches(["--corner", "3", "4"]).unwrap();
    assert_eq!(
        matches.get_many("corner").unwrap(),
        vec![&ParsedValue::Int(3), &ParsedValue::Int(4)]
    );

    let error = command.get_matches(["--corner", "3"]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TooFewValues);
}
