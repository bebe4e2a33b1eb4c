use terminal_size::{terminal_size, Width};

use crate::api::{Arg, Command};
use crate::model::{Setting, ValueHint};

const INDENT: usize = 2;
const PADDING: usize = 2;
const FALLBACK_WIDTH: usize = 100;
// Assuming an average word length of 5, this fits three words per line.
const MINIMUM_HELP_WIDTH: usize = 17;

pub(crate) fn render_version(command: &Command) -> String {
    match &command.version {
        Some(version) => format!("{} {version}", command.full_name()),
        None => command.full_name(),
    }
}

pub(crate) fn render_help(command: &Command, builtins: &[Arg]) -> String {
    let width = terminal_width();
    let mut lines: Vec<String> = Vec::default();

    if let Some(before) = &command.before_help {
        lines.extend(wrap(before, width));
        lines.push(String::default());
    }

    lines.push(usage_line(command, builtins));

    if let Some(about) = command.long_about.as_ref().or(command.about.as_ref()) {
        lines.push(String::default());
        lines.extend(wrap(about, width));
    }

    if let Some(author) = &command.author {
        if !command.is_set(Setting::HideAuthor) {
            lines.push(String::default());
            lines.push(format!("Written by {author}."));
        }
    }

    let positionals: Vec<&Arg> = command
        .positional_args()
        .into_iter()
        .filter(|arg| !arg.hidden)
        .collect();
    let options: Vec<&Arg> = builtins
        .iter()
        .chain(command.args.iter())
        .filter(|arg| !arg.is_positional() && !arg.hidden)
        .collect();
    let subcommands: Vec<&Command> = command.subcommands.iter().collect();

    let mut left_width = 0;
    let positional_labels: Vec<String> = positionals.iter().map(|arg| value_name(arg)).collect();
    let option_labels: Vec<String> = options.iter().map(|arg| option_label(arg)).collect();
    let subcommand_labels: Vec<String> = subcommands
        .iter()
        .map(|subcommand| subcommand_label(subcommand))
        .collect();

    for label in positional_labels
        .iter()
        .chain(option_labels.iter())
        .chain(subcommand_labels.iter())
    {
        left_width = left_width.max(label.len());
    }

    if !positionals.is_empty() {
        lines.push(String::default());
        lines.push("positional arguments:".to_string());

        for (arg, label) in positionals.iter().zip(positional_labels.iter()) {
            entry(&mut lines, label, arg_help(command, arg), left_width, width);
        }
    }

    if !options.is_empty() {
        lines.push(String::default());
        lines.push("options:".to_string());

        for (arg, label) in options.iter().zip(option_labels.iter()) {
            entry(&mut lines, label, arg_help(command, arg), left_width, width);
        }
    }

    if !subcommands.is_empty() {
        lines.push(String::default());
        lines.push("subcommands:".to_string());

        for (subcommand, label) in subcommands.iter().zip(subcommand_labels.iter()) {
            entry(
                &mut lines,
                label,
                subcommand.about.clone(),
                left_width,
                width,
            );
        }
    }

    if let Some(after) = &command.after_help {
        lines.push(String::default());
        lines.extend(wrap(after, width));
    }

    lines.join("\n")
}

fn usage_line(command: &Command, builtins: &[Arg]) -> String {
    if let Some(usage) = &command.usage_override {
        return format!("usage: {usage}");
    }

    let mut pieces = vec![format!("usage: {}", command.full_name())];

    for arg in builtins.iter().chain(command.args.iter()) {
        if arg.is_positional() || arg.hidden {
            continue;
        }

        let flag = match (arg.short, &arg.long) {
            (Some(short), _) => format!("-{short}"),
            (None, Some(long)) => format!("--{long}"),
            (None, None) => unreachable!("internal error - option without a flag"),
        };

        if arg.takes_value() {
            pieces.push(format!("[{flag} <{}>]", value_name(arg)));
        } else {
            pieces.push(format!("[{flag}]"));
        }
    }

    for arg in command.positional_args() {
        if arg.hidden {
            continue;
        }

        pieces.push(positional_grammar(arg));
    }

    if !command.subcommands.is_empty() {
        pieces.push("<COMMAND>".to_string());
    }

    pieces.join(" ")
}

fn value_name(arg: &Arg) -> String {
    if let Some(name) = arg.value_names.first() {
        return name.clone();
    }

    match arg.value_hint {
        ValueHint::AnyPath => "PATH".to_string(),
        ValueHint::FilePath => "FILE".to_string(),
        ValueHint::DirPath => "DIR".to_string(),
        ValueHint::ExecutablePath => "EXE".to_string(),
        ValueHint::CommandName => "COMMAND".to_string(),
        ValueHint::Url => "URL".to_string(),
        ValueHint::Username => "USER".to_string(),
        ValueHint::Hostname => "HOST".to_string(),
        ValueHint::EmailAddress => "EMAIL".to_string(),
        ValueHint::Unknown => arg.id.to_ascii_uppercase().replace('-', "_"),
    }
}

fn positional_grammar(arg: &Arg) -> String {
    let name = value_name(arg);
    let required = arg.required || arg.num_args.is_required();

    match (required, arg.num_args.is_multiple() || arg.allow_multiple) {
        (true, false) => format!("<{name}>"),
        (true, true) => format!("<{name}> [...]"),
        (false, false) => format!("[{name}]"),
        (false, true) => format!("[{name} ...]"),
    }
}

fn option_label(arg: &Arg) -> String {
    let mut label = match (arg.short, &arg.long) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("    --{long}"),
        (None, None) => unreachable!("internal error - option without a flag"),
    };

    if arg.takes_value() {
        label.push_str(&format!(" <{}>", value_name(arg)));
    }

    label
}

fn subcommand_label(subcommand: &Command) -> String {
    if subcommand.aliases.is_empty() {
        subcommand.name.clone()
    } else {
        format!("{} ({})", subcommand.name, subcommand.aliases.join(", "))
    }
}

fn arg_help(command: &Command, arg: &Arg) -> Option<String> {
    let mut help = arg.help.clone().unwrap_or_default();

    if let Some(default) = &arg.default_value {
        if !arg.hide_default_value {
            if !help.is_empty() {
                help.push(' ');
            }
            help.push_str(&format!("[default: {default}]"));
        }
    }

    if let Some(possible) = arg.value_parser.possible_values() {
        if !arg.hide_possible_values && !command.is_set(Setting::HidePossibleValues) {
            if !help.is_empty() {
                help.push(' ');
            }
            help.push_str(&format!("[possible values: {}]", possible.join(", ")));
        }
    }

    if help.is_empty() {
        None
    } else {
        Some(help)
    }
}

fn entry(
    lines: &mut Vec<String>,
    label: &str,
    help: Option<String>,
    left_width: usize,
    total_width: usize,
) {
    let Some(help) = help else {
        lines.push(format!("{:INDENT$}{label}", ""));
        return;
    };

    let help_width = total_width
        .saturating_sub(INDENT + left_width + PADDING)
        .max(MINIMUM_HELP_WIDTH);

    for (i, chunk) in wrap(&help, help_width).into_iter().enumerate() {
        if i == 0 {
            lines.push(format!("{:INDENT$}{label:left_width$}{:PADDING$}{chunk}", "", ""));
        } else {
            lines.push(format!("{:INDENT$}{:left_width$}{:PADDING$}{chunk}", "", "", ""));
        }
    }
}

fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + word.len() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn terminal_width() -> usize {
    match terminal_size() {
        Some((Width(width), _)) => width as usize,
        None => FALLBACK_WIDTH,
    }
}
