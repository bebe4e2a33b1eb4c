//! `clargs` is a declarative command line argument parser.
//!
//! Describe the shape of a command line interface - commands, subcommands,
//! options, positional arguments, flags, value parsing rules, and
//! cross-argument constraints - with a builder-style DSL, then parse a raw
//! argument vector against that description into a structured
//! [`ArgMatches`].
//!
//! The design priorities, in order:
//! * *Declarative over imperative*: the interface is data; parsing and
//!   validation are driven entirely by the [`Command`] tree.
//! * *Structured failures*: every parse or validation problem surfaces as a
//!   typed [`Error`] with a stable message; the library never prints and
//!   never exits on its own (the optional [`Command::run`] glue does both).
//! * *Provenance*: every bound value remembers whether it came from the
//!   command line, an environment variable, or a declared default.
//!
//! # Usage
//! ```
//! use clargs::{Arg, ArgAction, Command};
//!
//! let command = Command::new("demo")
//!     .version("1.0.0")
//!     .about("Demonstrates the parser.")
//!     .arg(Arg::new("config").short('c').long("config").default_value("default.conf"))
//!     .arg(Arg::new("verbose").short('v').action(ArgAction::Count))
//!     .arg(Arg::new("input").required(true));
//!
//! let matches = command.get_matches(["-vv", "--config", "demo.conf", "data.txt"]).unwrap();
//!
//! assert_eq!(matches.get_one("config").unwrap().to_string(), "demo.conf");
//! assert_eq!(matches.get_count("verbose"), 2);
//! assert_eq!(matches.get_one("input").unwrap().to_string(), "data.txt");
//! ```
//!
//! # Subcommands
//! Commands nest arbitrarily. An argument marked [`Arg::global`] at one
//! level is visible, with default provenance, in every selected subcommand's
//! matches:
//! ```
//! use clargs::{Arg, ArgAction, Command};
//!
//! let command = Command::new("tool")
//!     .arg(Arg::new("verbose").short('v').action(ArgAction::Count).global(true))
//!     .subcommand(Command::new("init").arg(Arg::new("name").required(true)));
//!
//! let matches = command.get_matches(["-v", "init", "myproject"]).unwrap();
//! let init = matches.subcommand_matches("init").unwrap();
//!
//! assert_eq!(init.get_count("verbose"), 1);
//! assert_eq!(init.get_one("name").unwrap().to_string(), "myproject");
//! ```
//!
//! # Cli semantics
//! The token walk recognizes the usual shapes:
//! * Long options: `--name`, `--name=value`, `--name value`.
//! * Short options: `-x`, `-x value`, `-xvalue`, combined flags `-abc`, and
//!   counting `-vvv`.
//! * Positional tokens, bound by slot order; a slot with
//!   [`ArgAction::Append`] collects greedily.
//! * A subcommand token hands every remaining token to that subcommand.
//! * `--` ends option processing; later tokens are reported verbatim via
//!   [`ArgMatches::trailing`].
//! * `-h/--help` and `-V/--version` are synthesized unless suppressed.
#![deny(missing_docs)]

mod api;
mod constant;
mod error;
mod matcher;
mod model;
mod parser;
mod validator;
mod value;

pub use api::{ActionHandler, Arg, ArgGroup, Command};
pub use error::{Error, ErrorKind};
pub use matcher::{ArgMatches, MatchedValue};
pub use model::{ArgAction, Setting, ValueHint, ValueRange, ValueSource};
pub use value::{CustomOutcome, CustomParseFn, ParsedValue, ValueError, ValueParser};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
