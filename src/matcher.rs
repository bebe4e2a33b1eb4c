mod matches;

pub use matches::{ArgMatches, MatchedValue};
