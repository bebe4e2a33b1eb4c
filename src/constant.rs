pub(crate) const HELP_ID: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";

pub(crate) const VERSION_ID: &str = "version";
pub(crate) const VERSION_SHORT: char = 'V';
pub(crate) const VERSION_MESSAGE: &str = "Show the version and exit.";

pub(crate) const SUGGESTION_DISTANCE: usize = 3;
pub(crate) const SUGGESTION_LIMIT: usize = 3;
