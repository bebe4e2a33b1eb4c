mod arg;
mod command;
mod group;

pub use arg::Arg;
pub use command::{ActionHandler, Command};
pub use group::ArgGroup;
