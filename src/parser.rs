mod base;
pub(crate) mod printer;
pub(crate) mod suggest;

pub(crate) use base::Parser;
