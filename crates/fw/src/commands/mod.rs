//! CLI command implementations.

pub(crate) mod link;
pub(crate) mod serve;

pub(crate) use link::LinkArgs;
pub(crate) use serve::ServeArgs;
