//! CLI command implementations.

pub(crate) mod confluence;
pub(crate) mod convert;

pub(crate) use confluence::ConfluenceCommand;
pub(crate) use convert::ConvertArgs;
