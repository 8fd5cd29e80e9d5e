//! CLI command implementations

pub(crate) mod common;
pub(crate) mod ls;
pub(crate) mod run;
pub(crate) mod status;
