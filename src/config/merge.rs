//! Source composition for `SwarmConfig`.

pub mod merge_policy;
pub mod service;
