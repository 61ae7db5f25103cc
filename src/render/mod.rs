//! Frame loop and sinks consuming frame instructions.

pub mod pipeline;
pub mod sink;
