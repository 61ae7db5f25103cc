pub mod op;
pub mod sequence;
