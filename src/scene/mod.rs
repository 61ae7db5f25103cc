//! Scene timeline, visibility and per-frame drawing instructions.

pub mod cache;
pub mod canvas;
pub mod frame;
pub mod model;
