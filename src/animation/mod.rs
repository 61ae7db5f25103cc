//! Timed animation events and easing curves.

pub mod ease;
pub mod event;
