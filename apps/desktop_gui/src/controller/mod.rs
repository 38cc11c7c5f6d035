//! Controller layer: backend events, toast routing, and command orchestration.

pub mod events;
pub mod orchestration;
