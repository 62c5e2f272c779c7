//! Controller layer: UI events, feedback forwarding, and command orchestration.

pub mod events;
pub mod feedback;
pub mod orchestration;
