// Domain layer: campaign state machine, models and ports (interfaces).
// No I/O here; collaborators are consumed through the traits in ports.rs.

pub mod model;
pub mod ports;
