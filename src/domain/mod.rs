// Domain layer: label models, order validation and ports. No I/O here.

pub mod model;
pub mod order;
pub mod ports;
