// Domain layer: the submission model and the ports the dispatcher and web host talk through.

pub mod model;
pub mod ports;
