// Domain layer: core models and ports (interfaces). No transport or encoder types here.

pub mod model;
pub mod ports;
