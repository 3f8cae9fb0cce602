// Domain layer: entity models and ports (interfaces) to the external store.

pub mod model;
pub mod ports;
