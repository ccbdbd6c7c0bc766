// Domain layer: models and ports (interfaces) shared by the exercises.

pub mod model;
pub mod ports;
