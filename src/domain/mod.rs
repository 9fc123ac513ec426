// Domain layer: models and ports. The salary core lives in `crate::salary`.

pub mod model;
pub mod ports;
