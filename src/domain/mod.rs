// Domain layer: provider records, race outcome and the ports the core depends on.

pub mod model;
pub mod ports;
