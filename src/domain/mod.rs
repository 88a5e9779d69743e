//! Domain layer: payment entities, validation rules, and the ports
//! (storage and bank authorization) the application core depends on.

pub mod payment;
pub mod ports;
pub mod validation;
