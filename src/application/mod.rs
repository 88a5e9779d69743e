//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `PaymentProcessor`, the primary entry point
//! for processing payments. It owns the storage and bank ports and
//! sequences validation, record creation, authorization, and the final
//! state transition per payment.

pub mod processor;
