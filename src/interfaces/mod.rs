//! Inbound/outbound adapters for the embedding application.

pub mod csv;
