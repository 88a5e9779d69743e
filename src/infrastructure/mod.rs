//! Adapters implementing the domain ports: the in-memory record store,
//! the HTTP bank transport, and the retry decorator around it.

pub mod bank;
pub mod in_memory;
pub mod retry;
