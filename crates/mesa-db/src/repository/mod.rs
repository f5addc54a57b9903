//! # Repository Layer
//!
//! Row-level database operations. The repository holds no inventory
//! policy; the gateway composes it into the Sync Gateway contract.

pub mod stock;
