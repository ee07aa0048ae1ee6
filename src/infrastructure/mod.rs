//! Infrastructure layer - credential hashing, stores, storage wiring and observability

pub mod account;
pub mod logging;
pub mod observability;
pub mod storage;
