//! Adapters: concrete implementations of the ports.

pub mod ai;
pub mod http;
pub mod postgres;
pub mod reviews;
