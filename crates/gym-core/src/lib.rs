//! Core types, the repository trait, and the business rules for the gym
//! registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::GymStore`]; transports drive
//! [`service::GymService`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod credential;
pub mod error;
pub mod person;
pub mod service;
pub mod store;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
