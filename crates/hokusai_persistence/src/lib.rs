//! Durable storage adapters for the Hokusai storyboard engine.
//!
//! The [`PersistenceAdapter`] trait is the only storage contract the core
//! depends on. [`RestAdapter`] talks to the real backend; [`InMemoryAdapter`]
//! backs tests and offline operation with the same semantics, including the
//! order-sync sequence guard.

mod adapter;
mod memory;
mod rest;

pub use adapter::PersistenceAdapter;
pub use memory::InMemoryAdapter;
pub use rest::RestAdapter;
