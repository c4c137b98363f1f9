//! Adapters Layer (Driven Adapters)
//!
//! Implementations of driven ports.
//!
//! ## Adapters
//!
//! - `InMemoryLogProvider` - Serves block log infos from memory

pub mod in_memory;

pub use in_memory::InMemoryLogProvider;
