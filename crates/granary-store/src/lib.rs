//! Bounded multi-container storage for Granary.
//!
//! A store is a facility of fixed total capacity divided into containers of
//! fixed capacity. Each item kind gets at most one container, allocated
//! lazily on the first addition of that kind and released only when it is
//! explicitly reclaimed while empty.
//!
//! # Storage Backends
//!
//! All backends implement the [`ContainerStore`] trait:
//!
//! - [`BoundedMultiContainerStore`] -- `HashMap`-based store, generic over the item kind
//!
//! # Design Rules
//!
//! 1. A container never holds more than the container capacity, nor less than zero.
//! 2. The number of containers never exceeds `storage_capacity / container_capacity`.
//! 3. Capacities are validated once, at construction.
//! 4. Failed operations leave the store unchanged.
//! 5. Withdrawing from or reclaiming an absent container is not an error.
//! 6. The store does no locking; callers sharing it across threads wrap it.

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::BoundedMultiContainerStore;
pub use traits::ContainerStore;
