/// Errors from container store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Capacities violate the construction bounds.
    #[error(
        "invalid configuration (container capacity {container_capacity}, \
         storage capacity {storage_capacity}): {reason}"
    )]
    InvalidConfiguration {
        container_capacity: f32,
        storage_capacity: f32,
        reason: &'static str,
    },

    /// A negative (or NaN) amount was passed to `add` or `withdraw`.
    #[error("invalid amount for {operation}: {amount} (must be non-negative)")]
    InvalidArgument {
        operation: &'static str,
        amount: f32,
    },

    /// Every container slot is taken, so a new kind cannot be placed.
    #[error("no room for another container: {in_use} in use, at most {max_containers}")]
    CapacityExceeded { in_use: usize, max_containers: f32 },

    /// Configuration text or file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns `true` if the error was caused by the caller's arguments
    /// rather than by the state of the store.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` if the store ran out of container slots.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
