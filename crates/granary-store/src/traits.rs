use crate::error::StoreResult;

/// Storage divided into one capacity-bounded container per item kind.
///
/// All implementations must satisfy these invariants:
/// - A container's fill stays within `0..=container_capacity()`.
/// - At most `storage_capacity() / container_capacity()` containers exist.
/// - An operation that returns `Err` leaves the store unchanged.
/// - Containers are created by `add` and destroyed only by `reclaim_container`.
pub trait ContainerStore<K> {
    /// Maximum quantity a single container may hold.
    fn container_capacity(&self) -> f32;

    /// Maximum quantity across all containers.
    fn storage_capacity(&self) -> f32;

    /// Place up to `amount` of `kind`, allocating its container if needed.
    ///
    /// Returns the leftover that did not fit (0 when fully accepted).
    /// Fails if `amount` is negative, or if `kind` needs a new container and
    /// none is free.
    fn add(&mut self, kind: K, amount: f32) -> StoreResult<f32>;

    /// Remove up to `amount` of `kind` and return what was actually removed.
    ///
    /// Withdrawing a kind without a container returns 0.
    fn withdraw(&mut self, kind: &K, amount: f32) -> StoreResult<f32>;

    /// Release the container of `kind` if it is empty.
    ///
    /// Returns `false` only when the container still holds something.
    fn reclaim_container(&mut self, kind: &K) -> bool;

    /// Current fill of `kind`, or 0 without a container.
    fn amount_of(&self, kind: &K) -> f32;

    /// Remaining room in the container of `kind`, or 0 without a container.
    fn free_space_of(&self, kind: &K) -> f32;

    /// Returns `true` if `kind` currently has a container.
    fn has_container(&self, kind: &K) -> bool;

    /// Returns `true` if `kind` has a container with no room left.
    ///
    /// A kind without a container is never full.
    fn is_full(&self, kind: &K) -> bool {
        self.has_container(kind) && self.free_space_of(kind) <= 0.0
    }
}
