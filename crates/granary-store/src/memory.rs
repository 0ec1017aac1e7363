use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::ContainerStore;

/// In-memory store of one capacity-bounded container per item kind.
///
/// Containers are entries in a `HashMap` from kind to fill level. An entry
/// is created on the first `add` of a kind and removed by
/// `reclaim_container` once empty. The store is single-threaded: mutating
/// operations take `&mut self`, and sharing it across threads requires an
/// external lock.
pub struct BoundedMultiContainerStore<K> {
    container_capacity: f32,
    storage_capacity: f32,
    max_containers: f32,
    contents: HashMap<K, f32>,
}

impl<K: Eq + Hash> BoundedMultiContainerStore<K> {
    /// Create an empty store.
    ///
    /// Fails with [`StoreError::InvalidConfiguration`] if `container_capacity`
    /// is negative or `storage_capacity` is below it.
    pub fn new(container_capacity: f32, storage_capacity: f32) -> StoreResult<Self> {
        Self::from_config(&StoreConfig::new(container_capacity, storage_capacity))
    }

    /// Create an empty store from a config value.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        // 0/0 would be NaN and compare false against every count.
        let max_containers = if config.container_capacity == 0.0 {
            f32::INFINITY
        } else {
            config.storage_capacity / config.container_capacity
        };
        Ok(Self {
            container_capacity: config.container_capacity,
            storage_capacity: config.storage_capacity,
            max_containers,
            contents: HashMap::new(),
        })
    }

    /// Upper bound on the number of containers. Not rounded.
    pub fn max_containers(&self) -> f32 {
        self.max_containers
    }

    /// Number of containers currently allocated.
    pub fn container_count(&self) -> usize {
        self.contents.len()
    }

    /// Returns `true` if no containers are allocated.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Sum of the fills of all containers.
    pub fn total_amount(&self) -> f32 {
        self.contents.values().sum()
    }

    /// Iterate over allocated containers and their fills, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f32)> {
        self.contents.iter().map(|(kind, fill)| (kind, *fill))
    }

    fn check_amount(operation: &'static str, amount: f32) -> StoreResult<()> {
        if amount >= 0.0 {
            Ok(())
        } else {
            debug!(operation, amount, "rejected amount");
            Err(StoreError::InvalidArgument { operation, amount })
        }
    }
}

impl<K: Ord + Clone + Hash> BoundedMultiContainerStore<K> {
    /// All allocated containers and their fills, sorted by kind.
    pub fn snapshot(&self) -> Vec<(K, f32)> {
        let mut entries: Vec<(K, f32)> = self
            .contents
            .iter()
            .map(|(kind, fill)| (kind.clone(), *fill))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl<K: Eq + Hash + fmt::Debug> ContainerStore<K> for BoundedMultiContainerStore<K> {
    fn container_capacity(&self) -> f32 {
        self.container_capacity
    }

    fn storage_capacity(&self) -> f32 {
        self.storage_capacity
    }

    fn add(&mut self, kind: K, amount: f32) -> StoreResult<f32> {
        Self::check_amount("add", amount)?;
        let capacity = self.container_capacity;
        let max_containers = self.max_containers;
        let in_use = self.contents.len();

        let fill = match self.contents.entry(kind) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                if in_use as f32 >= max_containers {
                    debug!(kind = ?entry.key(), in_use, max_containers, "no free container slot");
                    return Err(StoreError::CapacityExceeded {
                        in_use,
                        max_containers,
                    });
                }
                debug!(kind = ?entry.key(), in_use = in_use + 1, "allocated container");
                entry.insert(0.0)
            }
        };

        let available = capacity - *fill;
        let accepted = if amount >= available {
            // Pin to capacity so rounding cannot leave a sliver of free space.
            *fill = capacity;
            available
        } else {
            *fill = (*fill + amount).min(capacity);
            amount
        };
        trace!(fill = *fill, accepted, "added to container");
        Ok(amount - accepted)
    }

    fn withdraw(&mut self, kind: &K, amount: f32) -> StoreResult<f32> {
        Self::check_amount("withdraw", amount)?;
        let Some(fill) = self.contents.get_mut(kind) else {
            return Ok(0.0);
        };
        let removed = (*fill).min(amount);
        *fill -= removed;
        trace!(kind = ?kind, fill = *fill, removed, "withdrew from container");
        Ok(removed)
    }

    fn reclaim_container(&mut self, kind: &K) -> bool {
        let fill = match self.contents.get(kind) {
            Some(fill) => *fill,
            None => return true,
        };
        if fill != 0.0 {
            return false;
        }
        self.contents.remove(kind);
        debug!(kind = ?kind, in_use = self.contents.len(), "reclaimed container");
        true
    }

    fn amount_of(&self, kind: &K) -> f32 {
        self.contents.get(kind).copied().unwrap_or(0.0)
    }

    fn free_space_of(&self, kind: &K) -> f32 {
        self.contents
            .get(kind)
            .map(|fill| self.container_capacity - fill)
            .unwrap_or(0.0)
    }

    fn has_container(&self, kind: &K) -> bool {
        self.contents.contains_key(kind)
    }
}

impl<K: Ord + Clone + Hash + fmt::Display> fmt::Display for BoundedMultiContainerStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedMultiContainerStore(storage={{")?;
        for (i, (kind, fill)) in self.snapshot().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind}={fill}")?;
        }
        write!(f, "}})")
    }
}

impl<K> fmt::Debug for BoundedMultiContainerStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedMultiContainerStore")
            .field("container_capacity", &self.container_capacity)
            .field("storage_capacity", &self.storage_capacity)
            .field("container_count", &self.contents.len())
            .finish()
    }
}
