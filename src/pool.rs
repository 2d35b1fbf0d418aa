//! Named concurrency limits.
//!
//! Pools only record a depth; enforcing it is left to whatever schedules the
//! build.

use std::num::NonZeroUsize;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::DeclarationError;
use crate::handle::Owner;

/// Reserved name of the built-in pool that serialises console steps.
pub const CONSOLE_POOL_NAME: &str = "console";

/// Handle to a [`Pool`] owned by a [`PoolRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId {
    owner: Owner,
    index: usize,
}

impl PoolId {
    /// Position of the pool in declaration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// A named upper bound on concurrently running steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    name: String,
    depth: NonZeroUsize,
}

impl Pool {
    /// Pool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of steps from this pool that may run at once.
    #[must_use]
    pub const fn depth(&self) -> NonZeroUsize {
        self.depth
    }
}

/// Name-keyed pool table.
#[derive(Debug, Clone)]
pub struct PoolRegistry {
    owner: Owner,
    pools: IndexMap<String, Pool>,
}

impl PoolRegistry {
    /// Create a registry holding only the `console` pool at depth 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_owner(Owner::fresh())
    }

    pub(crate) fn with_owner(owner: Owner) -> Self {
        let mut pools = IndexMap::new();
        pools.insert(
            CONSOLE_POOL_NAME.to_owned(),
            Pool {
                name: CONSOLE_POOL_NAME.to_owned(),
                depth: NonZeroUsize::MIN,
            },
        );
        Self { owner, pools }
    }

    const fn id(&self, index: usize) -> PoolId {
        PoolId {
            owner: self.owner,
            index,
        }
    }

    /// Handle of the built-in `console` pool.
    #[must_use]
    pub const fn console(&self) -> PoolId {
        self.id(0)
    }

    /// Declare a new pool.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::InvalidPoolDepth`] for a zero depth and
    /// [`DeclarationError::DuplicatePool`] when the name is taken. Neither
    /// leaves anything registered.
    pub fn declare(&mut self, name: &str, depth: usize) -> Result<PoolId, DeclarationError> {
        let Some(depth) = NonZeroUsize::new(depth) else {
            return Err(DeclarationError::InvalidPoolDepth {
                name: name.to_owned(),
                depth,
            });
        };
        let owner = self.owner;
        match self.pools.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(DeclarationError::DuplicatePool {
                name: name.to_owned(),
            }),
            Entry::Vacant(entry) => {
                let id = PoolId {
                    owner,
                    index: entry.index(),
                };
                tracing::debug!(pool = name, depth = depth.get(), "declared pool");
                entry.insert(Pool {
                    name: name.to_owned(),
                    depth,
                });
                Ok(id)
            }
        }
    }

    /// Find a pool by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<PoolId> {
        self.pools.get_index_of(name).map(|index| self.id(index))
    }

    /// Pool behind `id`, if this registry minted it.
    #[must_use]
    pub fn get(&self, id: PoolId) -> Option<&Pool> {
        if id.owner != self.owner {
            return None;
        }
        self.pools.get_index(id.index).map(|(_, pool)| pool)
    }

    /// Iterate pools in declaration order, `console` first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (PoolId, &Pool)> + '_ {
        self.pools
            .values()
            .enumerate()
            .map(|(index, pool)| (self.id(index), pool))
    }

    /// Number of pools, including `console`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Always false: the `console` pool is present from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
