//! Per-worker handle registry.
//!
//! Each worker owns one registry mapping handles to its local factory
//! copies. Resolution never leaves the worker.

use rustc_hash::FxHashMap;

use crate::error::{EngineError, Result};
use crate::factory::Factory;
use crate::handle::FactoryHandle;

/// Maps the handles of one pool to this worker's factories.
#[derive(Debug)]
pub struct Registry {
    pool: u32,
    factories: FxHashMap<FactoryHandle, Factory>,
}

impl Registry {
    /// Creates an empty registry for a pool.
    #[must_use]
    pub fn new(pool: u32) -> Self {
        Self {
            pool,
            factories: FxHashMap::default(),
        }
    }

    /// Returns the pool this registry belongs to.
    #[must_use]
    pub fn pool(&self) -> u32 {
        self.pool
    }

    /// Installs a factory under a handle issued elsewhere in the pool.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle belongs to another pool.
    pub fn install(&mut self, handle: FactoryHandle, factory: Factory) -> Result<()> {
        if handle.pool() != self.pool {
            return Err(EngineError::DanglingHandle(handle));
        }
        self.factories.insert(handle, factory);
        Ok(())
    }

    /// Resolves a handle to this worker's factory.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle is unknown here.
    pub fn resolve(&self, handle: FactoryHandle) -> Result<&Factory> {
        self.factories
            .get(&handle)
            .ok_or(EngineError::DanglingHandle(handle))
    }

    /// Resolves a handle to this worker's factory, mutably.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle is unknown here.
    pub fn resolve_mut(&mut self, handle: FactoryHandle) -> Result<&mut Factory> {
        self.factories
            .get_mut(&handle)
            .ok_or(EngineError::DanglingHandle(handle))
    }

    /// Removes a factory, invalidating its handle.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle is unknown here.
    pub fn release(&mut self, handle: FactoryHandle) -> Result<Factory> {
        self.factories
            .remove(&handle)
            .ok_or(EngineError::DanglingHandle(handle))
    }

    /// Drops every factory.
    pub fn clear(&mut self) {
        self.factories.clear();
    }

    /// Returns the number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::FusionTable;

    #[test]
    fn test_install_resolve_release() {
        let mut registry = Registry::new(7);
        let handle = FactoryHandle::new(7, 0);
        registry
            .install(handle, Factory::from_table(FusionTable::cyclic(2)).unwrap())
            .unwrap();

        assert_eq!(registry.resolve(handle).map(Factory::num_vars).ok(), Some(1));

        registry.release(handle).unwrap();
        assert!(matches!(
            registry.resolve(handle),
            Err(EngineError::DanglingHandle(h)) if h == handle
        ));
    }

    #[test]
    fn test_install_rejects_foreign_pool() {
        let mut registry = Registry::new(3);
        let foreign = FactoryHandle::new(4, 0);
        let result = registry.install(foreign, Factory::from_table(FusionTable::trivial()).unwrap());
        assert!(matches!(result, Err(EngineError::DanglingHandle(_))));

        let own = FactoryHandle::new(3, 5);
        registry
            .install(own, Factory::from_table(FusionTable::trivial()).unwrap())
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve(own).is_ok());
    }
}
