use std::{
    any::Any,
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use log::debug;

use crate::{
    state_manager::{AdapterOptions, StateManager},
    store::Container,
};

struct RegistryEntry {
    container: Weak<dyn Any>,
    manager: Rc<dyn StateManager>,
}

impl RegistryEntry {
    /// The adapter holds one strong reference to its container. Once that is
    /// the only one left nobody can look the container up again, so the
    /// entry is dead.
    fn is_reachable(&self) -> bool {
        self.container.strong_count() > 1
    }
}

thread_local! {
    static STATE_MANAGERS: RefCell<HashMap<usize, RegistryEntry>> = RefCell::new(HashMap::new());
}

/// Returns the adapter cached for `container`, creating and caching one if
/// needed. Lookup is by container identity, so repeated calls against the
/// same container share one adapter (and one subscription to it). `options`
/// only apply when a new adapter is created.
pub fn get_state_manager(container: &Container, options: AdapterOptions) -> Rc<dyn StateManager> {
    let key = container.identity();

    let (manager, evicted) = STATE_MANAGERS.with(|registry| {
        let mut registry = registry.borrow_mut();
        let evicted = sweep(&mut registry);

        let manager = match registry.get(&key) {
            Some(entry) => entry.manager.clone(),
            None => {
                debug!("creating state manager for container {:#x}", key);
                let manager = container.create_manager(options);
                registry.insert(
                    key,
                    RegistryEntry {
                        container: container.downgrade(),
                        manager: manager.clone(),
                    },
                );
                manager
            }
        };
        (manager, evicted)
    });

    // adapters are dropped outside the registry borrow
    drop(evicted);
    manager
}

/// Forgets the adapter cached for `container`. Returns false if there was
/// none.
pub fn remove_state_manager(container: &Container) -> bool {
    let removed = STATE_MANAGERS.with(|registry| registry.borrow_mut().remove(&container.identity()));
    removed.is_some()
}

/// Whether an adapter is currently cached for `container`. Dead entries are
/// evicted first.
pub fn has_state_manager(container: &Container) -> bool {
    let key = container.identity();
    let (cached, evicted) = STATE_MANAGERS.with(|registry| {
        let mut registry = registry.borrow_mut();
        let evicted = sweep(&mut registry);
        (registry.contains_key(&key), evicted)
    });
    drop(evicted);
    cached
}

/// Number of cached adapters whose container is still reachable. Dead
/// entries are evicted first.
pub fn state_manager_count() -> usize {
    let (count, evicted) = STATE_MANAGERS.with(|registry| {
        let mut registry = registry.borrow_mut();
        let evicted = sweep(&mut registry);
        (registry.len(), evicted)
    });
    drop(evicted);
    count
}

fn sweep(registry: &mut HashMap<usize, RegistryEntry>) -> Vec<RegistryEntry> {
    let dead: Vec<usize> = registry
        .iter()
        .filter(|(_, entry)| !entry.is_reachable())
        .map(|(key, _)| *key)
        .collect();

    dead.into_iter()
        .filter_map(|key| {
            debug!("evicting state manager for unreachable container {:#x}", key);
            registry.remove(&key)
        })
        .collect()
}
