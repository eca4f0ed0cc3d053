//=========================================================================
// Registry
//=========================================================================
//
// Type-keyed holder for extra manager objects owned by the GameContext.
//
// Architecture:
//   get_or_create<T>(factory) ─→ HashMap<TypeId, Box<dyn Any>>
//                                    └─ one instance per concrete type
//
// Lives on the logic thread with the rest of the context, so entries
// need not be Send.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use log::{debug, warn};

//=== Registry ============================================================

/// At most one instance per type, created on first request.
///
/// # Example
///
/// ```rust
/// use game_flow::prelude::*;
///
/// #[derive(Default)]
/// struct Achievements {
///     unlocked: Vec<&'static str>,
/// }
///
/// let mut registry = Registry::new();
/// registry
///     .get_or_create(Achievements::default)
///     .unlocked
///     .push("first_blood");
///
/// assert_eq!(registry.get::<Achievements>().unwrap().unlocked.len(), 1);
/// ```
#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeId, Box<dyn Any>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Insertion --------------------------------------------------------

    /// Returns the `T` instance, constructing it with `factory` if absent.
    pub fn get_or_create<T: 'static>(&mut self, factory: impl FnOnce() -> T) -> &mut T {
        self.entries
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!(target: "core", "Registry: created {}", type_name::<T>());
                Box::new(factory())
            })
            .downcast_mut::<T>()
            .expect("Type mismatch in Registry entry")
    }

    /// Installs `instance` unless a `T` already exists.
    ///
    /// A duplicate is dropped and the existing instance is returned.
    pub fn register<T: 'static>(&mut self, instance: T) -> &mut T {
        let type_id = TypeId::of::<T>();

        if self.entries.contains_key(&type_id) {
            warn!(
                target: "core",
                "Registry: {} already registered, dropping duplicate",
                type_name::<T>()
            );
            drop(instance);
        } else {
            self.entries.insert(type_id, Box::new(instance));
        }

        self.get_mut::<T>().expect("Registry entry missing after insert")
    }

    /// Removes and returns the `T` instance.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    //--- Query API --------------------------------------------------------

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_mut::<T>())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("len", &self.entries.len()).finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
