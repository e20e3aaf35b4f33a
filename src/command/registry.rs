//! Name-keyed registries for commands, component recipes and guild configuration.

use std::{borrow::Borrow, collections::HashMap, hash::Hash, sync::Arc};

use serenity::all::GuildId;
use tokio::sync::RwLock;

use crate::model::{command::CommandRecord, component::BoundRecipe, guild::GuildConfig};

/// Commands keyed by top-level name.
pub type CommandRegistry = Registry<String, CommandRecord>;
/// Component recipes keyed by custom id.
pub type ComponentRegistry = Registry<String, BoundRecipe>;
/// Guild configuration keyed by guild id.
pub type GuildCache = Registry<GuildId, GuildConfig>;

/// Shared map from key to record.
///
/// Cloning is cheap and every clone sees the same entries. Registering an existing key
/// replaces the previous record.
pub struct Registry<K, V> {
    entries: Arc<RwLock<HashMap<K, Arc<V>>>>,
}

impl<K, V> Clone for Registry<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to `value`, returning the record it replaced.
    pub async fn register(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.entries.write().await.insert(key, value)
    }

    /// Binds several records under a single write lock.
    pub async fn register_all(&self, entries: impl IntoIterator<Item = (K, Arc<V>)>) {
        let mut map = self.entries.write().await;
        for (key, value) in entries {
            map.insert(key, value);
        }
    }

    pub async fn lookup<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.read().await.get(key).cloned()
    }

    /// Removes the binding for `key`. Removing an absent key does nothing.
    pub async fn remove<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.write().await.remove(key)
    }

    /// Removes every binding that points at one of `values`, under a single write lock.
    ///
    /// Keys rebound to a different record in the meantime are left alone.
    pub async fn remove_values(&self, values: &[Arc<V>]) -> usize {
        let mut map = self.entries.write().await;
        let before = map.len();
        map.retain(|_, current| !values.iter().any(|value| Arc::ptr_eq(current, value)));
        before - map.len()
    }

    /// Removes every binding whose record matches `predicate`, under a single write lock.
    pub async fn remove_where(&self, predicate: impl Fn(&V) -> bool) -> usize {
        let mut map = self.entries.write().await;
        let before = map.len();
        map.retain(|_, current| !predicate(current));
        before - map.len()
    }

    pub async fn values(&self) -> Vec<Arc<V>> {
        self.entries.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_returns_registered_record() {
        let registry: Registry<String, &'static str> = Registry::new();

        registry.register("hello".to_string(), Arc::new("first")).await;

        assert_eq!(registry.lookup("hello").await.as_deref(), Some(&"first"));
        assert!(registry.lookup("missing").await.is_none());
    }

    #[tokio::test]
    async fn register_replaces_existing_binding() {
        let registry: Registry<String, &'static str> = Registry::new();

        registry.register("hello".to_string(), Arc::new("first")).await;
        let previous = registry.register("hello".to_string(), Arc::new("second")).await;

        assert_eq!(previous.as_deref(), Some(&"first"));
        assert_eq!(registry.lookup("hello").await.as_deref(), Some(&"second"));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn remove_where_drops_matching_records() {
        let registry: Registry<String, u32> = Registry::new();
        registry
            .register_all([
                ("one".to_string(), Arc::new(1)),
                ("two".to_string(), Arc::new(2)),
                ("three".to_string(), Arc::new(3)),
            ])
            .await;

        let removed = registry.remove_where(|value| value % 2 == 1).await;

        assert_eq!(removed, 2);
        assert_eq!(registry.lookup("two").await.as_deref(), Some(&2));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry: Registry<String, &'static str> = Registry::new();
        registry.register("hello".to_string(), Arc::new("first")).await;

        assert!(registry.remove("hello").await.is_some());
        assert!(registry.remove("hello").await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn remove_values_keeps_newer_bindings() {
        let registry: Registry<String, &'static str> = Registry::new();
        let old = Arc::new("old");
        let other = Arc::new("other");
        registry.register("hello".to_string(), old.clone()).await;
        registry.register("other".to_string(), other.clone()).await;
        registry.register("hello".to_string(), Arc::new("new")).await;

        assert_eq!(registry.remove_values(&[old, other]).await, 1);
        assert_eq!(registry.lookup("hello").await.as_deref(), Some(&"new"));
        assert!(registry.lookup("other").await.is_none());
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let registry: Registry<GuildId, &'static str> = Registry::new();
        let clone = registry.clone();

        clone.register(GuildId::new(1), Arc::new("home")).await;

        assert!(registry.lookup(&GuildId::new(1)).await.is_some());
    }
}
