//! The child-name to child-node container used by every [`Node`](crate::node::Node).
//!
//! Adapted from the teacher crate's `Map`: most folders have zero or one
//! child, so we avoid allocating a hash map until a second child shows up.

use fxhash::FxHashMap;
use std::borrow::Borrow;
use std::hash::Hash;

pub(crate) struct ChildMap<K, V> {
    inner: Inner<K, V>,
}

enum Inner<K, V> {
    Empty,
    One(K, V),
    Map(Box<FxHashMap<K, V>>),
}

impl<K, V> Default for ChildMap<K, V> {
    fn default() -> Self {
        ChildMap {
            inner: Inner::Empty,
        }
    }
}

impl<K, V> ChildMap<K, V>
where
    K: Eq + Hash + Borrow<str>,
{
    pub(crate) fn is_empty(&self) -> bool {
        match &self.inner {
            Inner::Empty => true,
            Inner::One(..) => false,
            Inner::Map(map) => map.is_empty(),
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&V> {
        match &self.inner {
            Inner::Empty => None,
            Inner::One(k, v) => {
                if k.borrow() == name {
                    Some(v)
                } else {
                    None
                }
            }
            Inner::Map(map) => map.get(name),
        }
    }

    /// Inserts `value` under `key`. The caller must have already checked
    /// that `key` is absent.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        match std::mem::replace(&mut self.inner, Inner::Empty) {
            Inner::Empty => self.inner = Inner::One(key, value),
            Inner::One(k0, v0) => {
                let mut map: FxHashMap<K, V> = Default::default();
                map.insert(k0, v0);
                map.insert(key, value);
                self.inner = Inner::Map(Box::new(map));
            }
            Inner::Map(mut map) => {
                map.insert(key, value);
                self.inner = Inner::Map(map);
            }
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<V> {
        match std::mem::replace(&mut self.inner, Inner::Empty) {
            Inner::Empty => None,
            Inner::One(k, v) => {
                if k.borrow() == name {
                    Some(v)
                } else {
                    self.inner = Inner::One(k, v);
                    None
                }
            }
            Inner::Map(mut map) => {
                let removed = map.remove(name);
                self.inner = Inner::Map(map);
                removed
            }
        }
    }

    pub(crate) fn keys(&self) -> Vec<&K> {
        match &self.inner {
            Inner::Empty => Vec::new(),
            Inner::One(k, _) => vec![k],
            Inner::Map(map) => map.keys().collect(),
        }
    }
}
