//! The two-level dynamic environment: a mutable binding table consulted
//! first, then a read-only ambient map.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rhai::Dynamic;

/// Binding that receives the last settled asynchronous success value.
pub const RESULT_SLOT: &str = "_result";
/// Binding that receives the last settled asynchronous error.
pub const ERROR_SLOT: &str = "_error";

/// The per-invocation name -> value table. Entries persist across
/// evaluations until overwritten, so a script can leave values behind for
/// later scripts in the same session.
#[derive(Clone, Default)]
pub struct Bindings {
    inner: Arc<RwLock<HashMap<String, Dynamic>>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or overwrite a binding.
    pub fn set(&self, name: impl Into<String>, value: Dynamic) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(name.into(), value);
        }
    }

    pub fn get(&self, name: &str) -> Option<Dynamic> {
        self.inner.read().ok().and_then(|map| map.get(name).cloned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().map(|map| map.contains_key(name)).unwrap_or(false)
    }

    pub fn remove(&self, name: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(name);
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// The fallback scope consulted when a name is absent from [`Bindings`].
/// Fixed at session start and read-only afterwards.
#[derive(Clone, Default)]
pub struct Ambient {
    inner: Arc<HashMap<String, Dynamic>>,
}

impl Ambient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: impl Into<String>, value: Dynamic) -> Self {
        let mut map = (*self.inner).clone();
        map.insert(name.into(), value);
        Self { inner: Arc::new(map) }
    }

    pub fn get(&self, name: &str) -> Option<Dynamic> {
        self.inner.get(name).cloned()
    }
}

/// Two-tier lookup: binding table first, ambient second, otherwise
/// unresolved.
pub fn resolve(bindings: &Bindings, ambient: &Ambient, name: &str) -> Option<Dynamic> {
    bindings.get(name).or_else(|| ambient.get(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_set_overwrites_earlier() {
        let bindings = Bindings::new();
        bindings.set("x", Dynamic::from(1_i64));
        bindings.set("x", Dynamic::from(2_i64));
        assert_eq!(bindings.get("x").unwrap().as_int().unwrap(), 2);
    }

    #[test]
    fn bindings_shadow_ambient() {
        let bindings = Bindings::new();
        bindings.set("x", Dynamic::from(1_i64));
        let ambient = Ambient::new()
            .with("x", Dynamic::from(10_i64))
            .with("y", Dynamic::from(20_i64));

        assert_eq!(resolve(&bindings, &ambient, "x").unwrap().as_int().unwrap(), 1);
        assert_eq!(resolve(&bindings, &ambient, "y").unwrap().as_int().unwrap(), 20);
        assert!(resolve(&bindings, &ambient, "z").is_none());
    }

    #[test]
    fn clones_share_the_same_table() {
        let bindings = Bindings::new();
        let alias = bindings.clone();
        alias.set("shared", Dynamic::from(true));
        assert!(bindings.contains("shared"));
        bindings.remove("shared");
        assert!(!alias.contains("shared"));
    }
}
