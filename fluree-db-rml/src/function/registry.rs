//! Function registry

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use super::{builtins, AsyncFn, FunctionArgs, MappingFunction};
use crate::error::RmlResult;

/// Function identifier -> callable
///
/// Lookups consult caller-registered functions first and fall back to the
/// built-in library.
#[derive(Clone)]
pub struct FunctionRegistry {
    overrides: HashMap<String, Arc<dyn MappingFunction>>,
    builtins: HashMap<String, Arc<dyn MappingFunction>>,
}

impl FunctionRegistry {
    /// Registry with the built-in library
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            builtins: builtins::library(),
        }
    }

    /// Registry without built-ins
    pub fn empty() -> Self {
        Self {
            overrides: HashMap::new(),
            builtins: HashMap::new(),
        }
    }

    /// Register a function, overriding any built-in with the same identifier
    pub fn register(&mut self, id: impl Into<String>, function: impl MappingFunction + 'static) {
        self.overrides.insert(id.into(), Arc::new(function));
    }

    /// Register a synchronous closure
    pub fn register_fn<F>(&mut self, id: impl Into<String>, function: F)
    where
        F: Fn(&FunctionArgs) -> RmlResult<Value> + Send + Sync + 'static,
    {
        self.register(id, function);
    }

    /// Register a closure returning a future
    pub fn register_async<F, Fut>(&mut self, id: impl Into<String>, function: F)
    where
        F: Fn(FunctionArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RmlResult<Value>> + Send + 'static,
    {
        self.register(id, AsyncFn(function));
    }

    /// Resolve a function identifier
    pub fn lookup(&self, id: &str) -> Option<Arc<dyn MappingFunction>> {
        self.overrides
            .get(id)
            .or_else(|| self.builtins.get(id))
            .cloned()
    }

    /// Check if an identifier resolves
    pub fn contains(&self, id: &str) -> bool {
        self.overrides.contains_key(id) || self.builtins.contains_key(id)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overrides: Vec<_> = self.overrides.keys().collect();
        overrides.sort();
        f.debug_struct("FunctionRegistry")
            .field("overrides", &overrides)
            .field("builtins", &self.builtins.len())
            .finish()
    }
}
