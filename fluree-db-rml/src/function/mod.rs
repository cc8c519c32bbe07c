//! Mapping functions
//!
//! Function values in a mapping name a function by IRI and supply its
//! arguments as predicate-object pairs. This module provides the callable
//! contract ([`MappingFunction`]), the argument bag ([`FunctionArgs`]) and
//! the registry combining caller overrides with the built-in library.

mod args;
mod builtins;
mod registry;

pub use args::FunctionArgs;
pub use registry::FunctionRegistry;

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RmlResult;

/// A callable referenced from a function value
///
/// Implemented for every `Fn(&FunctionArgs) -> RmlResult<Value>`; wrap
/// asynchronous closures with [`AsyncFn`].
#[async_trait]
pub trait MappingFunction: Send + Sync {
    /// Invoke the function
    async fn call(&self, args: FunctionArgs) -> RmlResult<Value>;
}

#[async_trait]
impl<F> MappingFunction for F
where
    F: Fn(&FunctionArgs) -> RmlResult<Value> + Send + Sync,
{
    async fn call(&self, args: FunctionArgs) -> RmlResult<Value> {
        self(&args)
    }
}

/// Adapter for closures returning a future
pub struct AsyncFn<F>(pub F);

#[async_trait]
impl<F, Fut> MappingFunction for AsyncFn<F>
where
    F: Fn(FunctionArgs) -> Fut + Send + Sync,
    Fut: Future<Output = RmlResult<Value>> + Send + 'static,
{
    async fn call(&self, args: FunctionArgs) -> RmlResult<Value> {
        (self.0)(args).await
    }
}
