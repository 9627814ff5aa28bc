//! Dispatcher: provider selection, concurrent fan-out, and merging.
//!
//! A [`Dispatcher`] owns the read-only [`ProviderRegistry`] built at startup.
//! For each request it validates the parameters, calls every provider that
//! can answer, and returns `{results, errors}`. Only invalid parameters and
//! an unanswerable capability fail the request as a whole.

mod dispatcher;
mod merge;
mod registry;

pub use dispatcher::{DispatchConfig, DispatchError, Dispatcher};
pub use merge::merge;
pub use registry::{ProviderRegistry, ProviderStatus};
