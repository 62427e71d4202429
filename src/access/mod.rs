//! Accessor descriptors and their per-type cache

pub mod cache;
pub mod descriptor;

pub use cache::{AccessorCache, AccessorCacheStats, Resolution, ResolveFailure};
pub use descriptor::{AccessFault, AccessorDescriptor, Member, Selector};
