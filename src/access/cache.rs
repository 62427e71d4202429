//! Accessor descriptor cache
//!
//! The first time a runtime type is met its capabilities are probed (sequence,
//! then mapping, then record) and remembered. Descriptors are then resolved
//! lazily per segment shape and cached under the type name.
//!
//! Storage is two levels of `DashMap`, so resolutions for unrelated types never
//! contend. Two threads racing on the first resolution of the same pair both
//! build an equivalent descriptor and the later insert wins.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::descriptor::AccessorDescriptor;
use crate::model::{AttributeInfo, AttributeKind, Value, ValueType};
use crate::parser::Segment;

/// Why no descriptor exists for a segment on a runtime type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    /// The type does not support this kind of segment
    Unsupported,
    /// The type is record-like but declares no such attribute
    Undeclared,
    /// A case-insensitive match found several attributes
    Ambiguous(Vec<String>),
}

/// Outcome of resolving one segment shape on one runtime type
pub type Resolution = Result<Arc<AccessorDescriptor>, ResolveFailure>;

/// What a runtime type turned out to be on first encounter
#[derive(Debug, Clone)]
enum Capability {
    Sequence { element_type: ValueType, writable: bool },
    Mapping { value_type: ValueType, writable: bool },
    Record { attributes: Vec<AttributeInfo> },
    Opaque,
}

impl Capability {
    fn probe(value: &Value) -> Self {
        if let Some(sequence) = value.as_sequence() {
            Capability::Sequence {
                element_type: sequence.element_type(),
                writable: !sequence.is_read_only(),
            }
        } else if let Some(mapping) = value.as_mapping() {
            Capability::Mapping {
                value_type: mapping.value_type(),
                writable: !mapping.is_read_only(),
            }
        } else if let Some(record) = value.as_record() {
            Capability::Record {
                attributes: record.attributes().to_vec(),
            }
        } else {
            Capability::Opaque
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ContainerShape {
    Index,
    Key,
}

/// Everything learned about one runtime type
#[derive(Debug)]
struct TypeAccessors {
    type_name: Arc<str>,
    capability: Capability,
    exact: DashMap<String, Resolution>,
    folded: DashMap<String, Resolution>,
    containers: DashMap<ContainerShape, Resolution>,
}

impl TypeAccessors {
    fn new(type_name: &str, capability: Capability) -> Self {
        Self {
            type_name: Arc::from(type_name),
            capability,
            exact: DashMap::new(),
            folded: DashMap::new(),
            containers: DashMap::new(),
        }
    }

    fn descriptor_count(&self) -> usize {
        self.exact.len() + self.folded.len() + self.containers.len()
    }

    fn resolve_attribute(&self, name: &str, case_insensitive: bool) -> Resolution {
        match &self.capability {
            Capability::Mapping {
                value_type,
                writable,
            } => Ok(self.entry(value_type, *writable)),
            Capability::Record { attributes } => {
                let info = find_attribute(attributes, name, case_insensitive)?;
                Ok(Arc::new(AccessorDescriptor::attribute(
                    Arc::clone(&self.type_name),
                    Arc::clone(&info.name),
                    info.value_type.clone(),
                    info.writable,
                )))
            }
            Capability::Sequence { .. } | Capability::Opaque => Err(ResolveFailure::Unsupported),
        }
    }

    fn resolve_container(&self, shape: ContainerShape) -> Resolution {
        match (&self.capability, shape) {
            (
                Capability::Sequence {
                    element_type,
                    writable,
                },
                ContainerShape::Index,
            ) => Ok(Arc::new(AccessorDescriptor::element(
                Arc::clone(&self.type_name),
                element_type.clone(),
                *writable,
            ))),
            (
                Capability::Mapping {
                    value_type,
                    writable,
                },
                _,
            ) => Ok(self.entry(value_type, *writable)),
            _ => Err(ResolveFailure::Unsupported),
        }
    }

    fn entry(&self, value_type: &ValueType, writable: bool) -> Arc<AccessorDescriptor> {
        Arc::new(AccessorDescriptor::entry(
            Arc::clone(&self.type_name),
            value_type.clone(),
            writable,
        ))
    }
}

// One lookup tier: an exact match, or a unique case-insensitive one.
fn match_tier<'a>(
    attributes: &'a [AttributeInfo],
    kind: AttributeKind,
    name: &str,
    exact: bool,
) -> Result<Option<&'a AttributeInfo>, ResolveFailure> {
    let mut matches = attributes.iter().filter(|info| {
        info.kind == kind
            && if exact {
                &*info.name == name
            } else {
                info.name.eq_ignore_ascii_case(name)
            }
    });
    let Some(first) = matches.next() else {
        return Ok(None);
    };
    let rest: Vec<&AttributeInfo> = matches.collect();
    if rest.is_empty() {
        return Ok(Some(first));
    }
    let mut candidates: Vec<String> = std::iter::once(first)
        .chain(rest)
        .map(|info| info.name.to_string())
        .collect();
    candidates.sort();
    Err(ResolveFailure::Ambiguous(candidates))
}

/// Exact spelling before case-insensitive; within each, properties before fields.
fn find_attribute<'a>(
    attributes: &'a [AttributeInfo],
    name: &str,
    case_insensitive: bool,
) -> Result<&'a AttributeInfo, ResolveFailure> {
    let kinds = [AttributeKind::Property, AttributeKind::Field];
    for kind in kinds {
        if let Some(info) = match_tier(attributes, kind, name, true)? {
            return Ok(info);
        }
    }
    if case_insensitive {
        for kind in kinds {
            if let Some(info) = match_tier(attributes, kind, name, false)? {
                return Ok(info);
            }
        }
    }
    Err(ResolveFailure::Undeclared)
}

/// Statistics about the accessor cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorCacheStats {
    /// Resolutions answered from the cache
    pub hits: u64,
    /// Resolutions that had to build a descriptor
    pub misses: u64,
    /// Runtime types probed so far
    pub types: usize,
    /// Cached resolutions, failures included
    pub descriptors: usize,
}

/// Thread-safe cache of accessor descriptors keyed by runtime type name.
///
/// Owned by one navigator by default; hand the same `Arc<AccessorCache>` to
/// several navigators to share what was learned between them.
///
/// Built-in values and user [`Navigable`](crate::model::Navigable) types are
/// cached apart, so a user type may report a name such as `Map`.
#[derive(Debug, Default)]
pub struct AccessorCache {
    builtins: DashMap<String, Arc<TypeAccessors>>,
    types: DashMap<String, Arc<TypeAccessors>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AccessorCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn type_accessors(&self, value: &Value) -> Arc<TypeAccessors> {
        let type_name = value.type_name();
        let types = match value {
            Value::Object(_) => &self.types,
            _ => &self.builtins,
        };
        if let Some(accessors) = types.get(type_name) {
            return Arc::clone(accessors.value());
        }
        let entry = types.entry(type_name.to_string()).or_insert_with(|| {
            let capability = Capability::probe(value);
            log::debug!("probed runtime type `{type_name}`: {capability:?}");
            Arc::new(TypeAccessors::new(type_name, capability))
        });
        Arc::clone(entry.value())
    }

    /// Resolve the descriptor for `segment` on the runtime type of `value`.
    ///
    /// Failures are cached too: a type that lacks an attribute keeps lacking it.
    /// Function segments are not resolved here and report
    /// [`ResolveFailure::Unsupported`].
    pub fn resolve(&self, value: &Value, segment: &Segment, case_insensitive: bool) -> Resolution {
        let accessors = self.type_accessors(value);
        match segment {
            Segment::Attribute(name) => {
                let map = if case_insensitive {
                    &accessors.folded
                } else {
                    &accessors.exact
                };
                self.cached(map, &**name, || {
                    accessors.resolve_attribute(name, case_insensitive)
                })
            }
            Segment::Index(_) => self.cached(&accessors.containers, &ContainerShape::Index, || {
                accessors.resolve_container(ContainerShape::Index)
            }),
            Segment::Key(_) => self.cached(&accessors.containers, &ContainerShape::Key, || {
                accessors.resolve_container(ContainerShape::Key)
            }),
            Segment::Function { .. } => Err(ResolveFailure::Unsupported),
        }
    }

    fn cached<K, Q>(
        &self,
        map: &DashMap<K, Resolution>,
        key: &Q,
        build: impl FnOnce() -> Resolution,
    ) -> Resolution
    where
        K: Borrow<Q> + Hash + Eq,
        Q: ToOwned<Owned = K> + Hash + Eq + ?Sized,
    {
        if let Some(resolution) = map.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return resolution.value().clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let resolution = build();
        log::trace!("resolved accessor: {resolution:?}");
        map.insert(key.to_owned(), resolution.clone());
        resolution
    }

    /// Number of cached resolutions across all types
    pub fn len(&self) -> usize {
        self.builtins
            .iter()
            .chain(self.types.iter())
            .map(|entry| entry.value().descriptor_count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every probed type and descriptor, and reset statistics
    pub fn clear(&self) {
        self.builtins.clear();
        self.types.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> AccessorCacheStats {
        AccessorCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            types: self.builtins.len() + self.types.len(),
            descriptors: self.len(),
        }
    }
}
