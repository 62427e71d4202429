//! Accessor descriptors
//!
//! A descriptor is the cached answer to "how do I read or write this kind of
//! segment on this runtime type". Getter, slot and setter are plain function
//! pointers chosen when the descriptor is built; the per-access part (which
//! index, which key) arrives with each call.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::model::{Value, ValueType};
use crate::parser::Segment;

/// What a descriptor gives access to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    /// A record attribute, by its declared (canonical) name
    Attribute(Arc<str>),
    /// Any element of a sequence
    Element,
    /// Any entry of a mapping
    Entry,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Attribute(name) => f.write_str(name),
            Member::Element => f.write_str("element"),
            Member::Entry => f.write_str("entry"),
        }
    }
}

/// Per-access selector handed to getters and setters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<'s> {
    Name(&'s str),
    Index(usize),
    Key(Cow<'s, str>),
}

/// Why an access through a valid descriptor did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessFault {
    /// No value under this key or attribute
    Missing,
    /// Index past the end of the sequence
    OutOfRange { index: usize, len: usize },
    /// The target does not accept writes
    ReadOnly,
    /// The value does not have the shape the descriptor was built for
    KindMismatch,
}

pub(crate) type Getter = for<'v> fn(&'v Value, &Selector<'_>) -> Result<Cow<'v, Value>, AccessFault>;
pub(crate) type SlotFn = for<'v> fn(&'v mut Value, &Selector<'_>) -> Result<&'v mut Value, AccessFault>;
pub(crate) type Setter = fn(&mut Value, &Selector<'_>, Value, bool) -> Result<(), AccessFault>;

/// Cached read/write handle for one (runtime type, segment shape) pair.
///
/// Never mutated after creation. Index and key descriptors are shared by every
/// index or key of their type; bounds and presence are checked per access.
#[derive(Clone)]
pub struct AccessorDescriptor {
    type_name: Arc<str>,
    member: Member,
    declared_type: ValueType,
    getter: Getter,
    slot: SlotFn,
    setter: Option<Setter>,
}

impl AccessorDescriptor {
    pub(crate) fn attribute(
        type_name: Arc<str>,
        name: Arc<str>,
        declared_type: ValueType,
        writable: bool,
    ) -> Self {
        Self {
            type_name,
            member: Member::Attribute(name),
            declared_type,
            getter: record_get,
            slot: record_slot,
            setter: writable.then_some(record_set as Setter),
        }
    }

    pub(crate) fn element(type_name: Arc<str>, declared_type: ValueType, writable: bool) -> Self {
        Self {
            type_name,
            member: Member::Element,
            declared_type,
            getter: sequence_get,
            slot: sequence_slot,
            setter: writable.then_some(sequence_set as Setter),
        }
    }

    pub(crate) fn entry(type_name: Arc<str>, declared_type: ValueType, writable: bool) -> Self {
        Self {
            type_name,
            member: Member::Entry,
            declared_type,
            getter: mapping_get,
            slot: mapping_slot,
            setter: writable.then_some(mapping_set as Setter),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Type values written through this descriptor are converted to
    pub fn declared_type(&self) -> &ValueType {
        &self.declared_type
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    fn selector<'s>(&'s self, segment: &'s Segment) -> Result<Selector<'s>, AccessFault> {
        match (&self.member, segment) {
            (Member::Attribute(name), Segment::Attribute(_)) => Ok(Selector::Name(name)),
            (Member::Element, Segment::Index(index)) => Ok(Selector::Index(*index)),
            (Member::Entry, Segment::Index(index)) => Ok(Selector::Key(Cow::Owned(index.to_string()))),
            (Member::Entry, Segment::Key(key) | Segment::Attribute(key)) => {
                Ok(Selector::Key(Cow::Borrowed(key)))
            }
            _ => Err(AccessFault::KindMismatch),
        }
    }

    /// Read the member selected by `segment`
    pub fn read<'v>(&self, target: &'v Value, segment: &Segment) -> Result<Cow<'v, Value>, AccessFault> {
        (self.getter)(target, &self.selector(segment)?)
    }

    /// Mutable access to the stored member, for descending during writes.
    ///
    /// Read-only attributes with storage can still be descended into; only
    /// replacing them requires a setter.
    pub fn slot_mut<'v>(&self, target: &'v mut Value, segment: &Segment) -> Result<&'v mut Value, AccessFault> {
        (self.slot)(target, &self.selector(segment)?)
    }

    /// Replace (or insert) the member selected by `segment`.
    ///
    /// With `grow` set, a sequence index equal to the current length appends.
    pub fn write(&self, target: &mut Value, segment: &Segment, value: Value, grow: bool) -> Result<(), AccessFault> {
        let setter = self.setter.ok_or(AccessFault::ReadOnly)?;
        setter(target, &self.selector(segment)?, value, grow)
    }
}

impl fmt::Debug for AccessorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorDescriptor")
            .field("type_name", &self.type_name)
            .field("member", &self.member)
            .field("declared_type", &self.declared_type)
            .field("writable", &self.is_writable())
            .finish()
    }
}

fn record_get<'v>(target: &'v Value, selector: &Selector<'_>) -> Result<Cow<'v, Value>, AccessFault> {
    let (Selector::Name(name), Some(record)) = (selector, target.as_record()) else {
        return Err(AccessFault::KindMismatch);
    };
    record.attribute(name).ok_or(AccessFault::Missing)
}

fn record_slot<'v>(target: &'v mut Value, selector: &Selector<'_>) -> Result<&'v mut Value, AccessFault> {
    let (Selector::Name(name), Some(record)) = (selector, target.as_record_mut()) else {
        return Err(AccessFault::KindMismatch);
    };
    // computed properties have no storage
    record.attribute_mut(name).ok_or(AccessFault::ReadOnly)
}

fn record_set(target: &mut Value, selector: &Selector<'_>, value: Value, _grow: bool) -> Result<(), AccessFault> {
    *record_slot(target, selector)? = value;
    Ok(())
}

fn sequence_get<'v>(target: &'v Value, selector: &Selector<'_>) -> Result<Cow<'v, Value>, AccessFault> {
    let (Selector::Index(index), Some(sequence)) = (selector, target.as_sequence()) else {
        return Err(AccessFault::KindMismatch);
    };
    sequence.get(*index).map(Cow::Borrowed).ok_or(AccessFault::OutOfRange {
        index: *index,
        len: sequence.len(),
    })
}

fn sequence_slot<'v>(target: &'v mut Value, selector: &Selector<'_>) -> Result<&'v mut Value, AccessFault> {
    let (Selector::Index(index), Some(sequence)) = (selector, target.as_sequence_mut()) else {
        return Err(AccessFault::KindMismatch);
    };
    let len = sequence.len();
    sequence
        .get_mut(*index)
        .ok_or(AccessFault::OutOfRange { index: *index, len })
}

fn sequence_set(target: &mut Value, selector: &Selector<'_>, value: Value, grow: bool) -> Result<(), AccessFault> {
    let (Selector::Index(index), Some(sequence)) = (selector, target.as_sequence_mut()) else {
        return Err(AccessFault::KindMismatch);
    };
    if sequence.is_read_only() {
        return Err(AccessFault::ReadOnly);
    }
    let len = sequence.len();
    if let Some(slot) = sequence.get_mut(*index) {
        *slot = value;
        Ok(())
    } else if grow && *index == len {
        sequence.push(value).map_err(|_| AccessFault::ReadOnly)
    } else {
        Err(AccessFault::OutOfRange { index: *index, len })
    }
}

fn mapping_get<'v>(target: &'v Value, selector: &Selector<'_>) -> Result<Cow<'v, Value>, AccessFault> {
    let (Selector::Key(key), Some(mapping)) = (selector, target.as_mapping()) else {
        return Err(AccessFault::KindMismatch);
    };
    mapping.get(key).map(Cow::Borrowed).ok_or(AccessFault::Missing)
}

fn mapping_slot<'v>(target: &'v mut Value, selector: &Selector<'_>) -> Result<&'v mut Value, AccessFault> {
    let (Selector::Key(key), Some(mapping)) = (selector, target.as_mapping_mut()) else {
        return Err(AccessFault::KindMismatch);
    };
    mapping.get_mut(key).ok_or(AccessFault::Missing)
}

fn mapping_set(target: &mut Value, selector: &Selector<'_>, value: Value, _grow: bool) -> Result<(), AccessFault> {
    let (Selector::Key(key), Some(mapping)) = (selector, target.as_mapping_mut()) else {
        return Err(AccessFault::KindMismatch);
    };
    if mapping.is_read_only() {
        return Err(AccessFault::ReadOnly);
    }
    match mapping.get_mut(key) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => mapping.insert(key, value).map_err(|_| AccessFault::ReadOnly),
    }
}
