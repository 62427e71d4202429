//! Per-call navigation state

use std::sync::Arc;

use crate::access::{AccessFault, ResolveFailure};
use crate::error::{Absence, AttributeFailure, Location, PathError};
use crate::model::ValueType;
use crate::parser::{PathExpression, Segment};
use crate::registry::FunctionError;

/// State of one top-level navigation call.
///
/// Tracks how far along the path the traversal got so every failure can name
/// the path, the failing segment and the prefix that resolved. Owned by a
/// single call and never shared.
#[derive(Debug)]
pub struct NavigationContext<'p> {
    expression: &'p PathExpression,
    index: usize,
}

impl<'p> NavigationContext<'p> {
    pub fn new(expression: &'p PathExpression) -> Self {
        Self {
            expression,
            index: 0,
        }
    }

    pub fn path(&self) -> &str {
        self.expression.as_str()
    }

    /// Index of the segment being processed
    pub fn segment_index(&self) -> usize {
        self.index
    }

    pub fn segment(&self) -> Option<&'p Segment> {
        self.expression.segments().get(self.index)
    }

    /// Rendering of the segments already resolved
    pub fn resolved_prefix(&self) -> String {
        self.expression.prefix(self.index)
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }

    pub fn location(&self) -> Location {
        Location::new(self.path(), self.index)
    }

    /// Attach the current location to an error raised by a collaborator
    pub fn locate(&self, error: PathError) -> PathError {
        error.with_location(self.location())
    }

    fn target(&self) -> String {
        self.segment().map(ToString::to_string).unwrap_or_default()
    }

    pub fn not_found(&self, absence: Absence) -> PathError {
        PathError::PathNotFound {
            path: self.path().to_string(),
            segment_index: self.index,
            prefix: self.resolved_prefix(),
            absence,
        }
    }

    fn no_such_attribute(&self, type_name: &str, failure: AttributeFailure) -> PathError {
        PathError::NoSuchAttribute {
            path: self.path().to_string(),
            segment_index: self.index,
            type_name: type_name.to_string(),
            segment: self.target(),
            failure,
        }
    }

    pub fn read_only(&self, type_name: &str) -> PathError {
        PathError::ReadOnlyTarget {
            path: self.path().to_string(),
            segment_index: self.index,
            type_name: type_name.to_string(),
            target: self.target(),
        }
    }

    pub fn no_factory(&self, required: &ValueType) -> PathError {
        PathError::NoFactoryForType {
            path: self.path().to_string(),
            segment_index: self.index,
            type_name: required.name().to_string(),
        }
    }

    pub fn function_failed(&self, name: &str, source: FunctionError) -> PathError {
        PathError::FunctionInvocation {
            name: name.to_string(),
            path: self.path().to_string(),
            segment_index: self.index,
            source: Arc::from(source),
        }
    }

    /// Error for a segment no descriptor exists for
    pub fn unresolved(&self, type_name: &str, failure: ResolveFailure) -> PathError {
        match failure {
            ResolveFailure::Unsupported => {
                self.no_such_attribute(type_name, AttributeFailure::UnsupportedSegment)
            }
            ResolveFailure::Undeclared => self.not_found(Absence::MemberMissing),
            ResolveFailure::Ambiguous(candidates) => {
                self.no_such_attribute(type_name, AttributeFailure::Ambiguous { candidates })
            }
        }
    }

    /// Error for an access through a resolved descriptor
    pub fn fault(&self, type_name: &str, fault: AccessFault) -> PathError {
        match fault {
            AccessFault::Missing => self.not_found(Absence::MemberMissing),
            AccessFault::OutOfRange { index, len } => PathError::IndexOutOfRange {
                path: self.path().to_string(),
                segment_index: self.index,
                type_name: type_name.to_string(),
                index,
                len,
            },
            AccessFault::ReadOnly => self.read_only(type_name),
            AccessFault::KindMismatch => {
                self.no_such_attribute(type_name, AttributeFailure::UnsupportedSegment)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::parse_path;

    #[test]
    fn test_not_found_reports_resolved_prefix() {
        let expression = parse_path("customer.addresses[2].city").unwrap();
        let mut context = NavigationContext::new(&expression);
        context.advance();
        context.advance();
        match context.not_found(Absence::MemberMissing) {
            PathError::PathNotFound {
                segment_index,
                prefix,
                absence,
                ..
            } => {
                assert_eq!(segment_index, 2);
                assert_eq!(prefix, "customer.addresses");
                assert_eq!(absence, Absence::MemberMissing);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fault_mapping() {
        let expression = parse_path("tags[5]").unwrap();
        let mut context = NavigationContext::new(&expression);
        context.advance();
        let err = context.fault("List", AccessFault::OutOfRange { index: 5, len: 2 });
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        assert_eq!(err.segment_index(), Some(1));
        assert_eq!(
            context.fault("List", AccessFault::ReadOnly).to_string(),
            "`[5]` of `List` is read-only in path `tags[5]` (segment 1)"
        );
    }
}
