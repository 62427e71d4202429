//! Error types for path parsing, conversion, registry and navigation

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Where in a path an error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The raw path text
    pub path: String,
    /// Zero-based index of the segment being processed
    pub segment_index: usize,
}

impl Location {
    pub fn new(path: impl Into<String>, segment_index: usize) -> Self {
        Self {
            path: path.into(),
            segment_index,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` (segment {})", self.path, self.segment_index)
    }
}

/// Which side of a lookup was absent when a path could not be followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    /// The value the segment should be applied to is itself null
    ContainerAbsent,
    /// The container exists but has no such key or member
    MemberMissing,
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Absence::ContainerAbsent => f.write_str("container is null"),
            Absence::MemberMissing => f.write_str("member is missing"),
        }
    }
}

/// Why an attribute could not be resolved on a runtime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeFailure {
    /// The runtime type does not support this kind of segment at all
    UnsupportedSegment,
    /// A case-insensitive lookup matched more than one attribute
    Ambiguous { candidates: Vec<String> },
}

impl fmt::Display for AttributeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeFailure::UnsupportedSegment => {
                f.write_str("segment kind is not supported by this type")
            }
            AttributeFailure::Ambiguous { candidates } => {
                write!(f, "name is ambiguous between {}", candidates.join(", "))
            }
        }
    }
}

fn at(location: &Option<Location>) -> String {
    match location {
        Some(location) => format!(" at {location}"),
        None => String::new(),
    }
}

/// Main error type of the crate
#[derive(Debug, Clone, Error)]
pub enum PathError {
    /// The path string violates the grammar
    #[error("malformed path `{path}` at offset {offset}: {reason}")]
    MalformedPath {
        path: String,
        offset: usize,
        reason: String,
    },

    /// A segment's target is absent
    #[error("path `{path}` not found at segment {segment_index} after `{prefix}`: {absence}")]
    PathNotFound {
        path: String,
        segment_index: usize,
        /// Rendering of the segments that were resolved successfully
        prefix: String,
        absence: Absence,
    },

    /// The segment does not fit the runtime shape of the value
    #[error("`{type_name}` has no `{segment}` in path `{path}` (segment {segment_index}): {failure}")]
    NoSuchAttribute {
        path: String,
        segment_index: usize,
        type_name: String,
        segment: String,
        failure: AttributeFailure,
    },

    /// A sequence index is past the end
    #[error("index {index} out of range for `{type_name}` of length {len} in path `{path}` (segment {segment_index})")]
    IndexOutOfRange {
        path: String,
        segment_index: usize,
        type_name: String,
        index: usize,
        len: usize,
    },

    /// A write was attempted through an accessor without a setter
    #[error("`{target}` of `{type_name}` is read-only in path `{path}` (segment {segment_index})")]
    ReadOnlyTarget {
        path: String,
        segment_index: usize,
        type_name: String,
        target: String,
    },

    /// No converter in the chain produced a value of the target type
    #[error("cannot convert {from} to {to}{}", at(.location))]
    UnconvertibleValue {
        from: String,
        to: String,
        location: Option<Location>,
    },

    /// No function is bound under this name
    #[error("unknown function `{name}`{}", at(.location))]
    UnknownFunction {
        name: String,
        location: Option<Location>,
    },

    /// A function is already bound under this name
    #[error("function `{name}` is already registered")]
    DuplicateFunctionName { name: String },

    /// A registered function failed; the plugin error is kept as the source
    #[error("function `{name}` failed in path `{path}` (segment {segment_index}): {source}")]
    FunctionInvocation {
        name: String,
        path: String,
        segment_index: usize,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// An absent intermediate needs creating but nothing constructs its type
    #[error("no factory for `{type_name}` to create segment {segment_index} of path `{path}`")]
    NoFactoryForType {
        path: String,
        segment_index: usize,
        type_name: String,
    },
}

/// Fieldless mirror of [`PathError`] for matching on the error kind only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedPath,
    PathNotFound,
    NoSuchAttribute,
    IndexOutOfRange,
    ReadOnlyTarget,
    UnconvertibleValue,
    UnknownFunction,
    DuplicateFunctionName,
    FunctionInvocation,
    NoFactoryForType,
}

impl PathError {
    /// Create a malformed-path error
    pub fn malformed(path: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.into(),
            offset,
            reason: reason.into(),
        }
    }

    /// Create an unconvertible-value error without location
    pub fn unconvertible(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::UnconvertibleValue {
            from: from.into(),
            to: to.into(),
            location: None,
        }
    }

    /// Create an unknown-function error without location
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction {
            name: name.into(),
            location: None,
        }
    }

    /// Attach a path location to errors raised outside of a traversal.
    ///
    /// Errors that already carry their own path are returned unchanged.
    pub fn with_location(self, location: Location) -> Self {
        match self {
            Self::UnconvertibleValue { from, to, .. } => Self::UnconvertibleValue {
                from,
                to,
                location: Some(location),
            },
            Self::UnknownFunction { name, .. } => Self::UnknownFunction {
                name,
                location: Some(location),
            },
            other => other,
        }
    }

    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedPath { .. } => ErrorKind::MalformedPath,
            Self::PathNotFound { .. } => ErrorKind::PathNotFound,
            Self::NoSuchAttribute { .. } => ErrorKind::NoSuchAttribute,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::ReadOnlyTarget { .. } => ErrorKind::ReadOnlyTarget,
            Self::UnconvertibleValue { .. } => ErrorKind::UnconvertibleValue,
            Self::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            Self::DuplicateFunctionName { .. } => ErrorKind::DuplicateFunctionName,
            Self::FunctionInvocation { .. } => ErrorKind::FunctionInvocation,
            Self::NoFactoryForType { .. } => ErrorKind::NoFactoryForType,
        }
    }

    /// True for the one error kind `exists` turns into `false`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }

    /// The segment index the error refers to, when it has one
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            Self::PathNotFound { segment_index, .. }
            | Self::NoSuchAttribute { segment_index, .. }
            | Self::IndexOutOfRange { segment_index, .. }
            | Self::ReadOnlyTarget { segment_index, .. }
            | Self::FunctionInvocation { segment_index, .. }
            | Self::NoFactoryForType { segment_index, .. } => Some(*segment_index),
            Self::UnconvertibleValue { location, .. } | Self::UnknownFunction { location, .. } => {
                location.as_ref().map(|location| location.segment_index)
            }
            Self::MalformedPath { .. } | Self::DuplicateFunctionName { .. } => None,
        }
    }
}

/// Result type for path operations
pub type Result<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_location_is_attached_once() {
        let err = PathError::unconvertible("String", "Integer")
            .with_location(Location::new("a.b", 1));
        assert_eq!(err.segment_index(), Some(1));
        assert_eq!(
            err.to_string(),
            "cannot convert String to Integer at `a.b` (segment 1)"
        );

        let malformed = PathError::malformed("a..b", 2, "empty segment");
        let unchanged = malformed.clone().with_location(Location::new("x", 0));
        assert_eq!(unchanged.kind(), ErrorKind::MalformedPath);
        assert_eq!(unchanged.segment_index(), None);
    }

    #[test]
    fn test_function_invocation_keeps_source() {
        let cause: Arc<dyn std::error::Error + Send + Sync> =
            Arc::new(std::io::Error::other("boom"));
        let err = PathError::FunctionInvocation {
            name: "explode".into(),
            path: "a.explode()".into(),
            segment_index: 1,
            source: cause,
        };
        assert_eq!(err.kind(), ErrorKind::FunctionInvocation);
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".into()));
    }
}
