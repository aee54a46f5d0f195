//! Error types for class tree operations.
//!
//! Every failure here is a caller error: the editor is expected to check
//! preconditions (e.g. disable "override" when a class extends nothing)
//! before invoking an operation. [`ClassError::kind`] sorts each variant into
//! invalid-argument or invalid-state.

use std::fmt;

use crate::class::ClassId;

/// Where a property lookup was searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Required,
    Optional,
    /// Required, then optional.
    Class,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Scope::Required => "required properties",
            Scope::Optional => "optional properties",
            Scope::Class => "the control class",
        };
        f.write_str(label)
    }
}

/// Coarse classification of a [`ClassError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
}

/// Errors from control class operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassError {
    #[error("property `{property}` wasn't in {scope}")]
    PropertyNotFound { property: String, scope: Scope },
    #[error("property `{0}` is not defined by any extended class")]
    NotInherited(String),
    #[error("property `{0}` is listed more than once")]
    DuplicateProperty(String),
    #[error("a control class can't extend itself")]
    SelfExtend,
    #[error("{0:?} is a sub-class and can't be extended")]
    ExtendSubClass(ClassId),
    #[error("extending {target:?} from {class:?} would create an inheritance cycle")]
    ExtendCycle { class: ClassId, target: ClassId },
    #[error("a control class can't be a sub-class of itself")]
    SelfSubClass,
    #[error("{child:?} owns {parent:?} and can't become its sub-class")]
    SubClassCycle { parent: ClassId, child: ClassId },
    #[error("no class has been extended")]
    NotExtending,
    #[error("control class {0:?} does not exist")]
    UnknownClass(ClassId),
    #[error("no requirement specification registered for kind `{0}`")]
    UnknownKind(String),
    #[error("extended class `{0}` is not in the project")]
    UnknownExtendName(String),
}

impl ClassError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassError::NotExtending => ErrorKind::InvalidState,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

/// Result alias for class tree operations.
pub type Result<T, E = ClassError> = std::result::Result<T, E>;
