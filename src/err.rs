use crate::attribute::{AttributeId, AttributeType};
use crate::object_type::ObjectType;
use crate::ObjectId;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;
pub type AttributeResult<T> = std::result::Result<T, AttributeError>;
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// Errors raised while decoding a raw object pool.
///
/// Every variant is fatal for the pool decode that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("object pool buffer is empty")]
    EmptyPool,

    #[error("buffer too small for {what} at offset {offset} (need {need} bytes, have {have})")]
    Truncated {
        what: &'static str,
        offset: u64,
        need: usize,
        have: usize,
    },

    #[error(
        "object {object_id:#06x} at offset {offset} declares {need} bytes of child/macro/language entries, but only {have} remain"
    )]
    SectionOverrun {
        object_id: ObjectId,
        offset: u64,
        need: usize,
        have: usize,
    },

    #[error("invalid or unknown object type `{tag}` at offset {offset}")]
    UnknownObjectType { tag: u8, offset: u64 },

    #[error("object type `{object_type}` at offset {offset} is not supported")]
    UnsupportedObjectType {
        object_type: ObjectType,
        offset: u64,
    },

    #[error("object id {object_id:#06x} at offset {offset} is already present in the pool")]
    DuplicateObjectId { object_id: ObjectId, offset: u64 },
}

impl DecodeError {
    /// Offset (relative to the start of the pool buffer) where the failure was detected.
    pub fn offset(&self) -> u64 {
        match self {
            DecodeError::EmptyPool => 0,
            DecodeError::Truncated { offset, .. }
            | DecodeError::SectionOverrun { offset, .. }
            | DecodeError::UnknownObjectType { offset, .. }
            | DecodeError::UnsupportedObjectType { offset, .. }
            | DecodeError::DuplicateObjectId { offset, .. } => *offset,
        }
    }
}

/// Failures of the generic attribute protocol. These never affect other objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("{object_type} object {object_id:#06x} has no attribute {attribute}")]
    NotFound {
        object_id: ObjectId,
        object_type: ObjectType,
        attribute: AttributeId,
    },

    #[error(
        "attribute {attribute} of {object_type} object {object_id:#06x} expects {expected}, got {found}"
    )]
    TypeMismatch {
        object_id: ObjectId,
        object_type: ObjectType,
        attribute: AttributeId,
        expected: AttributeType,
        found: AttributeType,
    },

    #[error("attribute {attribute} of {object_type} object {object_id:#06x} is read-only")]
    ReadOnly {
        object_id: ObjectId,
        object_type: ObjectType,
        attribute: AttributeId,
    },
}

/// Failures of topology mutation (child positions).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("object {parent:#06x} has no child object {child:#06x}")]
    ChildNotFound { parent: ObjectId, child: ObjectId },

    #[error("{object_type} object {object_id:#06x} does not carry positioned child objects")]
    NoChildObjects {
        object_id: ObjectId,
        object_type: ObjectType,
    },
}
