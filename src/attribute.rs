use serde::Serialize;
use std::fmt;

/// Attribute identifier, scoped per object type.
pub type AttributeId = u8;

/// Every object type exposes its type tag as attribute 0. It is never writable.
pub const TYPE_ATTRIBUTE: AttributeId = 0;

/// The declared type of an attribute, used to validate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeType {
    Uint8,
    Uint16,
    Boolean,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::Uint8 => "uint8",
            AttributeType::Uint16 => "uint16",
            AttributeType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A single object property, used uniformly to read and write mutable object state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeValue {
    Uint8(u8),
    Uint16(u16),
    Boolean(bool),
}

impl AttributeValue {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeValue::Uint8(_) => AttributeType::Uint8,
            AttributeValue::Uint16(_) => AttributeType::Uint16,
            AttributeValue::Boolean(_) => AttributeType::Boolean,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match *self {
            AttributeValue::Uint8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match *self {
            AttributeValue::Uint16(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            AttributeValue::Boolean(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Uint8(v) => write!(f, "{v}"),
            AttributeValue::Uint16(v) => write!(f, "{v:#06x}"),
            AttributeValue::Boolean(v) => write!(f, "{v}"),
        }
    }
}

/// Outcome of writing an attribute into an object's own attribute table.
///
/// Kind implementations return this from [`VtObjectBase::assign_attribute`]; the public
/// [`VtObjectBase::change_attribute`] turns it into a result, reports failures and notifies
/// subscribers.
///
/// [`VtObjectBase::assign_attribute`]: crate::objects::VtObjectBase::assign_attribute
/// [`VtObjectBase::change_attribute`]: crate::objects::VtObjectBase::change_attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Applied,
    UnknownAttribute,
    WrongType { expected: AttributeType },
    ReadOnly,
}

impl Assignment {
    /// Store `value` into `slot` when it carries the expected type.
    pub(crate) fn u8_into(slot: &mut u8, value: AttributeValue) -> Self {
        match value.as_u8() {
            Some(v) => {
                *slot = v;
                Assignment::Applied
            }
            None => Assignment::WrongType {
                expected: AttributeType::Uint8,
            },
        }
    }

    pub(crate) fn u16_into(slot: &mut u16, value: AttributeValue) -> Self {
        match value.as_u16() {
            Some(v) => {
                *slot = v;
                Assignment::Applied
            }
            None => Assignment::WrongType {
                expected: AttributeType::Uint16,
            },
        }
    }

    pub(crate) fn bool_into(slot: &mut bool, value: AttributeValue) -> Self {
        match value.as_bool() {
            Some(v) => {
                *slot = v;
                Assignment::Applied
            }
            None => Assignment::WrongType {
                expected: AttributeType::Boolean,
            },
        }
    }
}
