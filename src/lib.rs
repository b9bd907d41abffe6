#![deny(unused_must_use)]
#![forbid(unsafe_code)]
//! Decoder and mutable object graph for ISO 11783-6 virtual terminal object pools.
//!
//! ```
//! use vtpool::{ObjectPool, ObjectType};
//!
//! let bytes = [
//!     0xCD, 0xAB, 0x00, 0x02, 0x01, 0xE8, 0x03, 0x01, 0x00, 0x02,
//!     0xF8, 0x2A, 0x00, 0x00, 0x00, 0x00, 0x65, 0x6E, 0x64, 0x65,
//! ];
//! let pool = ObjectPool::from_buffer(&bytes).unwrap();
//! let working_set = pool.get_object(0xABCD).unwrap();
//! assert_eq!(working_set.object_type(), ObjectType::WorkingSet);
//! ```

#[macro_use]
mod macros;

pub mod attribute;
pub mod diagnostics;
pub mod err;
pub mod fingerprint;
pub mod notify;
pub mod object_pool;
pub mod object_type;
pub mod objects;
mod utils;

pub use attribute::{AttributeId, AttributeType, AttributeValue};
pub use diagnostics::{Diagnostics, LogDiagnostics, MemoryDiagnostics, Severity};
pub use err::{AttributeError, DecodeError, ObjectError};
pub use fingerprint::hash_pool_to_version;
pub use object_pool::{DuplicatePolicy, ObjectPool, PoolRef, PoolSettings};
pub use object_type::ObjectType;
pub use objects::{
    ChildMacros, ChildObjects, ChildPosition, Selectable, VtObject, VtObjectBase,
};

/// Identifier of an object, unique within one pool.
pub type ObjectId = u16;

/// Reference value meaning "no object".
pub const NULL_OBJECT_ID: ObjectId = 0xFFFF;
