//! Typed object kinds and the capability facets they share.
//!
//! Every kind carries an [`ObjectBase`] (identity, back-reference to its pool, change
//! subscribers) and implements [`VtObjectBase`]. Positioned children, macro lists and selection
//! are separate traits ([`ChildObjects`], [`ChildMacros`], [`Selectable`]) that kinds implement
//! only when the standard gives them that facet.
//!
//! [`VtObject`] is the closed set of kinds the decoder understands.

mod alarm_mask;
mod container;
mod data_mask;
mod decode;
mod key;
mod soft_key_mask;
mod working_set;

pub use alarm_mask::{AlarmMask, AlarmMaskAttribute, AlarmMaskPriority};
pub use container::{Container, ContainerAttribute};
pub use data_mask::{DataMask, DataMaskAttribute};
pub use key::{Key, KeyAttribute};
pub use soft_key_mask::{SoftKeyMask, SoftKeyMaskAttribute};
pub use working_set::{WorkingSet, WorkingSetAttribute};

use std::collections::BTreeMap;
use std::fmt;

use hashbrown::HashMap;
use serde::{Serialize, Serializer};

use crate::attribute::{AttributeId, AttributeValue, Assignment, TYPE_ATTRIBUTE};
use crate::diagnostics::Severity;
use crate::err::{AttributeError, AttributeResult, ObjectError, ObjectResult, Result};
use crate::notify::Notifier;
use crate::object_pool::PoolRef;
use crate::object_type::ObjectType;
use crate::utils::ByteCursor;
use crate::ObjectId;

/// Position of a child object relative to its parent's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ChildPosition {
    pub x: i16,
    pub y: i16,
}

impl ChildPosition {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Positioned children of an object, keyed by child id.
pub type ChildObjectMap = HashMap<ObjectId, ChildPosition>;

/// Emits a child map ordered by child id, so the same pool always serializes to the same bytes.
pub(crate) fn serialize_children<S: Serializer>(
    children: &ChildObjectMap,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    children
        .iter()
        .collect::<BTreeMap<_, _>>()
        .serialize(serializer)
}

/// State common to every object: its id, the pool it belongs to and its change subscribers.
pub struct ObjectBase {
    id: ObjectId,
    pool: PoolRef,
    notifier: Notifier,
}

impl ObjectBase {
    pub(crate) fn new(id: ObjectId, pool: PoolRef) -> Self {
        Self {
            id,
            pool,
            notifier: Notifier::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn pool(&self) -> &PoolRef {
        &self.pool
    }

    pub(crate) fn set_pool(&mut self, pool: PoolRef) {
        self.pool = pool;
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.len()
    }

    pub(crate) fn notify(&mut self) {
        let id = self.id;
        self.notifier.notify(id);
    }

    pub(crate) fn report(&self, message: impl fmt::Display) {
        self.pool
            .emit(Severity::Error, &format!("[Object Pool] {message}"));
    }
}

impl fmt::Debug for ObjectBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBase")
            .field("id", &format_args!("{:#06x}", self.id))
            .field("subscribers", &self.notifier.len())
            .finish()
    }
}

// Two objects are the same object if they carry the same id; subscribers and pool membership are
// not part of the decoded content.
impl PartialEq for ObjectBase {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Serialize for ObjectBase {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.id)
    }
}

/// Identity plus the generic attribute protocol.
pub trait VtObjectBase {
    fn object_type(&self) -> ObjectType;

    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Read from this kind's own attribute table. Attribute 0 (type) is handled by the caller.
    fn lookup_attribute(&self, id: AttributeId) -> Option<AttributeValue>;

    /// Write into this kind's own attribute table. Must leave the object untouched unless it
    /// returns [`Assignment::Applied`].
    fn assign_attribute(&mut self, id: AttributeId, value: AttributeValue) -> Assignment;

    fn object_id(&self) -> ObjectId {
        self.base().id()
    }

    fn get_attribute(&self, id: AttributeId) -> AttributeResult<AttributeValue> {
        if id == TYPE_ATTRIBUTE {
            return Ok(AttributeValue::Uint8(self.object_type().as_u8()));
        }

        match self.lookup_attribute(id) {
            Some(value) => Ok(value),
            None => {
                let err = AttributeError::NotFound {
                    object_id: self.object_id(),
                    object_type: self.object_type(),
                    attribute: id,
                };
                self.base().report(format_args!("Failed to get attribute: {err}"));
                Err(err)
            }
        }
    }

    fn change_attribute(&mut self, id: AttributeId, value: AttributeValue) -> AttributeResult<()> {
        let outcome = if id == TYPE_ATTRIBUTE {
            Assignment::ReadOnly
        } else {
            self.assign_attribute(id, value)
        };

        let object_id = self.object_id();
        let object_type = self.object_type();
        let err = match outcome {
            Assignment::Applied => {
                self.base_mut().notify();
                return Ok(());
            }
            Assignment::UnknownAttribute => AttributeError::NotFound {
                object_id,
                object_type,
                attribute: id,
            },
            Assignment::WrongType { expected } => AttributeError::TypeMismatch {
                object_id,
                object_type,
                attribute: id,
                expected,
                found: value.attribute_type(),
            },
            Assignment::ReadOnly => AttributeError::ReadOnly {
                object_id,
                object_type,
                attribute: id,
            },
        };

        self.base()
            .report(format_args!("Failed to change attribute: {err}"));
        Err(err)
    }

    fn register_update_callback<F>(&mut self, callback: F)
    where
        Self: Sized,
        F: FnMut(ObjectId) + Send + 'static,
    {
        self.base_mut().notifier.register(callback);
    }
}

/// Objects that position child objects at (x, y) offsets.
pub trait ChildObjects: VtObjectBase {
    fn child_objects(&self) -> &ChildObjectMap;

    fn child_objects_mut(&mut self) -> &mut ChildObjectMap;

    /// Move `child` to an absolute position.
    fn change_child_position(&mut self, child: ObjectId, x: i16, y: i16) -> ObjectResult<()> {
        if !self.child_objects().contains_key(&child) {
            return Err(missing_child(self.base(), child, "position"));
        }
        if let Some(position) = self.child_objects_mut().get_mut(&child) {
            *position = ChildPosition::new(x, y);
        }
        self.base_mut().notify();
        Ok(())
    }

    /// Move `child` by a relative offset. Coordinates saturate at the `i16` range.
    fn change_child_location(&mut self, child: ObjectId, dx: i16, dy: i16) -> ObjectResult<()> {
        if !self.child_objects().contains_key(&child) {
            return Err(missing_child(self.base(), child, "location"));
        }
        if let Some(position) = self.child_objects_mut().get_mut(&child) {
            position.x = position.x.saturating_add(dx);
            position.y = position.y.saturating_add(dy);
        }
        self.base_mut().notify();
        Ok(())
    }
}

fn missing_child(base: &ObjectBase, child: ObjectId, what: &str) -> ObjectError {
    let err = ObjectError::ChildNotFound {
        parent: base.id(),
        child,
    };
    base.report(format_args!("Failed to change child {what}: {err}"));
    err
}

/// Objects that reference macros; order is significant.
pub trait ChildMacros: VtObjectBase {
    fn child_macros(&self) -> &[ObjectId];
}

/// Selection state with its own subscriber list.
#[derive(Debug, Default)]
pub struct Selection {
    selected: bool,
    notifier: Notifier,
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.selected == other.selected
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.selected)
    }
}

pub trait Selectable: VtObjectBase {
    fn selection(&self) -> &Selection;

    fn selection_mut(&mut self) -> &mut Selection;

    fn select(&mut self) {
        let id = self.object_id();
        let selection = self.selection_mut();
        selection.selected = true;
        selection.notifier.notify(id);
    }

    fn is_selected(&self) -> bool {
        self.selection().selected
    }

    fn register_select_callback<F>(&mut self, callback: F)
    where
        Self: Sized,
        F: FnMut(ObjectId) + Send + 'static,
    {
        self.selection_mut().notifier.register(callback);
    }
}

/// One decoded object of a supported kind.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum VtObject {
    WorkingSet(WorkingSet),
    DataMask(DataMask),
    AlarmMask(AlarmMask),
    Container(Container),
    SoftKeyMask(SoftKeyMask),
    Key(Key),
}

macro_rules! kind_accessors {
    ($($variant:ident => $as_ref:ident, $as_mut:ident;)+) => {
        $(
            pub fn $as_ref(&self) -> Option<&$variant> {
                match self {
                    VtObject::$variant(object) => Some(object),
                    _ => None,
                }
            }

            pub fn $as_mut(&mut self) -> Option<&mut $variant> {
                match self {
                    VtObject::$variant(object) => Some(object),
                    _ => None,
                }
            }
        )+
    };
}

impl VtObject {
    /// Decode one object of `object_type` at the cursor. The caller has already peeked the type
    /// byte; kinds without a decoder are rejected here.
    pub(crate) fn decode(
        object_type: ObjectType,
        cursor: &mut ByteCursor<'_>,
        pool: PoolRef,
    ) -> Result<VtObject> {
        match object_type {
            ObjectType::WorkingSet => WorkingSet::decode(cursor, pool).map(VtObject::WorkingSet),
            ObjectType::DataMask => DataMask::decode(cursor, pool).map(VtObject::DataMask),
            ObjectType::AlarmMask => AlarmMask::decode(cursor, pool).map(VtObject::AlarmMask),
            ObjectType::Container => Container::decode(cursor, pool).map(VtObject::Container),
            ObjectType::SoftKeyMask => {
                SoftKeyMask::decode(cursor, pool).map(VtObject::SoftKeyMask)
            }
            ObjectType::Key => Key::decode(cursor, pool).map(VtObject::Key),
            unsupported => Err(crate::err::DecodeError::UnsupportedObjectType {
                object_type: unsupported,
                offset: cursor.position(),
            }),
        }
    }

    pub fn object_id(&self) -> ObjectId {
        with_object!(self, object => object.object_id())
    }

    pub fn object_type(&self) -> ObjectType {
        with_object!(self, object => object.object_type())
    }

    pub fn pool(&self) -> &PoolRef {
        with_object!(self, object => object.base().pool())
    }

    pub(crate) fn set_pool(&mut self, pool: PoolRef) {
        with_object!(self, object => object.base_mut().set_pool(pool))
    }

    pub fn get_attribute(&self, id: AttributeId) -> AttributeResult<AttributeValue> {
        with_object!(self, object => object.get_attribute(id))
    }

    pub fn change_attribute(
        &mut self,
        id: AttributeId,
        value: AttributeValue,
    ) -> AttributeResult<()> {
        with_object!(self, object => object.change_attribute(id, value))
    }

    pub fn register_update_callback<F>(&mut self, callback: F)
    where
        F: FnMut(ObjectId) + Send + 'static,
    {
        with_object!(self, object => object.register_update_callback(callback))
    }

    /// Positioned children, for kinds that have them.
    pub fn child_objects(&self) -> Option<&ChildObjectMap> {
        match self {
            VtObject::WorkingSet(o) => Some(o.child_objects()),
            VtObject::DataMask(o) => Some(o.child_objects()),
            VtObject::AlarmMask(o) => Some(o.child_objects()),
            VtObject::Container(o) => Some(o.child_objects()),
            VtObject::Key(o) => Some(o.child_objects()),
            VtObject::SoftKeyMask(_) => None,
        }
    }

    pub fn child_macros(&self) -> &[ObjectId] {
        with_object!(self, object => object.child_macros())
    }

    fn as_child_objects_mut(&mut self) -> Option<&mut dyn ChildObjects> {
        match self {
            VtObject::WorkingSet(o) => Some(o),
            VtObject::DataMask(o) => Some(o),
            VtObject::AlarmMask(o) => Some(o),
            VtObject::Container(o) => Some(o),
            VtObject::Key(o) => Some(o),
            VtObject::SoftKeyMask(_) => None,
        }
    }

    fn no_child_objects(&self) -> ObjectError {
        let err = ObjectError::NoChildObjects {
            object_id: self.object_id(),
            object_type: self.object_type(),
        };
        with_object!(self, object => object
            .base()
            .report(format_args!("Failed to change child object: {err}")));
        err
    }

    pub fn change_child_position(&mut self, child: ObjectId, x: i16, y: i16) -> ObjectResult<()> {
        match self.as_child_objects_mut() {
            Some(object) => object.change_child_position(child, x, y),
            None => Err(self.no_child_objects()),
        }
    }

    pub fn change_child_location(
        &mut self,
        child: ObjectId,
        dx: i16,
        dy: i16,
    ) -> ObjectResult<()> {
        match self.as_child_objects_mut() {
            Some(object) => object.change_child_location(child, dx, dy),
            None => Err(self.no_child_objects()),
        }
    }

    kind_accessors! {
        WorkingSet => as_working_set, as_working_set_mut;
        DataMask => as_data_mask, as_data_mask_mut;
        AlarmMask => as_alarm_mask, as_alarm_mask_mut;
        Container => as_container, as_container_mut;
        SoftKeyMask => as_soft_key_mask, as_soft_key_mask_mut;
        Key => as_key, as_key_mut;
    }
}
