use log::trace;
use serde::Serialize;

use super::decode::{
    ensure_sections, read_child_objects, read_header, read_languages, read_macros,
    CHILD_OBJECT_ENTRY_SIZE, LANGUAGE_ENTRY_SIZE, MACRO_ENTRY_SIZE,
};
use super::{ChildMacros, ChildObjectMap, ChildObjects, ObjectBase, VtObjectBase};
use crate::attribute::{AttributeId, AttributeValue, Assignment};
use crate::err::Result;
use crate::object_pool::PoolRef;
use crate::object_type::ObjectType;
use crate::utils::ByteCursor;
use crate::ObjectId;

attribute_ids! {
    pub enum WorkingSetAttribute {
        BackgroundColour = 1,
        Selectable = 2,
        ActiveMask = 3,
    }
}

/// The top level object describing an implement's control unit.
///
/// Attributes are read-only through [`VtObjectBase::change_attribute`]; only
/// [`WorkingSet::change_active_mask`] and [`WorkingSet::change_background_colour`] mutate it.
#[derive(Debug, PartialEq, Serialize)]
pub struct WorkingSet {
    #[serde(rename = "id")]
    base: ObjectBase,
    background_colour: u8,
    selectable: bool,
    active_mask: ObjectId,
    #[serde(serialize_with = "super::serialize_children")]
    children: ChildObjectMap,
    macros: Vec<ObjectId>,
    languages: Vec<String>,
}

impl WorkingSet {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, pool: PoolRef) -> Result<Self> {
        let offset = cursor.position();
        let object_id = read_header(cursor)?;

        let background_colour = cursor.u8_named("working set background colour")?;
        let selectable = cursor.bool_named("working set selectable")?;
        let active_mask = cursor.u16_named("working set active mask")?;
        let num_objects = cursor.u8_named("working set number of objects")?;
        let num_macros = cursor.u8_named("working set number of macros")?;
        let num_languages = cursor.u8_named("working set number of languages")?;

        ensure_sections(
            cursor,
            object_id,
            offset,
            &[
                (num_objects, CHILD_OBJECT_ENTRY_SIZE),
                (num_macros, MACRO_ENTRY_SIZE),
                (num_languages, LANGUAGE_ENTRY_SIZE),
            ],
        )?;

        let children = read_child_objects(cursor, num_objects)?;
        let macros = read_macros(cursor, num_macros)?;
        let languages = read_languages(cursor, num_languages)?;

        trace!(
            "Working set {:#06x}: {} children, {} macros, languages {:?}",
            object_id,
            children.len(),
            macros.len(),
            languages
        );

        Ok(WorkingSet {
            base: ObjectBase::new(object_id, pool),
            background_colour,
            selectable,
            active_mask,
            children,
            macros,
            languages,
        })
    }

    pub fn background_colour(&self) -> u8 {
        self.background_colour
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn active_mask(&self) -> ObjectId {
        self.active_mask
    }

    /// Two-character language codes, in the order the pool lists them.
    pub fn child_languages(&self) -> &[String] {
        &self.languages
    }

    pub fn change_active_mask(&mut self, mask: ObjectId) {
        self.active_mask = mask;
        self.base.notify();
    }

    pub fn change_background_colour(&mut self, colour: u8) {
        self.background_colour = colour;
        self.base.notify();
    }
}

impl VtObjectBase for WorkingSet {
    fn object_type(&self) -> ObjectType {
        ObjectType::WorkingSet
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn lookup_attribute(&self, id: AttributeId) -> Option<AttributeValue> {
        let value = match WorkingSetAttribute::from_id(id)? {
            WorkingSetAttribute::BackgroundColour => AttributeValue::Uint8(self.background_colour),
            WorkingSetAttribute::Selectable => AttributeValue::Boolean(self.selectable),
            WorkingSetAttribute::ActiveMask => AttributeValue::Uint16(self.active_mask),
        };
        Some(value)
    }

    fn assign_attribute(&mut self, id: AttributeId, _value: AttributeValue) -> Assignment {
        match WorkingSetAttribute::from_id(id) {
            Some(_) => Assignment::ReadOnly,
            None => Assignment::UnknownAttribute,
        }
    }
}

impl ChildObjects for WorkingSet {
    fn child_objects(&self) -> &ChildObjectMap {
        &self.children
    }

    fn child_objects_mut(&mut self) -> &mut ChildObjectMap {
        &mut self.children
    }
}

impl ChildMacros for WorkingSet {
    fn child_macros(&self) -> &[ObjectId] {
        &self.macros
    }
}
