use log::trace;
use serde::Serialize;

use super::decode::{
    ensure_sections, read_header, read_macros, read_object_ids, MACRO_ENTRY_SIZE,
    OBJECT_ID_ENTRY_SIZE,
};
use super::{ChildMacros, ObjectBase, VtObjectBase};
use crate::attribute::{AttributeId, AttributeValue, Assignment};
use crate::err::Result;
use crate::object_pool::PoolRef;
use crate::object_type::ObjectType;
use crate::utils::ByteCursor;
use crate::ObjectId;

attribute_ids! {
    pub enum SoftKeyMaskAttribute {
        BackgroundColour = 1,
    }
}

/// An ordered list of soft keys shown next to a data or alarm mask.
///
/// Children are bare ids; the terminal lays them out, so there are no positions to change.
#[derive(Debug, PartialEq, Serialize)]
pub struct SoftKeyMask {
    #[serde(rename = "id")]
    base: ObjectBase,
    background_colour: u8,
    children: Vec<ObjectId>,
    macros: Vec<ObjectId>,
}

impl SoftKeyMask {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, pool: PoolRef) -> Result<Self> {
        let offset = cursor.position();
        let object_id = read_header(cursor)?;

        let background_colour = cursor.u8_named("soft key mask background colour")?;
        let num_objects = cursor.u8_named("soft key mask number of objects")?;
        let num_macros = cursor.u8_named("soft key mask number of macros")?;

        ensure_sections(
            cursor,
            object_id,
            offset,
            &[
                (num_objects, OBJECT_ID_ENTRY_SIZE),
                (num_macros, MACRO_ENTRY_SIZE),
            ],
        )?;

        let children = read_object_ids(cursor, num_objects)?;
        let macros = read_macros(cursor, num_macros)?;

        trace!(
            "Soft key mask {:#06x}: keys {:?}",
            object_id,
            children
        );

        Ok(SoftKeyMask {
            base: ObjectBase::new(object_id, pool),
            background_colour,
            children,
            macros,
        })
    }

    pub fn background_colour(&self) -> u8 {
        self.background_colour
    }

    /// Child ids in the order the terminal shows them.
    pub fn child_objects(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn change_background_colour(&mut self, colour: u8) {
        self.background_colour = colour;
        self.base.notify();
    }
}

impl VtObjectBase for SoftKeyMask {
    fn object_type(&self) -> ObjectType {
        ObjectType::SoftKeyMask
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn lookup_attribute(&self, id: AttributeId) -> Option<AttributeValue> {
        match SoftKeyMaskAttribute::from_id(id)? {
            SoftKeyMaskAttribute::BackgroundColour => {
                Some(AttributeValue::Uint8(self.background_colour))
            }
        }
    }

    fn assign_attribute(&mut self, id: AttributeId, value: AttributeValue) -> Assignment {
        match SoftKeyMaskAttribute::from_id(id) {
            Some(SoftKeyMaskAttribute::BackgroundColour) => {
                Assignment::u8_into(&mut self.background_colour, value)
            }
            None => Assignment::UnknownAttribute,
        }
    }
}

impl ChildMacros for SoftKeyMask {
    fn child_macros(&self) -> &[ObjectId] {
        &self.macros
    }
}
