use log::trace;
use serde::Serialize;

use super::decode::{read_children_and_macros, read_header};
use super::{ChildMacros, ChildObjectMap, ChildObjects, ObjectBase, VtObjectBase};
use crate::attribute::{AttributeId, AttributeValue, Assignment};
use crate::err::Result;
use crate::object_pool::PoolRef;
use crate::object_type::ObjectType;
use crate::utils::ByteCursor;
use crate::ObjectId;

attribute_ids! {
    pub enum DataMaskAttribute {
        BackgroundColour = 1,
        SoftKeyMask = 2,
    }
}

/// Fields and attribute table shared by data masks and alarm masks.
#[derive(Debug, PartialEq, Serialize)]
pub(crate) struct MaskFields {
    pub(crate) background_colour: u8,
    pub(crate) soft_key_mask: ObjectId,
    #[serde(serialize_with = "super::serialize_children")]
    pub(crate) children: ChildObjectMap,
    pub(crate) macros: Vec<ObjectId>,
}

impl MaskFields {
    pub(crate) fn lookup(&self, id: AttributeId) -> Option<AttributeValue> {
        let value = match DataMaskAttribute::from_id(id)? {
            DataMaskAttribute::BackgroundColour => AttributeValue::Uint8(self.background_colour),
            DataMaskAttribute::SoftKeyMask => AttributeValue::Uint16(self.soft_key_mask),
        };
        Some(value)
    }

    pub(crate) fn assign(&mut self, id: AttributeId, value: AttributeValue) -> Assignment {
        match DataMaskAttribute::from_id(id) {
            Some(DataMaskAttribute::BackgroundColour) => {
                Assignment::u8_into(&mut self.background_colour, value)
            }
            Some(DataMaskAttribute::SoftKeyMask) => {
                Assignment::u16_into(&mut self.soft_key_mask, value)
            }
            None => Assignment::UnknownAttribute,
        }
    }
}

/// A top level surface holding positioned child objects.
#[derive(Debug, PartialEq, Serialize)]
pub struct DataMask {
    #[serde(rename = "id")]
    base: ObjectBase,
    #[serde(flatten)]
    mask: MaskFields,
}

impl DataMask {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, pool: PoolRef) -> Result<Self> {
        let offset = cursor.position();
        let object_id = read_header(cursor)?;

        let background_colour = cursor.u8_named("data mask background colour")?;
        let soft_key_mask = cursor.u16_named("data mask soft key mask")?;
        let (children, macros) = read_children_and_macros(cursor, object_id, offset)?;

        trace!(
            "Data mask {:#06x}: {} children, {} macros",
            object_id,
            children.len(),
            macros.len()
        );

        Ok(DataMask {
            base: ObjectBase::new(object_id, pool),
            mask: MaskFields {
                background_colour,
                soft_key_mask,
                children,
                macros,
            },
        })
    }

    pub fn background_colour(&self) -> u8 {
        self.mask.background_colour
    }

    pub fn soft_key_mask(&self) -> ObjectId {
        self.mask.soft_key_mask
    }

    pub fn change_background_colour(&mut self, colour: u8) {
        self.mask.background_colour = colour;
        self.base.notify();
    }

    pub fn change_soft_key_mask(&mut self, mask: ObjectId) {
        self.mask.soft_key_mask = mask;
        self.base.notify();
    }
}

impl VtObjectBase for DataMask {
    fn object_type(&self) -> ObjectType {
        ObjectType::DataMask
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn lookup_attribute(&self, id: AttributeId) -> Option<AttributeValue> {
        self.mask.lookup(id)
    }

    fn assign_attribute(&mut self, id: AttributeId, value: AttributeValue) -> Assignment {
        self.mask.assign(id, value)
    }
}

impl ChildObjects for DataMask {
    fn child_objects(&self) -> &ChildObjectMap {
        &self.mask.children
    }

    fn child_objects_mut(&mut self) -> &mut ChildObjectMap {
        &mut self.mask.children
    }
}

impl ChildMacros for DataMask {
    fn child_macros(&self) -> &[ObjectId] {
        &self.mask.macros
    }
}
