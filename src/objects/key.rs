use log::trace;
use serde::Serialize;

use super::decode::{read_children_and_macros, read_header};
use super::{
    ChildMacros, ChildObjectMap, ChildObjects, ObjectBase, Selectable, Selection, VtObjectBase,
};
use crate::attribute::{AttributeId, AttributeValue, Assignment};
use crate::err::Result;
use crate::object_pool::PoolRef;
use crate::object_type::ObjectType;
use crate::utils::ByteCursor;
use crate::ObjectId;

attribute_ids! {
    pub enum KeyAttribute {
        BackgroundColour = 1,
        KeyCode = 2,
    }
}

/// A soft key. The key code is what the terminal reports back when the key is pressed.
#[derive(Debug, PartialEq, Serialize)]
pub struct Key {
    #[serde(rename = "id")]
    base: ObjectBase,
    background_colour: u8,
    key_code: u8,
    #[serde(serialize_with = "super::serialize_children")]
    children: ChildObjectMap,
    macros: Vec<ObjectId>,
    selected: Selection,
}

impl Key {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, pool: PoolRef) -> Result<Self> {
        let offset = cursor.position();
        let object_id = read_header(cursor)?;

        let background_colour = cursor.u8_named("key background colour")?;
        let key_code = cursor.u8_named("key code")?;
        let (children, macros) = read_children_and_macros(cursor, object_id, offset)?;

        trace!("Key {:#06x}: code {}", object_id, key_code);

        Ok(Key {
            base: ObjectBase::new(object_id, pool),
            background_colour,
            key_code,
            children,
            macros,
            selected: Selection::default(),
        })
    }

    pub fn background_colour(&self) -> u8 {
        self.background_colour
    }

    pub fn key_code(&self) -> u8 {
        self.key_code
    }

    pub fn change_background_colour(&mut self, colour: u8) {
        self.background_colour = colour;
        self.base.notify();
    }
}

impl VtObjectBase for Key {
    fn object_type(&self) -> ObjectType {
        ObjectType::Key
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn lookup_attribute(&self, id: AttributeId) -> Option<AttributeValue> {
        let value = match KeyAttribute::from_id(id)? {
            KeyAttribute::BackgroundColour => AttributeValue::Uint8(self.background_colour),
            KeyAttribute::KeyCode => AttributeValue::Uint8(self.key_code),
        };
        Some(value)
    }

    fn assign_attribute(&mut self, id: AttributeId, value: AttributeValue) -> Assignment {
        match KeyAttribute::from_id(id) {
            Some(KeyAttribute::BackgroundColour) => {
                Assignment::u8_into(&mut self.background_colour, value)
            }
            Some(KeyAttribute::KeyCode) => Assignment::u8_into(&mut self.key_code, value),
            None => Assignment::UnknownAttribute,
        }
    }
}

impl ChildObjects for Key {
    fn child_objects(&self) -> &ChildObjectMap {
        &self.children
    }

    fn child_objects_mut(&mut self) -> &mut ChildObjectMap {
        &mut self.children
    }
}

impl ChildMacros for Key {
    fn child_macros(&self) -> &[ObjectId] {
        &self.macros
    }
}

impl Selectable for Key {
    fn selection(&self) -> &Selection {
        &self.selected
    }

    fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selected
    }
}
