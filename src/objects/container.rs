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
    pub enum ContainerAttribute {
        Width = 1,
        Height = 2,
        Hidden = 3,
    }
}

/// A rectangular grouping of child objects that can be shown or hidden as a whole.
#[derive(Debug, PartialEq, Serialize)]
pub struct Container {
    #[serde(rename = "id")]
    base: ObjectBase,
    width: u16,
    height: u16,
    hidden: bool,
    #[serde(serialize_with = "super::serialize_children")]
    children: ChildObjectMap,
    macros: Vec<ObjectId>,
}

impl Container {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, pool: PoolRef) -> Result<Self> {
        let offset = cursor.position();
        let object_id = read_header(cursor)?;

        let width = cursor.u16_named("container width")?;
        let height = cursor.u16_named("container height")?;
        let hidden = cursor.bool_named("container hidden")?;
        let (children, macros) = read_children_and_macros(cursor, object_id, offset)?;

        trace!(
            "Container {:#06x}: {}x{}, hidden: {}, {} children",
            object_id,
            width,
            height,
            hidden,
            children.len()
        );

        Ok(Container {
            base: ObjectBase::new(object_id, pool),
            width,
            height,
            hidden,
            children,
            macros,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Resize in one step; subscribers are notified once.
    pub fn change_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.base.notify();
    }

    pub fn change_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        self.base.notify();
    }
}

impl VtObjectBase for Container {
    fn object_type(&self) -> ObjectType {
        ObjectType::Container
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn lookup_attribute(&self, id: AttributeId) -> Option<AttributeValue> {
        let value = match ContainerAttribute::from_id(id)? {
            ContainerAttribute::Width => AttributeValue::Uint16(self.width),
            ContainerAttribute::Height => AttributeValue::Uint16(self.height),
            ContainerAttribute::Hidden => AttributeValue::Boolean(self.hidden),
        };
        Some(value)
    }

    fn assign_attribute(&mut self, id: AttributeId, value: AttributeValue) -> Assignment {
        match ContainerAttribute::from_id(id) {
            Some(ContainerAttribute::Width) => Assignment::u16_into(&mut self.width, value),
            Some(ContainerAttribute::Height) => Assignment::u16_into(&mut self.height, value),
            Some(ContainerAttribute::Hidden) => Assignment::bool_into(&mut self.hidden, value),
            None => Assignment::UnknownAttribute,
        }
    }
}

impl ChildObjects for Container {
    fn child_objects(&self) -> &ChildObjectMap {
        &self.children
    }

    fn child_objects_mut(&mut self) -> &mut ChildObjectMap {
        &mut self.children
    }
}

impl ChildMacros for Container {
    fn child_macros(&self) -> &[ObjectId] {
        &self.macros
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::{AttributeError, DecodeError};
    use crate::objects::ChildPosition;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // id 0x0010, 200x100, hidden, one child at (5, 6), no macros.
    const CONTAINER: [u8; 16] = [
        0x10, 0x00, 0x03, 0xC8, 0x00, 0x64, 0x00, 0x01, 0x01, 0x00, 0x20, 0x00, 0x05, 0x00, 0x06,
        0x00,
    ];

    fn decode(bytes: &[u8]) -> Result<Container> {
        Container::decode(&mut ByteCursor::new(bytes), PoolRef::detached())
    }

    #[test]
    fn test_decodes_geometry_and_children() {
        let container = decode(&CONTAINER).unwrap();
        assert_eq!(container.object_type(), ObjectType::Container);
        assert_eq!((container.width(), container.height()), (200, 100));
        assert!(container.is_hidden());
        assert_eq!(
            container.child_objects().get(&0x20),
            Some(&ChildPosition::new(5, 6))
        );
        assert!(container.child_macros().is_empty());
    }

    #[test]
    fn test_attribute_round_trip_through_generic_protocol() {
        let mut container = decode(&CONTAINER).unwrap();

        container
            .change_attribute(ContainerAttribute::Hidden.id(), AttributeValue::Boolean(false))
            .unwrap();
        assert!(!container.is_hidden());

        container
            .change_attribute(ContainerAttribute::Width.id(), AttributeValue::Uint16(320))
            .unwrap();
        assert_eq!(
            container.get_attribute(ContainerAttribute::Width.id()),
            Ok(AttributeValue::Uint16(320))
        );

        assert!(matches!(
            container.change_attribute(ContainerAttribute::Height.id(), AttributeValue::Uint8(1)),
            Err(AttributeError::TypeMismatch { .. })
        ));
        assert_eq!(container.height(), 100);
    }

    #[test]
    fn test_change_size_notifies_once() {
        let mut container = decode(&CONTAINER).unwrap();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        container.register_update_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        container.change_size(10, 20);

        assert_eq!((container.width(), container.height()), (10, 20));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_child_section_overrun() {
        let err = decode(&CONTAINER[..15]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SectionOverrun {
                object_id: 0x10,
                offset: 0,
                need: 6,
                have: 5
            }
        );
    }
}
