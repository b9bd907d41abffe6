use std::fmt;

use log::trace;
use serde::Serialize;

use super::data_mask::MaskFields;
use super::decode::{read_children_and_macros, read_header};
use super::{ChildMacros, ChildObjectMap, ChildObjects, ObjectBase, VtObjectBase};
use crate::attribute::{AttributeId, AttributeValue, Assignment};
use crate::err::Result;
use crate::object_pool::PoolRef;
use crate::object_type::ObjectType;
use crate::utils::ByteCursor;
use crate::ObjectId;

attribute_ids! {
    /// Attribute ids of an alarm mask. Ids 1 and 2 are shared with [`super::DataMaskAttribute`].
    pub enum AlarmMaskAttribute {
        BackgroundColour = 1,
        SoftKeyMask = 2,
        Priority = 3,
        AcousticSignal = 4,
    }
}

/// Interpretation of the raw priority byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlarmMaskPriority {
    High = 0,
    Medium = 1,
    Low = 2,
}

impl TryFrom<u8> for AlarmMaskPriority {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(AlarmMaskPriority::High),
            1 => Ok(AlarmMaskPriority::Medium),
            2 => Ok(AlarmMaskPriority::Low),
            other => Err(other),
        }
    }
}

impl fmt::Display for AlarmMaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlarmMaskPriority::High => "high",
            AlarmMaskPriority::Medium => "medium",
            AlarmMaskPriority::Low => "low",
        };
        f.write_str(name)
    }
}

/// A data mask variant raised by the implement to signal an alarm.
///
/// Priority and acoustic signal are kept as raw bytes; values outside the defined range are
/// decoded as-is and [`AlarmMask::alarm_priority`] returns `None` for them.
#[derive(Debug, PartialEq, Serialize)]
pub struct AlarmMask {
    #[serde(rename = "id")]
    base: ObjectBase,
    #[serde(flatten)]
    mask: MaskFields,
    priority: u8,
    acoustic_signal: u8,
}

impl AlarmMask {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>, pool: PoolRef) -> Result<Self> {
        let offset = cursor.position();
        let object_id = read_header(cursor)?;

        let background_colour = cursor.u8_named("alarm mask background colour")?;
        let soft_key_mask = cursor.u16_named("alarm mask soft key mask")?;
        let priority = cursor.u8_named("alarm mask priority")?;
        let acoustic_signal = cursor.u8_named("alarm mask acoustic signal")?;
        let (children, macros) = read_children_and_macros(cursor, object_id, offset)?;

        trace!(
            "Alarm mask {:#06x}: priority {}, {} children, {} macros",
            object_id,
            priority,
            children.len(),
            macros.len()
        );

        Ok(AlarmMask {
            base: ObjectBase::new(object_id, pool),
            mask: MaskFields {
                background_colour,
                soft_key_mask,
                children,
                macros,
            },
            priority,
            acoustic_signal,
        })
    }

    pub fn background_colour(&self) -> u8 {
        self.mask.background_colour
    }

    pub fn soft_key_mask(&self) -> ObjectId {
        self.mask.soft_key_mask
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn alarm_priority(&self) -> Option<AlarmMaskPriority> {
        AlarmMaskPriority::try_from(self.priority).ok()
    }

    pub fn acoustic_signal(&self) -> u8 {
        self.acoustic_signal
    }

    pub fn change_background_colour(&mut self, colour: u8) {
        self.mask.background_colour = colour;
        self.base.notify();
    }

    pub fn change_soft_key_mask(&mut self, mask: ObjectId) {
        self.mask.soft_key_mask = mask;
        self.base.notify();
    }

    pub fn change_priority(&mut self, priority: AlarmMaskPriority) {
        self.priority = priority as u8;
        self.base.notify();
    }

    pub fn change_acoustic_signal(&mut self, signal: u8) {
        self.acoustic_signal = signal;
        self.base.notify();
    }
}

impl VtObjectBase for AlarmMask {
    fn object_type(&self) -> ObjectType {
        ObjectType::AlarmMask
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn lookup_attribute(&self, id: AttributeId) -> Option<AttributeValue> {
        if let Some(value) = self.mask.lookup(id) {
            return Some(value);
        }

        match AlarmMaskAttribute::from_id(id)? {
            AlarmMaskAttribute::Priority => Some(AttributeValue::Uint8(self.priority)),
            AlarmMaskAttribute::AcousticSignal => Some(AttributeValue::Uint8(self.acoustic_signal)),
            AlarmMaskAttribute::BackgroundColour | AlarmMaskAttribute::SoftKeyMask => None,
        }
    }

    fn assign_attribute(&mut self, id: AttributeId, value: AttributeValue) -> Assignment {
        match self.mask.assign(id, value) {
            Assignment::UnknownAttribute => {}
            handled => return handled,
        }

        match AlarmMaskAttribute::from_id(id) {
            Some(AlarmMaskAttribute::Priority) => Assignment::u8_into(&mut self.priority, value),
            Some(AlarmMaskAttribute::AcousticSignal) => {
                Assignment::u8_into(&mut self.acoustic_signal, value)
            }
            _ => Assignment::UnknownAttribute,
        }
    }
}

impl ChildObjects for AlarmMask {
    fn child_objects(&self) -> &ChildObjectMap {
        &self.mask.children
    }

    fn child_objects_mut(&mut self) -> &mut ChildObjectMap {
        &mut self.mask.children
    }
}

impl ChildMacros for AlarmMask {
    fn child_macros(&self) -> &[ObjectId] {
        &self.mask.macros
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeType;
    use crate::err::{AttributeError, DecodeError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // id 0x0002, bg 1, soft key mask 0x0003, priority medium, signal 3, no children, one macro.
    const ALARM_MASK: [u8; 12] = [
        0x02, 0x00, 0x02, 0x01, 0x03, 0x00, 0x01, 0x03, 0x00, 0x01, 0x09, 0x00,
    ];

    fn decode() -> AlarmMask {
        AlarmMask::decode(&mut ByteCursor::new(&ALARM_MASK), PoolRef::detached()).unwrap()
    }

    #[test]
    fn test_decodes_fields() {
        let mask = decode();
        assert_eq!(mask.object_id(), 2);
        assert_eq!(mask.background_colour(), 1);
        assert_eq!(mask.soft_key_mask(), 3);
        assert_eq!(mask.alarm_priority(), Some(AlarmMaskPriority::Medium));
        assert_eq!(mask.acoustic_signal(), 3);
        assert!(mask.child_objects().is_empty());
        assert_eq!(mask.child_macros(), [9]);
    }

    #[test]
    fn test_out_of_range_priority_is_kept_raw() {
        let mut bytes = ALARM_MASK;
        bytes[6] = 7;
        let mask = AlarmMask::decode(&mut ByteCursor::new(&bytes), PoolRef::detached()).unwrap();
        assert_eq!(mask.priority(), 7);
        assert_eq!(mask.alarm_priority(), None);
    }

    #[test]
    fn test_shared_and_own_attributes() {
        let mut mask = decode();

        assert_eq!(
            mask.get_attribute(AlarmMaskAttribute::SoftKeyMask.id()),
            Ok(AttributeValue::Uint16(3))
        );
        assert_eq!(
            mask.get_attribute(AlarmMaskAttribute::Priority.id()),
            Ok(AttributeValue::Uint8(1))
        );
        assert_eq!(
            mask.get_attribute(0),
            Ok(AttributeValue::Uint8(ObjectType::AlarmMask.as_u8()))
        );

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        mask.register_update_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        mask.change_attribute(AlarmMaskAttribute::BackgroundColour.id(), AttributeValue::Uint8(12))
            .unwrap();
        mask.change_attribute(AlarmMaskAttribute::AcousticSignal.id(), AttributeValue::Uint8(0))
            .unwrap();
        assert_eq!(mask.background_colour(), 12);
        assert_eq!(mask.acoustic_signal(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        assert_eq!(
            mask.change_attribute(AlarmMaskAttribute::Priority.id(), AttributeValue::Boolean(true)),
            Err(AttributeError::TypeMismatch {
                object_id: 2,
                object_type: ObjectType::AlarmMask,
                attribute: 3,
                expected: AttributeType::Uint8,
                found: AttributeType::Boolean,
            })
        );
        assert!(matches!(
            mask.get_attribute(5),
            Err(AttributeError::NotFound { attribute: 5, .. })
        ));
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dedicated_setters() {
        let mut mask = decode();
        mask.change_priority(AlarmMaskPriority::High);
        mask.change_soft_key_mask(0x0300);
        assert_eq!(mask.alarm_priority(), Some(AlarmMaskPriority::High));
        assert_eq!(mask.soft_key_mask(), 0x0300);
    }

    #[test]
    fn test_truncated_fixed_fields() {
        let err = AlarmMask::decode(&mut ByteCursor::new(&ALARM_MASK[..7]), PoolRef::detached())
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Truncated {
                what: "alarm mask acoustic signal",
                offset: 7,
                ..
            }
        ));
    }
}
