use serde::Serialize;
use std::fmt;

/// The kind tag carried in the third byte of every object record.
///
/// Values are fixed by ISO 11783-6. Tags that are not listed here (45..=239) are not valid object
/// types and make [`ObjectType::try_from`] fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ObjectType {
    /// Top level object that describes an implement's ECU or group of ECUs.
    WorkingSet,
    /// Top level object that contains other objects; activated by a working set.
    DataMask,
    /// Top level object that describes an alarm display.
    AlarmMask,
    /// Used to group objects.
    Container,
    /// Top level object that contains key objects.
    SoftKeyMask,
    Key,
    Button,
    InputBoolean,
    InputString,
    InputNumber,
    InputList,
    OutputString,
    OutputNumber,
    OutputLine,
    OutputRectangle,
    OutputEllipse,
    OutputPolygon,
    OutputMeter,
    OutputLinearBarGraph,
    OutputArchedBarGraph,
    PictureGraphic,
    NumberVariable,
    StringVariable,
    FontAttributes,
    LineAttributes,
    FillAttributes,
    InputAttributes,
    ObjectPointer,
    Macro,
    AuxiliaryFunctionType1,
    AuxiliaryInputType1,
    AuxiliaryFunctionType2,
    AuxiliaryInputType2,
    AuxiliaryControlDesignatorType2,
    WindowMask,
    KeyGroup,
    GraphicsContext,
    OutputList,
    ExtendedInputAttributes,
    ColourMap,
    ObjectLabelReference,
    ExternalObjectDefinition,
    ExternalReferenceName,
    ExternalObjectPointer,
    Animation,
    /// Manufacturer specific objects (240..=254); never sent to another vendor's terminal.
    ManufacturerDefined(u8),
    /// Reserved for future use.
    Reserved,
}

impl ObjectType {
    pub fn as_u8(self) -> u8 {
        match self {
            ObjectType::WorkingSet => 0,
            ObjectType::DataMask => 1,
            ObjectType::AlarmMask => 2,
            ObjectType::Container => 3,
            ObjectType::SoftKeyMask => 4,
            ObjectType::Key => 5,
            ObjectType::Button => 6,
            ObjectType::InputBoolean => 7,
            ObjectType::InputString => 8,
            ObjectType::InputNumber => 9,
            ObjectType::InputList => 10,
            ObjectType::OutputString => 11,
            ObjectType::OutputNumber => 12,
            ObjectType::OutputLine => 13,
            ObjectType::OutputRectangle => 14,
            ObjectType::OutputEllipse => 15,
            ObjectType::OutputPolygon => 16,
            ObjectType::OutputMeter => 17,
            ObjectType::OutputLinearBarGraph => 18,
            ObjectType::OutputArchedBarGraph => 19,
            ObjectType::PictureGraphic => 20,
            ObjectType::NumberVariable => 21,
            ObjectType::StringVariable => 22,
            ObjectType::FontAttributes => 23,
            ObjectType::LineAttributes => 24,
            ObjectType::FillAttributes => 25,
            ObjectType::InputAttributes => 26,
            ObjectType::ObjectPointer => 27,
            ObjectType::Macro => 28,
            ObjectType::AuxiliaryFunctionType1 => 29,
            ObjectType::AuxiliaryInputType1 => 30,
            ObjectType::AuxiliaryFunctionType2 => 31,
            ObjectType::AuxiliaryInputType2 => 32,
            ObjectType::AuxiliaryControlDesignatorType2 => 33,
            ObjectType::WindowMask => 34,
            ObjectType::KeyGroup => 35,
            ObjectType::GraphicsContext => 36,
            ObjectType::OutputList => 37,
            ObjectType::ExtendedInputAttributes => 38,
            ObjectType::ColourMap => 39,
            ObjectType::ObjectLabelReference => 40,
            ObjectType::ExternalObjectDefinition => 41,
            ObjectType::ExternalReferenceName => 42,
            ObjectType::ExternalObjectPointer => 43,
            ObjectType::Animation => 44,
            ObjectType::ManufacturerDefined(tag) => tag,
            ObjectType::Reserved => 255,
        }
    }
}

impl TryFrom<u8> for ObjectType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        let object_type = match tag {
            0 => ObjectType::WorkingSet,
            1 => ObjectType::DataMask,
            2 => ObjectType::AlarmMask,
            3 => ObjectType::Container,
            4 => ObjectType::SoftKeyMask,
            5 => ObjectType::Key,
            6 => ObjectType::Button,
            7 => ObjectType::InputBoolean,
            8 => ObjectType::InputString,
            9 => ObjectType::InputNumber,
            10 => ObjectType::InputList,
            11 => ObjectType::OutputString,
            12 => ObjectType::OutputNumber,
            13 => ObjectType::OutputLine,
            14 => ObjectType::OutputRectangle,
            15 => ObjectType::OutputEllipse,
            16 => ObjectType::OutputPolygon,
            17 => ObjectType::OutputMeter,
            18 => ObjectType::OutputLinearBarGraph,
            19 => ObjectType::OutputArchedBarGraph,
            20 => ObjectType::PictureGraphic,
            21 => ObjectType::NumberVariable,
            22 => ObjectType::StringVariable,
            23 => ObjectType::FontAttributes,
            24 => ObjectType::LineAttributes,
            25 => ObjectType::FillAttributes,
            26 => ObjectType::InputAttributes,
            27 => ObjectType::ObjectPointer,
            28 => ObjectType::Macro,
            29 => ObjectType::AuxiliaryFunctionType1,
            30 => ObjectType::AuxiliaryInputType1,
            31 => ObjectType::AuxiliaryFunctionType2,
            32 => ObjectType::AuxiliaryInputType2,
            33 => ObjectType::AuxiliaryControlDesignatorType2,
            34 => ObjectType::WindowMask,
            35 => ObjectType::KeyGroup,
            36 => ObjectType::GraphicsContext,
            37 => ObjectType::OutputList,
            38 => ObjectType::ExtendedInputAttributes,
            39 => ObjectType::ColourMap,
            40 => ObjectType::ObjectLabelReference,
            41 => ObjectType::ExternalObjectDefinition,
            42 => ObjectType::ExternalReferenceName,
            43 => ObjectType::ExternalObjectPointer,
            44 => ObjectType::Animation,
            240..=254 => ObjectType::ManufacturerDefined(tag),
            255 => ObjectType::Reserved,
            other => return Err(other),
        };
        Ok(object_type)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::ManufacturerDefined(tag) => write!(f, "ManufacturerDefined({tag})"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_valid_tag_round_trips_through_as_u8() {
        for tag in (0_u8..=44).chain(240..=255) {
            let object_type = ObjectType::try_from(tag).expect("tag is in the standard catalog");
            assert_eq!(object_type.as_u8(), tag);
        }
    }

    #[test]
    fn test_gap_between_standard_and_manufacturer_range_is_rejected() {
        assert_eq!(ObjectType::try_from(45), Err(45));
        assert_eq!(ObjectType::try_from(239), Err(239));
    }

    #[test]
    fn test_display() {
        assert_eq!(ObjectType::SoftKeyMask.to_string(), "SoftKeyMask");
        assert_eq!(
            ObjectType::ManufacturerDefined(241).to_string(),
            "ManufacturerDefined(241)"
        );
    }
}
