/// Runs `$body` with `$inner` bound to the concrete object inside a `VtObject`.
macro_rules! with_object {
    ($object:expr, $inner:ident => $body:expr) => {
        match $object {
            $crate::objects::VtObject::WorkingSet($inner) => $body,
            $crate::objects::VtObject::DataMask($inner) => $body,
            $crate::objects::VtObject::AlarmMask($inner) => $body,
            $crate::objects::VtObject::Container($inner) => $body,
            $crate::objects::VtObject::SoftKeyMask($inner) => $body,
            $crate::objects::VtObject::Key($inner) => $body,
        }
    };
}

/// Declares a per-kind attribute id enum with a fallible lookup from the raw id.
macro_rules! attribute_ids {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident = $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub const fn id(self) -> $crate::attribute::AttributeId {
                self as $crate::attribute::AttributeId
            }

            pub fn from_id(id: $crate::attribute::AttributeId) -> Option<Self> {
                match id {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}
