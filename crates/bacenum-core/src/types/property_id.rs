/// BACnet property identifiers.
///
/// Only the properties this client touches get named variants; anything
/// else round-trips through [`Proprietary`](Self::Proprietary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyId {
    ObjectIdentifier,
    ObjectList,
    ObjectName,
    ObjectType,
    VendorName,
    Proprietary(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::ObjectIdentifier => 75,
            Self::ObjectList => 76,
            Self::ObjectName => 77,
            Self::ObjectType => 79,
            Self::VendorName => 121,
            Self::Proprietary(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            75 => Self::ObjectIdentifier,
            76 => Self::ObjectList,
            77 => Self::ObjectName,
            79 => Self::ObjectType,
            121 => Self::VendorName,
            v => Self::Proprietary(v),
        }
    }
}
