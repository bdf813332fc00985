use serde::{Deserialize, Serialize};

/// Wire level response code.
///
/// Legacy clients only distinguish `1` (ordinary acceptance) and `2`
/// (recovery acceptance); every other value is a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Marker {
    Rejected,
    Ordinary,
    Recovery,
}

impl Marker {
    pub fn is_accepted(self) -> bool {
        !matches!(self, Marker::Rejected)
    }
}

impl From<Marker> for u8 {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Rejected => 0,
            Marker::Ordinary => 1,
            Marker::Recovery => 2,
        }
    }
}

impl From<u8> for Marker {
    fn from(value: u8) -> Self {
        match value {
            1 => Marker::Ordinary,
            2 => Marker::Recovery,
            _ => Marker::Rejected,
        }
    }
}
