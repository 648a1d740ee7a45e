use crate::oracle::RawTable;
use analyzer_core::{Position, Strain};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Strain order used when tables are presented
pub const DISPLAY_STRAINS: [Strain; 5] = [
    Strain::NoTrump,
    Strain::Clubs,
    Strain::Diamonds,
    Strain::Hearts,
    Strain::Spades,
];

/// Double-dummy tricks for every declarer in every strain of one deal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TrickTable {
    /// Index: [strain][declarer]
    tricks: [[u8; 4]; 5],
}

impl TrickTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert the oracle grid, rejecting any cell outside 0..=13
    pub fn from_raw(raw: &RawTable) -> Option<Self> {
        let mut table = TrickTable::new();
        for strain in Strain::ALL {
            for declarer in Position::ALL {
                let tricks = u8::try_from(raw.tricks(strain, declarer))
                    .ok()
                    .filter(|&t| t <= 13)?;
                table.set(strain, declarer, tricks);
            }
        }
        Some(table)
    }

    pub fn get(&self, strain: Strain, declarer: Position) -> u8 {
        self.tricks[strain as usize][declarer as usize]
    }

    pub fn set(&mut self, strain: Strain, declarer: Position, tricks: u8) {
        self.tricks[strain as usize][declarer as usize] = tricks;
    }
}

/// Serializes as `{"No-Trump": {"north": 7, ...}, "Clubs": {...}, ...}`
impl Serialize for TrickTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DISPLAY_STRAINS.len()))?;
        for strain in DISPLAY_STRAINS {
            map.serialize_entry(&strain, &SeatRow { table: self, strain })?;
        }
        map.end()
    }
}

struct SeatRow<'a> {
    table: &'a TrickTable,
    strain: Strain,
}

impl Serialize for SeatRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for seat in Position::ALL {
            map.serialize_entry(&seat, &self.table.get(self.strain, seat))?;
        }
        map.end()
    }
}
