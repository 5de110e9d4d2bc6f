use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier used across the circuit model.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    ///
    /// Panics at `u32::MAX`, which has no room for the offset.
    pub fn from_index(index: u32) -> Self {
        match index.checked_add(1).and_then(NonZeroU32::new) {
            Some(raw) => Self(raw),
            None => panic!("id index {index} is out of range"),
        }
    }

    /// Id for an arena slot, or `None` when the slot does not fit.
    pub fn try_from_slot(slot: usize) -> Option<Self> {
        let index = u32::try_from(slot).ok()?;
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Index as a `usize`, for arena lookups.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type CompId = Id;
pub type PinId = Id;

/// Identifier of a component template. Persisted in save files, so values
/// must never be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TemplateId(pub u8);

impl TemplateId {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.slot(), i as usize);
        }
    }

    #[test]
    fn slot_ids_stop_at_u32_range() {
        assert_eq!(Id::try_from_slot(7), Some(Id::from_index(7)));
        assert_eq!(Id::try_from_slot(u32::MAX as usize - 1).map(Id::index), Some(u32::MAX - 1));
        assert_eq!(Id::try_from_slot(u32::MAX as usize), None);
        assert_eq!(Id::try_from_slot(usize::MAX), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn from_index_rejects_max() {
        let _ = Id::from_index(u32::MAX);
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn template_id_display() {
        assert_eq!(TemplateId(3).to_string(), "#3");
    }
}
