//! [`Room`] definitions.

use std::num::NonZeroU16;

use common::Money;
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{hostel, user};
#[cfg(doc)]
use crate::domain::{Hostel, User};

/// Room of a [`Hostel`] split into numbered beds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Room {
    /// ID of this [`Room`].
    pub id: Id,

    /// [`Hostel`] this [`Room`] is located in, if known.
    pub hostel: Option<hostel::Ref>,

    /// [`Block`] of the [`Hostel`] this [`Room`] is located in, if known.
    pub block: Option<Block>,

    /// [`Floor`] this [`Room`] is located on, if known.
    pub floor: Option<Floor>,

    /// [`Number`] of this [`Room`].
    pub number: Number,

    /// [`Capacity`] of this [`Room`].
    pub capacity: Capacity,

    /// Price of a bed in this [`Room`], if set.
    pub price: Option<Money>,

    /// Occupant [`Slot`]s of this [`Room`], indexed by [`BedIndex`].
    ///
    /// May be shorter than the [`Capacity`] (missing slots are empty), and
    /// may be longer when the data is stale.
    pub slots: Vec<Slot>,
}

impl Room {
    /// Returns the [`Slot`] of the provided `bed`, if it exists.
    ///
    /// Beds within the [`Capacity`] missing from the [`Room::slots`] are
    /// empty.
    #[must_use]
    pub fn slot(&self, bed: BedIndex) -> Option<Slot> {
        if !self.capacity.contains(bed) {
            return None;
        }
        Some(self.slots.get(usize::from(bed)).copied().flatten())
    }

    /// Indicates whether the provided `bed` exists and is empty.
    #[must_use]
    pub fn is_bed_free(&self, bed: BedIndex) -> bool {
        self.slot(bed).is_some_and(|slot| slot.is_none())
    }

    /// Returns the first [`BedIndex`] occupied by the provided [`User`].
    #[must_use]
    pub fn bed_of(&self, student_id: user::Id) -> Option<BedIndex> {
        self.slots
            .iter()
            .position(|slot| *slot == Some(student_id))
            .and_then(|pos| BedIndex::try_from(pos).ok())
    }

    /// Iterates over IDs of the [`User`]s occupying this [`Room`].
    pub fn occupants(&self) -> impl Iterator<Item = user::Id> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }
}

/// ID of a [`Room`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_text! {
    #[doc = "Block of a [`Hostel`] a [`Room`] is located in (`A`, `B`, etc.)."]
    Block(max = 16)
}

define_text! {
    #[doc = "Number of a [`Room`] within its [`Hostel`]."]
    Number(max = 32)
}

/// Floor a [`Room`] is located on.
pub type Floor = i16;

/// Index of a bed within a [`Room`], starting from `0`.
pub type BedIndex = u16;

/// Bed position within a [`Room`]: either empty or occupied by a [`User`].
pub type Slot = Option<user::Id>;

/// Number of beds in a [`Room`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct Capacity(NonZeroU16);

impl Capacity {
    /// Creates a new [`Capacity`] if the provided `beds` is positive.
    #[must_use]
    pub fn new(beds: u16) -> Option<Self> {
        NonZeroU16::new(beds).map(Self)
    }

    /// Returns the number of beds.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Indicates whether the provided `bed` is within this [`Capacity`].
    #[must_use]
    pub const fn contains(self, bed: BedIndex) -> bool {
        bed < self.get()
    }

    /// Iterates over all the [`BedIndex`]es within this [`Capacity`].
    pub fn beds(self) -> impl Iterator<Item = BedIndex> {
        0..self.get()
    }
}

impl From<Capacity> for u16 {
    fn from(capacity: Capacity) -> Self {
        capacity.get()
    }
}

impl TryFrom<u16> for Capacity {
    type Error = &'static str;

    fn try_from(beds: u16) -> Result<Self, Self::Error> {
        Self::new(beds).ok_or("`Capacity` must be positive")
    }
}

/// Direct assignment of a [`User`] into a bed of a [`Room`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// ID of the assigned [`User`].
    pub student_id: user::Id,

    /// ID of the [`Room`] to assign into.
    pub room_id: Id,

    /// [`BedIndex`] to assign into.
    #[serde(rename = "bedIndex")]
    pub bed: BedIndex,
}

/// [`User`] occupying a [`Room`], identified for removal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupant {
    /// ID of the [`Room`] the [`User`] occupies.
    pub room_id: Id,

    /// ID of the occupying [`User`].
    pub student_id: user::Id,
}

#[cfg(test)]
mod spec {
    use crate::domain::user;

    use super::{Capacity, Id, Number, Room};

    fn room(capacity: u16, slots: Vec<Option<user::Id>>) -> Room {
        Room {
            id: Id::new(),
            hostel: None,
            block: None,
            floor: None,
            number: Number::new("101").unwrap(),
            capacity: Capacity::new(capacity).unwrap(),
            price: None,
            slots,
        }
    }

    #[test]
    fn capacity_is_positive() {
        assert!(Capacity::new(0).is_none());
        assert_eq!(Capacity::new(3).unwrap().beds().collect::<Vec<_>>(), [
            0, 1, 2
        ]);
    }

    #[test]
    fn slots_missing_within_capacity_are_free() {
        let student = user::Id::new();
        let room = room(3, vec![Some(student)]);

        assert_eq!(room.slot(0), Some(Some(student)));
        assert_eq!(room.slot(2), Some(None));
        assert_eq!(room.slot(3), None);
        assert!(room.is_bed_free(1));
        assert!(!room.is_bed_free(0));
        assert!(!room.is_bed_free(3));
    }

    #[test]
    fn finds_first_bed_of_occupant() {
        let (a, b) = (user::Id::new(), user::Id::new());
        let room = room(4, vec![None, Some(a), Some(b), Some(a)]);

        assert_eq!(room.bed_of(a), Some(1));
        assert_eq!(room.bed_of(user::Id::new()), None);
        assert_eq!(room.occupants().count(), 3);
    }
}
