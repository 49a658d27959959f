//! Hierarchical [`Index`] of [`Room`]s: hostel → block → floor → rooms.

use std::{collections::BTreeMap, fmt, iter};

use common::Percent;

use crate::{
    domain::{hostel, room, Room},
    read::Occupancy,
};
#[cfg(doc)]
use crate::domain::Hostel;

/// Branch key of an [`Index`].
///
/// [`Key::Unknown`] collects [`Room`]s missing the corresponding location
/// part, and is ordered after all the [`Key::Known`] ones.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Key<T> {
    /// Known location part.
    Known(T),

    /// Location part is missing.
    Unknown,
}

impl<T> Key<T> {
    /// Returns the known value of this [`Key`], if any.
    #[must_use]
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown => None,
        }
    }
}

impl<T> From<Option<T>> for Key<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl<T: fmt::Display> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => v.fmt(f),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// [`Key`] of a [`Hostel`] branch.
pub type HostelKey = Key<hostel::Name>;

/// [`Key`] of a [`room::Block`] branch.
pub type BlockKey = Key<room::Block>;

/// [`Key`] of a [`room::Floor`] branch.
pub type FloorKey = Key<room::Floor>;

/// Rooms of a single floor, keeping their original order.
type Floors = BTreeMap<FloorKey, Vec<Room>>;

/// Floors of a single block.
type Blocks = BTreeMap<BlockKey, Floors>;

/// [`Room`]s grouped by hostel, block and floor.
#[derive(Clone, Debug, Default)]
pub struct Index(BTreeMap<HostelKey, Blocks>);

impl Index {
    /// Groups the provided flat `rooms` into an [`Index`].
    ///
    /// Nothing is dropped: [`Room`]s missing a location part land under the
    /// [`Key::Unknown`] branch.
    #[must_use]
    pub fn new(rooms: impl IntoIterator<Item = Room>) -> Self {
        let mut index = BTreeMap::<_, Blocks>::new();
        for room in rooms {
            let hostel = room.hostel.as_ref().map(|h| h.name.clone()).into();
            let block = room.block.clone().into();
            let floor = room.floor.into();
            index
                .entry(hostel)
                .or_default()
                .entry(block)
                .or_default()
                .entry(floor)
                .or_default()
                .push(room);
        }
        Self(index)
    }

    /// Iterates over the hostels of this [`Index`] in order.
    pub fn hostels(&self) -> impl Iterator<Item = &HostelKey> {
        self.0.keys()
    }

    /// Iterates over the blocks of the provided `hostel` in order.
    pub fn blocks(
        &self,
        hostel: &HostelKey,
    ) -> impl Iterator<Item = &BlockKey> {
        self.0.get(hostel).into_iter().flat_map(BTreeMap::keys)
    }

    /// Iterates over the floors of the provided `block` in order.
    pub fn floors(
        &self,
        hostel: &HostelKey,
        block: &BlockKey,
    ) -> impl Iterator<Item = &FloorKey> {
        self.0
            .get(hostel)
            .and_then(|blocks| blocks.get(block))
            .into_iter()
            .flat_map(BTreeMap::keys)
    }

    /// Returns the [`Room`]s of the provided `floor`.
    #[must_use]
    pub fn rooms(
        &self,
        hostel: &HostelKey,
        block: &BlockKey,
        floor: &FloorKey,
    ) -> &[Room] {
        self.0
            .get(hostel)
            .and_then(|blocks| blocks.get(block))
            .and_then(|floors| floors.get(floor))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over the [`Room`]s matching the provided location parts,
    /// where [`None`] matches anything.
    pub fn narrow<'s>(
        &'s self,
        hostel: Option<&'s HostelKey>,
        block: Option<&'s BlockKey>,
        floor: Option<&'s FloorKey>,
    ) -> impl Iterator<Item = &'s Room> {
        self.0
            .iter()
            .filter(move |(k, _)| hostel.map_or(true, |h| h == *k))
            .flat_map(|(_, blocks)| blocks)
            .filter(move |(k, _)| block.map_or(true, |b| b == *k))
            .flat_map(|(_, floors)| floors)
            .filter(move |(k, _)| floor.map_or(true, |f| f == *k))
            .flat_map(|(_, rooms)| rooms)
    }

    /// Looks up the [`Room`] with the provided ID.
    #[must_use]
    pub fn find(&self, id: room::Id) -> Option<&Room> {
        self.iter().find(|r| r.id == id)
    }

    /// Iterates over all the [`Room`]s of this [`Index`].
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.narrow(None, None, None)
    }

    /// Flattens this [`Index`] back into [`Room`]s in the [`Index`] order.
    pub fn into_rooms(self) -> impl Iterator<Item = Room> {
        self.0
            .into_values()
            .flat_map(BTreeMap::into_values)
            .flat_map(BTreeMap::into_values)
            .flatten()
    }

    /// Returns the total number of [`Room`]s in this [`Index`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Indicates whether this [`Index`] has no [`Room`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over per-floor [`Summary`]s in the [`Index`] order.
    pub fn floor_summaries(&self) -> impl Iterator<Item = FloorSummary<'_>> {
        self.0.iter().flat_map(|(hostel, blocks)| {
            blocks.iter().flat_map(move |(block, floors)| {
                floors.iter().map(move |(floor, rooms)| FloorSummary {
                    hostel,
                    block,
                    floor,
                    summary: rooms.iter().map(Summary::of).sum(),
                })
            })
        })
    }

    /// Returns the [`Summary`] of all the [`Room`]s in this [`Index`].
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.iter().map(Summary::of).sum()
    }
}

/// Aggregated occupancy counts of a group of [`Room`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Number of [`Room`]s.
    pub rooms: usize,

    /// Total number of beds.
    pub capacity: usize,

    /// Total number of occupied beds.
    pub occupied: usize,

    /// Total number of vacant beds.
    pub vacant: usize,
}

impl Summary {
    /// Returns the [`Summary`] of a single [`Room`].
    #[must_use]
    pub fn of(room: &Room) -> Self {
        let occupancy = Occupancy::from(room);
        Self {
            rooms: 1,
            capacity: usize::from(room.capacity.get()),
            occupied: occupancy.occupied,
            vacant: occupancy.vacant,
        }
    }

    /// Returns the [`Percent`] of occupied beds.
    #[must_use]
    pub fn rate(&self) -> Percent {
        Percent::of(self.occupied as u64, self.capacity as u64)
    }
}

impl iter::Sum for Summary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, s| Self {
            rooms: acc.rooms + s.rooms,
            capacity: acc.capacity + s.capacity,
            occupied: acc.occupied + s.occupied,
            vacant: acc.vacant + s.vacant,
        })
    }
}

/// [`Summary`] of a single floor of an [`Index`].
#[derive(Clone, Copy, Debug)]
pub struct FloorSummary<'i> {
    /// Hostel the floor belongs to.
    pub hostel: &'i HostelKey,

    /// Block the floor belongs to.
    pub block: &'i BlockKey,

    /// The floor itself.
    pub floor: &'i FloorKey,

    /// [`Summary`] of the floor [`Room`]s.
    pub summary: Summary,
}
