//! [`Occupancy`] read model definition.

use common::Percent;

use crate::domain::{
    room::{BedIndex, Capacity, Slot},
    Room,
};

/// Occupancy of a [`Room`] derived from its [`Capacity`] and [`Slot`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Occupancy {
    /// [`Capacity`] the counts are derived against.
    pub capacity: Capacity,

    /// Number of occupied [`Slot`]s, including the ones beyond the
    /// [`Capacity`].
    pub occupied: usize,

    /// Number of vacant beds, never negative.
    pub vacant: usize,

    /// Empty beds within the [`Capacity`], in ascending order.
    pub free_beds: Vec<BedIndex>,
}

impl Occupancy {
    /// Derives the [`Occupancy`] of the provided [`Capacity`] and [`Slot`]s.
    ///
    /// Beds missing from the `slots` are considered empty.
    #[must_use]
    pub fn of(capacity: Capacity, slots: &[Slot]) -> Self {
        let occupied = slots.iter().filter(|slot| slot.is_some()).count();
        let free_beds = capacity
            .beds()
            .filter(|bed| {
                slots.get(usize::from(*bed)).map_or(true, Option::is_none)
            })
            .collect();

        Self {
            capacity,
            occupied,
            vacant: usize::from(capacity.get()).saturating_sub(occupied),
            free_beds,
        }
    }

    /// Indicates whether the provided `bed` is free.
    #[must_use]
    pub fn is_free(&self, bed: BedIndex) -> bool {
        self.free_beds.binary_search(&bed).is_ok()
    }

    /// Indicates whether no beds are vacant.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.vacant == 0
    }

    /// Returns the [`Percent`] of occupied beds.
    #[must_use]
    pub fn rate(&self) -> Percent {
        Percent::of(self.occupied as u64, u64::from(self.capacity.get()))
    }
}

impl From<&Room> for Occupancy {
    fn from(room: &Room) -> Self {
        Self::of(room.capacity, &room.slots)
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::{room::Capacity, user};

    use super::Occupancy;

    fn capacity(beds: u16) -> Capacity {
        Capacity::new(beds).unwrap()
    }

    #[test]
    fn counts_half_occupied_room() {
        let (a, b) = (user::Id::new(), user::Id::new());

        let occupancy = Occupancy::of(capacity(4), &[Some(a), None, None, Some(b)]);

        assert_eq!(occupancy.occupied, 2);
        assert_eq!(occupancy.vacant, 2);
        assert_eq!(occupancy.free_beds, [1, 2]);
        assert_eq!(occupancy.rate().to_string(), "50");
    }

    #[test]
    fn no_slots_means_no_occupants() {
        let occupancy = Occupancy::of(capacity(3), &[]);

        assert_eq!(occupancy.occupied, 0);
        assert_eq!(occupancy.vacant, 3);
        assert_eq!(occupancy.free_beds, [0, 1, 2]);
        assert!(occupancy.is_free(2));
        assert!(!occupancy.is_free(3));
    }

    #[test]
    fn counts_stale_slots_beyond_capacity() {
        let slots = [
            Some(user::Id::new()),
            Some(user::Id::new()),
            Some(user::Id::new()),
        ];

        let occupancy = Occupancy::of(capacity(2), &slots);

        assert_eq!(occupancy.occupied, 3);
        assert_eq!(occupancy.vacant, 0);
        assert!(occupancy.free_beds.is_empty());
        assert!(occupancy.is_full());
    }

    #[test]
    fn counts_add_up_to_capacity() {
        let student = Some(user::Id::new());
        for beds in 1..=6_u16 {
            for mask in 0..(1_u32 << beds) {
                let slots = (0..beds)
                    .map(|bed| (mask >> bed & 1 == 1).then_some(student).flatten())
                    .collect::<Vec<_>>();

                let occupancy = Occupancy::of(capacity(beds), &slots);

                assert_eq!(
                    occupancy.occupied + occupancy.vacant,
                    usize::from(beds),
                );
                assert_eq!(occupancy.free_beds.len(), occupancy.vacant);
                for bed in &occupancy.free_beds {
                    assert!(slots[usize::from(*bed)].is_none());
                }
            }
        }
    }
}
