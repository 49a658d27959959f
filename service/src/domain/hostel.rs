//! [`Hostel`] definitions.

use common::define_kind;
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Room;

/// Student residence consisting of [`Room`]s.
#[derive(Clone, Debug)]
pub struct Hostel {
    /// ID of this [`Hostel`].
    pub id: Id,

    /// [`Name`] of this [`Hostel`].
    pub name: Name,

    /// [`Campus`] this [`Hostel`] belongs to, if any.
    pub campus: Option<Campus>,

    /// [`Gender`] of students this [`Hostel`] accommodates.
    pub gender: Gender,

    /// [`Address`] of this [`Hostel`], if known.
    pub address: Option<Address>,

    /// Free-text list of [`Facility`]s of this [`Hostel`].
    pub facilities: Vec<Facility>,
}

impl Hostel {
    /// Returns a [`Ref`] to this [`Hostel`].
    #[must_use]
    pub fn to_ref(&self) -> Ref {
        Ref {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// ID of a [`Hostel`].
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

/// Reference to a [`Hostel`] embedded into a [`Room`].
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Ref {
    /// ID of the referenced [`Hostel`].
    pub id: Id,

    /// [`Name`] of the referenced [`Hostel`].
    pub name: Name,
}

define_text! {
    #[doc = "Name of a [`Hostel`]."]
    Name(max = 256)
}

define_text! {
    #[doc = "Campus a [`Hostel`] belongs to."]
    Campus(max = 256)
}

define_text! {
    #[doc = "Postal address of a [`Hostel`]."]
    Address(max = 512)
}

define_text! {
    #[doc = "Facility of a [`Hostel`] (laundry, reading room, etc.)."]
    Facility(max = 256)
}

define_kind! {
    #[doc = "Gender restriction of a [`Hostel`]."]
    enum Gender {
        #[doc = "Male students only."]
        Male = 1,

        #[doc = "Female students only."]
        Female = 2,

        #[doc = "Any student."]
        Mixed = 3,
    }
}
