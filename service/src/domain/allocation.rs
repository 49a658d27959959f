//! Allocation [`Request`] definitions.
//!
//! A [`Request`] is created [`Status::Pending`] and is decided exactly once:
//!
//! ```text
//! Pending ──Approve──> Approved
//!    └─────Decline──> Declined
//! ```
//!
//! Vacating a bed later is a [`Room`] mutation, not a [`Request`] transition.

use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, Error, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use common::DateTime;

use crate::domain::{room, user};
#[cfg(doc)]
use crate::domain::{Room, User};

/// Request of a student to occupy a specific bed of a [`Room`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    /// ID of this [`Request`].
    pub id: Id,

    /// ID of the requesting [`User`].
    pub student_id: user::Id,

    /// ID of the requested [`Room`].
    pub room_id: room::Id,

    /// Requested bed of the [`Room`].
    pub bed: room::BedIndex,

    /// [`Status`] of this [`Request`].
    pub status: Status,

    /// [`PaymentStatus`] of this [`Request`].
    pub payment: PaymentStatus,

    /// [`DateTime`] when this [`Request`] was submitted.
    pub created_at: CreationDateTime,
}

impl Request {
    /// Creates a new [`Status::Pending`] [`Request`] out of the provided
    /// [`Submission`].
    #[must_use]
    pub fn submitted(submission: Submission) -> Self {
        let Submission {
            student_id,
            room_id,
            bed,
        } = submission;
        Self {
            id: Id::new(),
            student_id,
            room_id,
            bed,
            status: Status::Pending,
            payment: PaymentStatus::Pending,
            created_at: CreationDateTime::now(),
        }
    }

    /// Indicates whether this [`Request`] awaits a [`Verdict`].
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Applies the provided [`Verdict`] to this [`Request`].
    ///
    /// # Errors
    ///
    /// With [`AlreadyDecided`] if this [`Request`] is not pending anymore, in
    /// which case it's left untouched.
    pub fn decide(&mut self, verdict: Verdict) -> Result<Status, AlreadyDecided> {
        self.status = self.status.next(verdict).ok_or(AlreadyDecided {
            request_id: self.id,
            status: self.status,
        })?;
        Ok(self.status)
    }
}

/// ID of a [`Request`].
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

define_kind! {
    #[doc = "Status of a [`Request`]."]
    enum Status {
        #[doc = "Awaiting an administrator decision."]
        Pending = 1,

        #[doc = "Approved, the bed is given to the student."]
        Approved = 2,

        #[doc = "Declined, the bed is left as is."]
        Declined = 3,
    }
}

impl Status {
    /// Returns the [`Status`] the provided [`Verdict`] moves this one to.
    ///
    /// [`None`] if this [`Status`] is terminal.
    #[must_use]
    pub const fn next(self, verdict: Verdict) -> Option<Self> {
        match (self, verdict) {
            (Self::Pending, Verdict::Approve) => Some(Self::Approved),
            (Self::Pending, Verdict::Decline) => Some(Self::Declined),
            (Self::Approved | Self::Declined, _) => None,
        }
    }

    /// Indicates whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

define_kind! {
    #[doc = "Payment status of a [`Request`]."]
    enum PaymentStatus {
        #[doc = "Awaiting payment."]
        Pending = 1,

        #[doc = "Paid."]
        Paid = 2,

        #[doc = "Payment failed."]
        Failed = 3,
    }
}

define_kind! {
    #[doc = "Administrator decision upon a [`Request`]."]
    enum Verdict {
        #[doc = "Give the requested bed to the student."]
        Approve = 1,

        #[doc = "Refuse the request."]
        Decline = 2,
    }
}

/// New [`Request`] to be submitted.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// ID of the requesting [`User`].
    pub student_id: user::Id,

    /// ID of the requested [`Room`].
    pub room_id: room::Id,

    /// Requested bed of the [`Room`].
    #[serde(rename = "bedIndex")]
    pub bed: room::BedIndex,
}

/// [`Verdict`] upon a specific [`Request`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Decision {
    /// ID of the decided [`Request`].
    pub request_id: Id,

    /// [`Verdict`] upon the [`Request`].
    pub verdict: Verdict,
}

/// Error of deciding a [`Request`] which is decided already.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("`Request(id: {request_id})` is {status} already")]
pub struct AlreadyDecided {
    /// ID of the [`Request`].
    pub request_id: Id,

    /// Terminal [`Status`] of the [`Request`].
    pub status: Status,
}

/// [`DateTime`] when a [`Request`] was submitted.
pub type CreationDateTime = DateTimeOf<(Request, unit::Creation)>;

#[cfg(test)]
mod spec {
    use crate::domain::{room, user};

    use super::{Request, Status, Submission, Verdict};

    fn pending() -> Request {
        Request::submitted(Submission {
            student_id: user::Id::new(),
            room_id: room::Id::new(),
            bed: 1,
        })
    }

    #[test]
    fn submitted_is_pending() {
        let request = pending();

        assert!(request.is_pending());
        assert!(!request.status.is_terminal());
    }

    #[test]
    fn decides_exactly_once() {
        let mut approved = pending();
        assert_eq!(approved.decide(Verdict::Approve), Ok(Status::Approved));

        let err = approved.decide(Verdict::Decline).unwrap_err();
        assert_eq!(err.status, Status::Approved);
        assert_eq!(approved.status, Status::Approved);

        let mut declined = pending();
        assert_eq!(declined.decide(Verdict::Decline), Ok(Status::Declined));
        assert!(declined.decide(Verdict::Approve).is_err());
        assert!(declined.status.is_terminal());
    }

    #[test]
    fn statuses_travel_as_camel_case() {
        assert_eq!(Status::Pending.to_string(), "pending");
        assert_eq!("declined".parse(), Ok(Status::Declined));
    }
}
