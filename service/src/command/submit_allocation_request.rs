//! [`Command`] for submitting an [`AllocationRequest`].

use common::{define_kind, operations::Insert};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        allocation,
        room::{self, BedIndex},
        user, AllocationRequest, Room,
    },
    infra::{backend, Backend},
    read::{
        locator::{BlockKey, FloorKey, HostelKey},
        Occupancy,
    },
    Service,
};
#[cfg(doc)]
use crate::domain::{Hostel, User};

use super::Command;

/// [`Command`] for submitting an [`AllocationRequest`] of a bed chosen via
/// cascading selection.
///
/// The selection is validated against a locally fresh [`Room`] snapshot
/// before anything is sent to the [`Backend`].
#[derive(Clone, Debug)]
pub struct SubmitAllocationRequest {
    /// ID of the requesting [`User`].
    pub student_id: user::Id,

    /// [`Selection`] made by the [`User`].
    pub selection: Selection,

    /// Fresh snapshot of the selected [`Room`].
    pub snapshot: Room,
}

/// Cascading selection of a bed: hostel → block → floor → room → bed.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    /// Selected [`Hostel`].
    pub hostel: Option<HostelKey>,

    /// Selected [`room::Block`].
    pub block: Option<BlockKey>,

    /// Selected [`room::Floor`].
    pub floor: Option<FloorKey>,

    /// ID of the selected [`Room`].
    pub room: Option<room::Id>,

    /// Selected bed of the [`Room`].
    pub bed: Option<BedIndex>,
}

define_kind! {
    #[doc = "Part of a [`Selection`]."]
    enum Selector {
        #[doc = "[`Selection::hostel`]."]
        Hostel = 1,

        #[doc = "[`Selection::block`]."]
        Block = 2,

        #[doc = "[`Selection::floor`]."]
        Floor = 3,

        #[doc = "[`Selection::room`]."]
        Room = 4,

        #[doc = "[`Selection::bed`]."]
        Bed = 5,
    }
}

impl Selection {
    /// Checks this [`Selection`] to be complete and to point to a free bed
    /// of the provided [`Room`] `snapshot`, and turns it into an
    /// [`allocation::Submission`] of the provided [`User`].
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::EmptySelector`] if any [`Selector`] is missing;
    /// - [`ExecutionError::SelectionMismatch`] if the `snapshot` is not the
    ///   selected [`Room`];
    /// - [`ExecutionError::BedUnavailable`] if the selected bed is not free.
    pub fn check(
        &self,
        student_id: user::Id,
        snapshot: &Room,
    ) -> Result<allocation::Submission, ExecutionError> {
        use ExecutionError as E;

        let empty = E::EmptySelector;
        let hostel = self.hostel.as_ref().ok_or(empty(Selector::Hostel))?;
        let block = self.block.as_ref().ok_or(empty(Selector::Block))?;
        let floor = self.floor.as_ref().ok_or(empty(Selector::Floor))?;
        let room_id = self.room.ok_or(empty(Selector::Room))?;
        let bed = self.bed.ok_or(empty(Selector::Bed))?;

        let snapshot_hostel =
            HostelKey::from(snapshot.hostel.as_ref().map(|h| h.name.clone()));
        if *hostel != snapshot_hostel {
            return Err(E::SelectionMismatch(Selector::Hostel));
        }
        if *block != BlockKey::from(snapshot.block.clone()) {
            return Err(E::SelectionMismatch(Selector::Block));
        }
        if *floor != FloorKey::from(snapshot.floor) {
            return Err(E::SelectionMismatch(Selector::Floor));
        }
        if room_id != snapshot.id {
            return Err(E::SelectionMismatch(Selector::Room));
        }
        if !Occupancy::from(snapshot).is_free(bed) {
            return Err(E::BedUnavailable(bed));
        }

        Ok(allocation::Submission {
            student_id,
            room_id,
            bed,
        })
    }
}

impl<B> Command<SubmitAllocationRequest> for Service<B>
where
    B: Backend<
        Insert<allocation::Submission>,
        Ok = AllocationRequest,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = AllocationRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubmitAllocationRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitAllocationRequest {
            student_id,
            selection,
            snapshot,
        } = cmd;

        let submission = selection
            .check(student_id, &snapshot)
            .map_err(tracerr::wrap!())?;

        match self.backend().execute(Insert(submission)).await {
            Ok(request) => Ok(request),
            Err(e) if e.as_ref().is_conflict() || e.as_ref().is_not_found() => {
                Err(tracerr::new!(E::SelectionUnavailable(
                    submission.room_id
                )))
            }
            Err(e) => Err(e).map_err(tracerr::map_from_and_wrap!(=> E)),
        }
    }
}

/// Error of [`SubmitAllocationRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// Selected bed is not free in the [`Room`] snapshot.
    #[display("Bed `{_0}` is not free")]
    #[from(ignore)]
    BedUnavailable(#[error(not(source))] BedIndex),

    /// [`Selection`] is incomplete.
    #[display("`{_0}` is not selected")]
    #[from(ignore)]
    EmptySelector(#[error(not(source))] Selector),

    /// [`Room`] snapshot doesn't correspond to the [`Selection`].
    #[display("Selected `{_0}` doesn't match the `Room`")]
    #[from(ignore)]
    SelectionMismatch(#[error(not(source))] Selector),

    /// Selected bed of the [`Room`] has been taken or removed since the
    /// snapshot.
    #[display("Selection in `Room(id: {_0})` is no longer available")]
    #[from(ignore)]
    SelectionUnavailable(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        domain::{
            allocation, hostel,
            room::{self, Block, Capacity, Number},
            user, AllocationRequest, Room,
        },
        infra::{memory::Seed, Backend as _, Memory},
        read::locator::Key,
        Command as _, Config, Service,
    };

    use super::{ExecutionError, Selection, Selector, SubmitAllocationRequest};

    fn room(slots: Vec<Option<user::Id>>) -> Room {
        Room {
            id: room::Id::new(),
            hostel: Some(hostel::Ref {
                id: hostel::Id::new(),
                name: hostel::Name::new("Queens").unwrap(),
            }),
            block: Some(Block::new("A").unwrap()),
            floor: None,
            number: Number::new("A1").unwrap(),
            capacity: Capacity::new(4).unwrap(),
            price: None,
            slots,
        }
    }

    fn selection(room: &Room, bed: u16) -> Selection {
        Selection {
            hostel: Some(Key::Known(hostel::Name::new("Queens").unwrap())),
            block: Some(Key::Known(Block::new("A").unwrap())),
            floor: Some(Key::Unknown),
            room: Some(room.id),
            bed: Some(bed),
        }
    }

    fn service(room: &Room) -> Service<Memory> {
        Service::new(
            Config::default(),
            Memory::new(Seed {
                rooms: vec![room.clone()],
                ..Seed::default()
            }),
        )
    }

    #[tokio::test]
    async fn creates_pending_request() {
        let room = room(vec![Some(user::Id::new())]);
        let service = service(&room);
        let student_id = user::Id::new();

        let request = service
            .execute(SubmitAllocationRequest {
                student_id,
                selection: selection(&room, 2),
                snapshot: room.clone(),
            })
            .await
            .unwrap();

        assert_eq!(request.status, allocation::Status::Pending);
        assert_eq!(request.student_id, student_id);
        assert_eq!(request.bed, 2);
        let stored = service
            .backend()
            .execute(Select(By::<Vec<AllocationRequest>, _>::new(())))
            .await
            .unwrap();
        assert_eq!(stored, [request]);
    }

    #[tokio::test]
    async fn rejects_occupied_bed_before_any_network_call() {
        let (a, b) = (user::Id::new(), user::Id::new());
        let room = room(vec![Some(a), None, None, Some(b)]);
        let service = service(&room);

        let err = service
            .execute(SubmitAllocationRequest {
                student_id: user::Id::new(),
                selection: selection(&room, 3),
                snapshot: room.clone(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::BedUnavailable(3)));
        assert_eq!(service.backend().operations(), 0);
    }

    #[tokio::test]
    async fn rejects_incomplete_selection() {
        let room = room(vec![]);
        let service = service(&room);

        let err = service
            .execute(SubmitAllocationRequest {
                student_id: user::Id::new(),
                selection: Selection {
                    bed: None,
                    ..selection(&room, 0)
                },
                snapshot: room.clone(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::EmptySelector(Selector::Bed),
        ));
        assert_eq!(service.backend().operations(), 0);
    }

    #[tokio::test]
    async fn rejects_mismatching_snapshot() {
        let room = room(vec![]);
        let service = service(&room);

        let err = service
            .execute(SubmitAllocationRequest {
                student_id: user::Id::new(),
                selection: Selection {
                    floor: Some(Key::Known(3)),
                    ..selection(&room, 0)
                },
                snapshot: room.clone(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::SelectionMismatch(Selector::Floor),
        ));
    }

    #[tokio::test]
    async fn reports_stale_snapshot_as_unavailable() {
        let stale = room(vec![]);
        let fresh = Room {
            slots: vec![Some(user::Id::new())],
            ..stale.clone()
        };
        let service = service(&fresh);

        let err = service
            .execute(SubmitAllocationRequest {
                student_id: user::Id::new(),
                selection: selection(&stale, 0),
                snapshot: stale.clone(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::SelectionUnavailable(id) if *id == stale.id,
        ));
    }
}
