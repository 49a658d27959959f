//! [`Command`] for assigning a student into a [`Room`] bed.

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        room::{self, Assignment, BedIndex},
        user, Room,
    },
    infra::{backend, Backend},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for assigning a student directly into a [`Room`] bed,
/// bypassing the allocation workflow.
///
/// Returns the [`Room`] re-fetched after the assignment.
#[derive(Clone, Copy, Debug)]
pub struct AssignStudent {
    /// ID of the [`User`] to assign.
    pub student_id: user::Id,

    /// ID of the [`Room`] to assign into.
    pub room_id: room::Id,

    /// Bed of the [`Room`] to assign into.
    pub bed: BedIndex,
}

impl<B> Command<AssignStudent> for Service<B>
where
    B: Backend<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<backend::Error>,
        > + Backend<
            Insert<Assignment>,
            Ok = (),
            Err = Traced<backend::Error>,
        >,
{
    type Ok = Room;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AssignStudent) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignStudent {
            student_id,
            room_id,
            bed,
        } = cmd;

        let room = self
            .backend()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;
        match room.slot(bed) {
            Some(None) => {}
            Some(Some(_)) => return Err(tracerr::new!(E::BedOccupied(bed))),
            None => {
                return Err(tracerr::new!(E::BedOutOfRange {
                    bed,
                    capacity: room.capacity,
                }))
            }
        }

        match self
            .backend()
            .execute(Insert(Assignment {
                student_id,
                room_id,
                bed,
            }))
            .await
        {
            Ok(()) => {}
            Err(e) if e.as_ref().is_conflict() => {
                return Err(tracerr::new!(E::BedOccupied(bed)));
            }
            Err(e) if e.as_ref().is_not_found() => {
                return Err(tracerr::new!(E::RoomNotExists(room_id)));
            }
            Err(e) => {
                return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
            }
        }

        self.backend()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`AssignStudent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// Bed is occupied already.
    #[display("Bed `{_0}` is occupied already")]
    #[from(ignore)]
    BedOccupied(#[error(not(source))] BedIndex),

    /// Bed is beyond the [`Room`] capacity.
    #[display("Bed `{bed}` is out of `Room` capacity `{capacity}`")]
    #[from(ignore)]
    BedOutOfRange {
        /// Requested bed.
        bed: BedIndex,

        /// [`room::Capacity`] of the [`Room`].
        capacity: room::Capacity,
    },

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    #[from(ignore)]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            room::{self, Assignment, Capacity, Number},
            user, Room,
        },
        infra::{
            memory::{lagging::Lagging, Seed},
            Backend as _, Memory,
        },
        read::Occupancy,
        Command as _, Config, Service,
    };

    use super::{AssignStudent, ExecutionError};

    fn service(room: &Room) -> Service<Memory> {
        Service::new(
            Config::default(),
            Memory::new(Seed {
                rooms: vec![room.clone()],
                ..Seed::default()
            }),
        )
    }

    fn room(slots: Vec<Option<user::Id>>) -> Room {
        Room {
            id: room::Id::new(),
            hostel: None,
            block: None,
            floor: Some(1),
            number: Number::new("101").unwrap(),
            capacity: Capacity::new(4).unwrap(),
            price: None,
            slots,
        }
    }

    #[tokio::test]
    async fn returns_fresh_room() {
        let room = room(vec![]);
        let service = service(&room);
        let student_id = user::Id::new();

        let fresh = service
            .execute(AssignStudent {
                student_id,
                room_id: room.id,
                bed: 2,
            })
            .await
            .unwrap();

        assert_eq!(fresh.slot(2), Some(Some(student_id)));
        assert_eq!(Occupancy::from(&fresh).free_beds, [0, 1, 3]);
    }

    #[tokio::test]
    async fn concurrent_assignments_to_same_bed_conflict() {
        let room = room(vec![]);
        let service = service(&room);
        let assign = |student_id| {
            service.execute(AssignStudent {
                student_id,
                room_id: room.id,
                bed: 0,
            })
        };

        let (a, b) =
            tokio::join!(assign(user::Id::new()), assign(user::Id::new()));

        let (won, lost) = match (a, b) {
            (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
            (a, b) => panic!("expected exactly one winner: {a:?}, {b:?}"),
        };
        assert!(matches!(lost.as_ref(), ExecutionError::BedOccupied(0)));
        assert_eq!(Occupancy::from(&won).occupied, 1);
    }

    #[tokio::test]
    async fn bed_taken_after_snapshot_is_occupied() {
        let room = room(vec![]);
        let memory = service(&room).backend().clone();
        let winner = user::Id::new();
        memory
            .execute(Insert(Assignment {
                student_id: winner,
                room_id: room.id,
                bed: 0,
            }))
            .await
            .unwrap();
        let service = Service::new(Config::default(), Lagging {
            memory: memory.clone(),
            room: room.clone(),
            request: None,
        });

        let err = service
            .execute(AssignStudent {
                student_id: user::Id::new(),
                room_id: room.id,
                bed: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::BedOccupied(0)));
        assert_eq!(memory.operations(), 2);
        let fresh = memory
            .execute(Select(By::<Option<Room>, _>::new(room.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fresh.slots, [Some(winner)]);
        assert_eq!(Occupancy::from(&fresh).occupied, 1);
    }

    #[tokio::test]
    async fn rejects_bed_out_of_capacity() {
        let room = room(vec![]);
        let service = service(&room);

        let err = service
            .execute(AssignStudent {
                student_id: user::Id::new(),
                room_id: room.id,
                bed: 4,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::BedOutOfRange { bed: 4, .. },
        ));
        assert_eq!(service.backend().operations(), 1);
    }

    #[tokio::test]
    async fn fails_on_unknown_room() {
        let service = service(&room(vec![]));
        let room_id = room::Id::new();

        let err = service
            .execute(AssignStudent {
                student_id: user::Id::new(),
                room_id,
                bed: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RoomNotExists(id) if *id == room_id,
        ));
    }
}
