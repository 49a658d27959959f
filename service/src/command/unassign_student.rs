//! [`Command`] for unassigning a student from a [`Room`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        room::{self, Occupant},
        user, Room,
    },
    infra::{backend, Backend},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for vacating the first bed of a [`Room`] occupied by the
/// provided student.
///
/// Returns the [`Room`] re-fetched after the unassignment.
#[derive(Clone, Copy, Debug)]
pub struct UnassignStudent {
    /// ID of the [`Room`] to unassign from.
    pub room_id: room::Id,

    /// ID of the [`User`] to unassign.
    pub student_id: user::Id,
}

impl<B> Command<UnassignStudent> for Service<B>
where
    B: Backend<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<backend::Error>,
        > + Backend<
            Delete<Occupant>,
            Ok = (),
            Err = Traced<backend::Error>,
        >,
{
    type Ok = Room;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UnassignStudent,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UnassignStudent {
            room_id,
            student_id,
        } = cmd;

        _ = self
            .backend()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?
            .bed_of(student_id)
            .ok_or(E::StudentNotOccupant(student_id))
            .map_err(tracerr::wrap!())?;

        match self
            .backend()
            .execute(Delete(Occupant {
                room_id,
                student_id,
            }))
            .await
        {
            Ok(()) => {}
            Err(e) if e.as_ref().is_not_found() => {
                return Err(tracerr::new!(E::StudentNotOccupant(student_id)));
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

/// Error of [`UnassignStudent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    #[from(ignore)]
    RoomNotExists(#[error(not(source))] room::Id),

    /// [`User`] occupies no bed of the [`Room`].
    #[display("`User(id: {_0})` occupies no bed of the `Room`")]
    #[from(ignore)]
    StudentNotOccupant(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        domain::{
            room::{self, Capacity, Number},
            user, Room,
        },
        infra::{memory::Seed, Backend as _, Memory},
        read::Occupancy,
        Command as _, Config, Service,
    };

    use super::{ExecutionError, UnassignStudent};

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
            floor: None,
            number: Number::new("7").unwrap(),
            capacity: Capacity::new(4).unwrap(),
            price: None,
            slots,
        }
    }

    #[tokio::test]
    async fn vacates_the_bed() {
        let (a, b) = (user::Id::new(), user::Id::new());
        let room = room(vec![Some(a), None, None, Some(b)]);
        let service = service(&room);

        let fresh = service
            .execute(UnassignStudent {
                room_id: room.id,
                student_id: b,
            })
            .await
            .unwrap();

        assert_eq!(fresh.slots, [Some(a), None, None, None]);
        assert_eq!(Occupancy::from(&fresh).free_beds, [1, 2, 3]);
    }

    #[tokio::test]
    async fn fails_for_non_occupant_leaving_slots_unchanged() {
        let room = room(vec![Some(user::Id::new())]);
        let service = service(&room);
        let stranger = user::Id::new();

        let err = service
            .execute(UnassignStudent {
                room_id: room.id,
                student_id: stranger,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::StudentNotOccupant(id) if *id == stranger,
        ));
        let fresh = service
            .backend()
            .execute(Select(By::<Option<Room>, _>::new(room.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fresh.slots, room.slots);
    }
}
