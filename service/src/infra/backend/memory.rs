//! In-memory [`Backend`] implementation.
//!
//! Keeps the whole state under a single lock, so every mutation of the
//! occupant slots (direct assignment or request approval) is one critical
//! section, as the REST backend is expected to do.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use common::operations::{By, Delete, Insert, Select, Update};
use tokio::sync::{Mutex, MutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        allocation,
        room::{self, BedIndex},
        user, AllocationRequest, Hostel, Room, User,
    },
    infra::{
        backend::{self, Rejection},
        Backend,
    },
};

/// In-memory [`Backend`] client.
///
/// Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// State of this [`Memory`] backend.
    state: Arc<Mutex<Seed>>,

    /// Number of operations executed so far.
    operations: Arc<AtomicUsize>,
}

/// State to populate a [`Memory`] backend with.
#[derive(Clone, Debug, Default)]
pub struct Seed {
    /// [`Hostel`]s.
    pub hostels: Vec<Hostel>,

    /// [`Room`]s, in listing order.
    pub rooms: Vec<Room>,

    /// [`AllocationRequest`]s, in submission order.
    pub requests: Vec<AllocationRequest>,

    /// [`User`]s.
    pub users: Vec<User>,
}

impl Memory {
    /// Creates a new [`Memory`] backend populated with the provided [`Seed`].
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self {
            state: Arc::new(Mutex::new(seed)),
            operations: Arc::default(),
        }
    }

    /// Returns the number of operations executed by this [`Memory`] backend.
    #[must_use]
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Starts a new operation over the state.
    async fn begin(&self) -> MutexGuard<'_, Seed> {
        _ = self.operations.fetch_add(1, Ordering::SeqCst);
        self.state.lock().await
    }
}

impl From<Seed> for Memory {
    fn from(seed: Seed) -> Self {
        Self::new(seed)
    }
}

/// Writes the provided `student` into the `bed` of the provided [`Room`].
fn occupy(
    room: &mut Room,
    bed: BedIndex,
    student: user::Id,
) -> Result<(), Rejection> {
    if !room.capacity.contains(bed) {
        return Err(Rejection::Invalid(format!(
            "bed `{bed}` is out of `Room` capacity `{}`",
            room.capacity,
        )));
    }
    if !room.is_bed_free(bed) {
        return Err(Rejection::Conflict(format!("bed `{bed}` is occupied")));
    }
    let at = usize::from(bed);
    if room.slots.len() <= at {
        room.slots.resize(at + 1, None);
    }
    room.slots[at] = Some(student);
    Ok(())
}

impl Backend<Select<By<Vec<Hostel>, ()>>> for Memory {
    type Ok = Vec<Hostel>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Hostel>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.begin().await.hostels.clone())
    }
}

impl Backend<Select<By<Vec<Room>, ()>>> for Memory {
    type Ok = Vec<Room>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Room>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.begin().await.rooms.clone())
    }
}

impl Backend<Select<By<Option<Room>, room::Id>>> for Memory {
    type Ok = Option<Room>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.begin().await.rooms.iter().find(|r| r.id == id).cloned())
    }
}

impl Backend<Select<By<Vec<AllocationRequest>, ()>>> for Memory {
    type Ok = Vec<AllocationRequest>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<AllocationRequest>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.begin().await.requests.clone())
    }
}

impl Backend<Select<By<Option<AllocationRequest>, allocation::Id>>>
    for Memory
{
    type Ok = Option<AllocationRequest>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<AllocationRequest>, allocation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .begin()
            .await
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

impl Backend<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.begin().await.users.iter().find(|u| u.id == id).cloned())
    }
}

impl Backend<Insert<allocation::Submission>> for Memory {
    type Ok = AllocationRequest;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Insert(submission): Insert<allocation::Submission>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.begin().await;

        let room = state
            .rooms
            .iter()
            .find(|r| r.id == submission.room_id)
            .ok_or(Rejection::NotFound)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;
        if !room.capacity.contains(submission.bed) {
            return Err(tracerr::new!(backend::Error::from(
                Rejection::Invalid(format!(
                    "bed `{}` is out of `Room` capacity `{}`",
                    submission.bed, room.capacity,
                ))
            )));
        }
        if !room.is_bed_free(submission.bed) {
            return Err(tracerr::new!(backend::Error::from(
                Rejection::Conflict(format!(
                    "bed `{}` is occupied",
                    submission.bed,
                ))
            )));
        }

        let request = AllocationRequest::submitted(submission);
        state.requests.push(request.clone());
        Ok(request)
    }
}

impl Backend<Update<allocation::Decision>> for Memory {
    type Ok = AllocationRequest;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Update(decision): Update<allocation::Decision>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.begin().await;
        let Seed {
            rooms, requests, ..
        } = &mut *state;

        let request = requests
            .iter_mut()
            .find(|r| r.id == decision.request_id)
            .ok_or(Rejection::NotFound)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;

        let mut decided = request.clone();
        _ = decided
            .decide(decision.verdict)
            .map_err(|e| Rejection::Conflict(e.to_string()))
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;

        if decision.verdict == allocation::Verdict::Approve {
            let room = rooms
                .iter_mut()
                .find(|r| r.id == decided.room_id)
                .ok_or(Rejection::NotFound)
                .map_err(tracerr::from_and_wrap!(=> backend::Error))?;
            occupy(room, decided.bed, decided.student_id)
                .map_err(tracerr::from_and_wrap!(=> backend::Error))?;
        }

        *request = decided;
        Ok(request.clone())
    }
}

impl Backend<Insert<room::Assignment>> for Memory {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Insert(assignment): Insert<room::Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.begin().await;

        let room = state
            .rooms
            .iter_mut()
            .find(|r| r.id == assignment.room_id)
            .ok_or(Rejection::NotFound)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;
        occupy(room, assignment.bed, assignment.student_id)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))
    }
}

impl Backend<Delete<room::Occupant>> for Memory {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Delete(occupant): Delete<room::Occupant>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.begin().await;

        let room = state
            .rooms
            .iter_mut()
            .find(|r| r.id == occupant.room_id)
            .ok_or(Rejection::NotFound)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;
        let bed = room
            .bed_of(occupant.student_id)
            .ok_or(Rejection::NotFound)
            .map_err(tracerr::from_and_wrap!(=> backend::Error))?;
        if let Some(slot) = room.slots.get_mut(usize::from(bed)) {
            *slot = None;
        }
        Ok(())
    }
}


#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Insert, Select, Update};

    use crate::{
        domain::{
            allocation::{self, Decision, Submission, Verdict},
            room::{self, Assignment, Capacity, Number, Occupant},
            user, AllocationRequest, Room,
        },
        infra::{backend::Rejection, Backend as _},
    };

    use super::{Memory, Seed};

    fn room(beds: u16, slots: Vec<Option<user::Id>>) -> Room {
        Room {
            id: room::Id::new(),
            hostel: None,
            block: None,
            floor: None,
            number: Number::new("1").unwrap(),
            capacity: Capacity::new(beds).unwrap(),
            price: None,
            slots,
        }
    }

    async fn room_of(backend: &Memory, id: room::Id) -> Room {
        backend
            .execute(Select(By::<Option<Room>, _>::new(id)))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn approval_writes_the_slot() {
        let student = user::Id::new();
        let room = room(2, vec![]);
        let backend = Memory::new(Seed {
            rooms: vec![room.clone()],
            ..Seed::default()
        });

        let request = backend
            .execute(Insert(Submission {
                student_id: student,
                room_id: room.id,
                bed: 1,
            }))
            .await
            .unwrap();
        let approved = backend
            .execute(Update(Decision {
                request_id: request.id,
                verdict: Verdict::Approve,
            }))
            .await
            .unwrap();

        assert_eq!(approved.status, allocation::Status::Approved);
        assert_eq!(room_of(&backend, room.id).await.slots, [None, Some(student)]);
    }

    #[tokio::test]
    async fn approval_of_taken_bed_keeps_request_pending() {
        let room = room(1, vec![]);
        let backend = Memory::new(Seed {
            rooms: vec![room.clone()],
            ..Seed::default()
        });
        let request = backend
            .execute(Insert(Submission {
                student_id: user::Id::new(),
                room_id: room.id,
                bed: 0,
            }))
            .await
            .unwrap();
        backend
            .execute(Insert(Assignment {
                student_id: user::Id::new(),
                room_id: room.id,
                bed: 0,
            }))
            .await
            .unwrap();

        let err = backend
            .execute(Update(Decision {
                request_id: request.id,
                verdict: Verdict::Approve,
            }))
            .await
            .unwrap_err();

        assert!(err.as_ref().is_conflict());
        let stored = backend
            .execute(Select(By::<Option<AllocationRequest>, _>::new(
                request.id,
            )))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_pending());
    }

    #[tokio::test]
    async fn removes_only_first_occurrence() {
        let student = user::Id::new();
        let room = room(3, vec![Some(student), None, Some(student)]);
        let backend = Memory::new(Seed {
            rooms: vec![room.clone()],
            ..Seed::default()
        });

        backend
            .execute(Delete(Occupant {
                room_id: room.id,
                student_id: student,
            }))
            .await
            .unwrap();

        assert_eq!(room_of(&backend, room.id).await.slots, [
            None,
            None,
            Some(student)
        ]);
        assert_eq!(backend.operations(), 2);
    }

    #[tokio::test]
    async fn rejects_out_of_capacity_assignment() {
        let room = room(2, vec![]);
        let backend = Memory::new(Seed {
            rooms: vec![room.clone()],
            ..Seed::default()
        });

        let err = backend
            .execute(Insert(Assignment {
                student_id: user::Id::new(),
                room_id: room.id,
                bed: 2,
            }))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref().rejection(),
            Some(Rejection::Invalid(_)),
        ));
    }
}
