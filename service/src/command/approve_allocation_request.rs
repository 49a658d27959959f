//! [`Command`] for approving an [`AllocationRequest`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        allocation::{self, Decision, Verdict},
        room::{self, BedIndex},
        AllocationRequest, Room,
    },
    infra::{backend, Backend},
    Service,
};

use super::Command;

/// [`Command`] for approving a pending [`AllocationRequest`], which gives the
/// requested bed of the [`Room`] to the student.
///
/// If the bed has been taken meanwhile, the [`AllocationRequest`] stays
/// pending and no automatic decline happens.
#[derive(Clone, Copy, Debug, From)]
pub struct ApproveAllocationRequest {
    /// ID of the [`AllocationRequest`] to approve.
    pub request_id: allocation::Id,
}

impl<B> Command<ApproveAllocationRequest> for Service<B>
where
    B: Backend<
            Select<By<Option<AllocationRequest>, allocation::Id>>,
            Ok = Option<AllocationRequest>,
            Err = Traced<backend::Error>,
        > + Backend<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<backend::Error>,
        > + Backend<
            Update<Decision>,
            Ok = AllocationRequest,
            Err = Traced<backend::Error>,
        >,
{
    type Ok = AllocationRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ApproveAllocationRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApproveAllocationRequest { request_id } = cmd;

        let mut request = self
            .backend()
            .execute(Select(By::<Option<AllocationRequest>, _>::new(
                request_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RequestNotExists(request_id))
            .map_err(tracerr::wrap!())?;
        let bed = request.bed;

        // Checked locally first, so the `Room` is not fetched in vain.
        _ = request
            .decide(Verdict::Approve)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        // Re-fetched, as the bed may be taken since the submission.
        let room = self
            .backend()
            .execute(Select(By::<Option<Room>, _>::new(request.room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(request.room_id))
            .map_err(tracerr::wrap!())?;
        match room.slot(bed) {
            Some(None) => {}
            Some(Some(_)) => return Err(tracerr::new!(E::BedOccupied(bed))),
            None => return Err(tracerr::new!(E::BedNotExists(bed))),
        }

        match self
            .backend()
            .execute(Update(Decision {
                request_id,
                verdict: Verdict::Approve,
            }))
            .await
        {
            Ok(request) => Ok(request),
            Err(e) if e.as_ref().is_conflict() => {
                Err(tracerr::new!(E::BedOccupied(bed)))
            }
            Err(e) if e.as_ref().is_not_found() => {
                Err(tracerr::new!(E::RequestNotExists(request_id)))
            }
            Err(e) => Err(e).map_err(tracerr::map_from_and_wrap!(=> E)),
        }
    }
}

/// Error of [`ApproveAllocationRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`AllocationRequest`] is decided already.
    #[display("{_0}")]
    AlreadyDecided(allocation::AlreadyDecided),

    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    Backend(backend::Error),

    /// Requested bed doesn't exist in the [`Room`] anymore.
    #[display("Bed `{_0}` does not exist in the `Room`")]
    #[from(ignore)]
    BedNotExists(#[error(not(source))] BedIndex),

    /// Requested bed is occupied by someone else meanwhile.
    #[display("Bed `{_0}` is occupied already")]
    #[from(ignore)]
    BedOccupied(#[error(not(source))] BedIndex),

    /// [`AllocationRequest`] with the provided ID does not exist.
    #[display("`AllocationRequest(id: {_0})` does not exist")]
    #[from(ignore)]
    RequestNotExists(#[error(not(source))] allocation::Id),

    /// Requested [`Room`] does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    #[from(ignore)]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            allocation::{self, Submission},
            room::{self, Assignment, Capacity, Number},
            user, AllocationRequest, Room,
        },
        infra::{
            memory::{lagging::Lagging, Seed},
            Backend as _, Memory,
        },
        Command as _, Config, Service,
    };

    use super::{ApproveAllocationRequest, ExecutionError};

    async fn submitted(
        beds: u16,
        bed: u16,
    ) -> (Service<Memory>, Room, AllocationRequest) {
        let room = Room {
            id: room::Id::new(),
            hostel: None,
            block: None,
            floor: None,
            number: Number::new("12").unwrap(),
            capacity: Capacity::new(beds).unwrap(),
            price: None,
            slots: vec![],
        };
        let service = Service::new(
            Config::default(),
            Memory::new(Seed {
                rooms: vec![room.clone()],
                ..Seed::default()
            }),
        );
        let request = service
            .backend()
            .execute(Insert(Submission {
                student_id: user::Id::new(),
                room_id: room.id,
                bed,
            }))
            .await
            .unwrap();
        (service, room, request)
    }

    async fn fresh(service: &Service<Memory>, id: room::Id) -> Room {
        service
            .backend()
            .execute(Select(By::<Option<Room>, _>::new(id)))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn gives_the_bed_to_the_student() {
        let (service, room, request) = submitted(2, 1).await;

        let approved = service
            .execute(ApproveAllocationRequest {
                request_id: request.id,
            })
            .await
            .unwrap();

        assert_eq!(approved.status, allocation::Status::Approved);
        assert_eq!(fresh(&service, room.id).await.slots, [
            None,
            Some(request.student_id)
        ]);
    }

    #[tokio::test]
    async fn keeps_request_pending_when_bed_is_taken() {
        let (service, room, request) = submitted(2, 0).await;
        let intruder = user::Id::new();
        service
            .backend()
            .execute(Insert(Assignment {
                student_id: intruder,
                room_id: room.id,
                bed: 0,
            }))
            .await
            .unwrap();

        let err = service
            .execute(ApproveAllocationRequest {
                request_id: request.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::BedOccupied(0)));
        let stored = service
            .backend()
            .execute(Select(By::<Option<AllocationRequest>, _>::new(
                request.id,
            )))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_pending());
        assert_eq!(fresh(&service, room.id).await.slots, [Some(intruder)]);
    }

    #[tokio::test]
    async fn keeps_request_pending_when_backend_finds_bed_taken() {
        let (service, room, request) = submitted(2, 1).await;
        let memory = service.backend().clone();
        let intruder = user::Id::new();
        memory
            .execute(Insert(Assignment {
                student_id: intruder,
                room_id: room.id,
                bed: 1,
            }))
            .await
            .unwrap();
        let service = Service::new(Config::default(), Lagging {
            memory: memory.clone(),
            room: room.clone(),
            request: None,
        });

        let err = service
            .execute(ApproveAllocationRequest {
                request_id: request.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::BedOccupied(1)));
        let stored = memory
            .execute(Select(By::<Option<AllocationRequest>, _>::new(
                request.id,
            )))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_pending());
        let room = memory
            .execute(Select(By::<Option<Room>, _>::new(room.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(room.slots, [None, Some(intruder)]);
    }

    #[tokio::test]
    async fn decides_only_once() {
        let (service, _, request) = submitted(1, 0).await;
        let cmd = ApproveAllocationRequest {
            request_id: request.id,
        };
        _ = service.execute(cmd).await.unwrap();

        let err = service.execute(cmd).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::AlreadyDecided(_)));
    }

    #[tokio::test]
    async fn fails_on_unknown_request() {
        let (service, ..) = submitted(1, 0).await;
        let id = allocation::Id::new();

        let err = service
            .execute(ApproveAllocationRequest { request_id: id })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RequestNotExists(e) if *e == id,
        ));
    }
}
