//! [`Mutation`]s definitions.

use service::{
    command::{
        self,
        submit_allocation_request::{Selection, Selector},
        Command as _,
    },
    domain::{
        allocation,
        room::{self, BedIndex},
        user::{self, Capability},
        AllocationRequest, Room,
    },
};

use crate::{
    api::{Query, RequestError, RoomError},
    args::Location,
    define_error, AsError, Context, Error,
};

/// Root of all the mutating commands.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "CLI mutation";

    /// Requests the selected bed for the current `User`.
    ///
    /// The selection is checked against a freshly fetched [`Room`] first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SELECTION_INCOMPLETE` - any part of the selection is missing;
    /// - `SELECTION_MISMATCH` - the selected location is not the one of the
    ///                          selected [`Room`];
    /// - `BED_UNAVAILABLE` - the selected bed is not free;
    /// - `SELECTION_UNAVAILABLE` - the selected bed has been taken meanwhile;
    /// - `ROOM_NOT_EXISTS` - the selected [`Room`] does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            bed = ?bed,
            cli.name = "request submit",
            otel.name = Self::SPAN_NAME,
            room = ?room,
        ),
    )]
    pub async fn submit_request(
        location: Location,
        room: Option<room::Id>,
        bed: Option<BedIndex>,
        ctx: &Context,
    ) -> Result<AllocationRequest, Error> {
        let student_id = ctx.authorize(Capability::RequestRoom)?.user_id;
        let room_id = room.ok_or_else(|| {
            command::submit_allocation_request::ExecutionError::EmptySelector(
                Selector::Room,
            )
            .into_error()
        })?;
        let snapshot = Query::room(room_id, ctx).await?;

        let Location {
            hostel,
            block,
            floor,
        } = location;
        ctx.service()
            .execute(command::SubmitAllocationRequest {
                student_id,
                selection: Selection {
                    hostel,
                    block,
                    floor,
                    room,
                    bed,
                },
                snapshot,
            })
            .await
            .map_err(AsError::into_error)
    }

    /// Approves the pending allocation request, giving the requested bed to
    /// its student.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REQUEST_NOT_EXISTS` - the request with the specified ID does not
    ///                          exist;
    /// - `REQUEST_DECIDED` - the request is approved or declined already;
    /// - `BED_OCCUPIED` - the requested bed is not free anymore, the request
    ///                    stays pending;
    /// - `BED_NOT_EXISTS` - the [`Room`] capacity has shrunk below the
    ///                      requested bed, the request stays pending.
    #[tracing::instrument(
        skip_all,
        fields(
            cli.name = "request approve",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn approve_request(
        id: allocation::Id,
        ctx: &Context,
    ) -> Result<AllocationRequest, Error> {
        _ = ctx.authorize(Capability::DecideRequests)?;

        ctx.service()
            .execute(command::ApproveAllocationRequest { request_id: id })
            .await
            .map_err(AsError::into_error)
    }

    /// Declines the pending allocation request.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REQUEST_NOT_EXISTS` - the request with the specified ID does not
    ///                          exist;
    /// - `REQUEST_DECIDED` - the request is approved or declined already.
    #[tracing::instrument(
        skip_all,
        fields(
            cli.name = "request decline",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn decline_request(
        id: allocation::Id,
        ctx: &Context,
    ) -> Result<AllocationRequest, Error> {
        _ = ctx.authorize(Capability::DecideRequests)?;

        ctx.service()
            .execute(command::DeclineAllocationRequest { request_id: id })
            .await
            .map_err(AsError::into_error)
    }

    /// Assigns the student into the bed of the [`Room`] directly.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BED_OUT_OF_RANGE` - the [`Room`] has no such bed;
    /// - `BED_OCCUPIED` - the bed is occupied already;
    /// - `ROOM_NOT_EXISTS` - the [`Room`] does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            bed = %bed,
            cli.name = "assign",
            otel.name = Self::SPAN_NAME,
            room = %room_id,
            student = %student_id,
        ),
    )]
    pub async fn assign(
        student_id: user::Id,
        room_id: room::Id,
        bed: BedIndex,
        ctx: &Context,
    ) -> Result<Room, Error> {
        _ = ctx.authorize(Capability::AssignRooms)?;

        ctx.service()
            .execute(command::AssignStudent {
                student_id,
                room_id,
                bed,
            })
            .await
            .map_err(AsError::into_error)
    }

    /// Vacates the bed the student occupies in the [`Room`].
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `STUDENT_NOT_OCCUPANT` - the student occupies no bed of the
    ///                            [`Room`];
    /// - `ROOM_NOT_EXISTS` - the [`Room`] does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            cli.name = "unassign",
            otel.name = Self::SPAN_NAME,
            room = %room_id,
            student = %student_id,
        ),
    )]
    pub async fn unassign(
        room_id: room::Id,
        student_id: user::Id,
        ctx: &Context,
    ) -> Result<Room, Error> {
        _ = ctx.authorize(Capability::AssignRooms)?;

        ctx.service()
            .execute(command::UnassignStudent {
                room_id,
                student_id,
            })
            .await
            .map_err(AsError::into_error)
    }
}

define_error! {
    enum BedError {
        #[code = "BED_OCCUPIED"]
        #[kind = Conflict]
        #[message = "Bed is occupied already"]
        Occupied,
    }
}

impl AsError for command::submit_allocation_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SELECTION_INCOMPLETE"]
                #[kind = Validation]
                #[message = "Selection is incomplete"]
                Incomplete,

                #[code = "SELECTION_MISMATCH"]
                #[kind = Validation]
                #[message = "Selection doesn't match the selected `Room`"]
                Mismatch,

                #[code = "BED_UNAVAILABLE"]
                #[kind = Validation]
                #[message = "Selected bed is not free"]
                BedUnavailable,

                #[code = "SELECTION_UNAVAILABLE"]
                #[kind = Validation]
                #[message = "Selection is no longer available"]
                Unavailable,
            }
        }

        match self {
            Self::Backend(e) => e.try_as_error(),
            Self::BedUnavailable(bed) => Some(
                crate::Error::from(Error::BedUnavailable).with_details(bed),
            ),
            Self::EmptySelector(s) => {
                Some(crate::Error::from(Error::Incomplete).with_details(s))
            }
            Self::SelectionMismatch(s) => {
                Some(crate::Error::from(Error::Mismatch).with_details(s))
            }
            Self::SelectionUnavailable(_) => Some(Error::Unavailable.into()),
        }
    }
}

impl AsError for command::approve_allocation_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BED_NOT_EXISTS"]
                #[kind = Conflict]
                #[message = "`Room` has no such bed anymore"]
                Gone,
            }
        }

        match self {
            Self::AlreadyDecided(_) => Some(RequestError::Decided.into()),
            Self::Backend(e) => e.try_as_error(),
            Self::BedNotExists(_) => {
                Some(crate::Error::from(Error::Gone).with_details(self))
            }
            Self::BedOccupied(_) => Some(BedError::Occupied.into()),
            Self::RequestNotExists(_) => Some(RequestError::NotExists.into()),
            Self::RoomNotExists(_) => Some(RoomError::NotExists.into()),
        }
    }
}

impl AsError for command::decline_allocation_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::AlreadyDecided(_) | Self::DecidedMeanwhile(_) => {
                Some(RequestError::Decided.into())
            }
            Self::Backend(e) => e.try_as_error(),
            Self::RequestNotExists(_) => Some(RequestError::NotExists.into()),
        }
    }
}

impl AsError for command::assign_student::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BED_OUT_OF_RANGE"]
                #[kind = Validation]
                #[message = "`Room` has no such bed"]
                OutOfRange,
            }
        }

        match self {
            Self::Backend(e) => e.try_as_error(),
            Self::BedOccupied(_) => Some(BedError::Occupied.into()),
            Self::BedOutOfRange { .. } => Some(
                crate::Error::from(Error::OutOfRange).with_details(self),
            ),
            Self::RoomNotExists(_) => Some(RoomError::NotExists.into()),
        }
    }
}

impl AsError for command::unassign_student::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "STUDENT_NOT_OCCUPANT"]
                #[kind = NotFound]
                #[message = "Student occupies no bed of the `Room`"]
                NotOccupant,
            }
        }

        match self {
            Self::Backend(e) => e.try_as_error(),
            Self::RoomNotExists(_) => Some(RoomError::NotExists.into()),
            Self::StudentNotOccupant(_) => Some(Error::NotOccupant.into()),
        }
    }
}
