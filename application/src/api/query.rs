//! [`Query`]s definitions.

use service::{
    domain::{
        room,
        user::{Capability, User},
        Hostel, Room,
    },
    query,
    read::{self, allocation::list},
    Query as _,
};

use crate::{
    api::{PaginationError, RoomError},
    args::{Location, Requests},
    AsError, Context, Error,
};

/// Root of all the reading commands.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "CLI query";

    /// Returns the currently authenticated [`User`].
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - no session token is configured;
    /// - `USER_NOT_EXISTS` - the [`User`] of the session does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            cli.name = "whoami",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn whoami(ctx: &Context) -> Result<User, Error> {
        ctx.current_user().await
    }

    /// Returns all the [`Hostel`]s.
    #[tracing::instrument(
        skip_all,
        fields(
            cli.name = "hostels",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn hostels(ctx: &Context) -> Result<Vec<Hostel>, Error> {
        ctx.service()
            .execute(query::hostels::All::all())
            .await
            .map_err(AsError::into_error)
    }

    /// Returns the [`Room`]s in the provided [`Location`], ordered by it.
    #[tracing::instrument(
        skip_all,
        fields(
            block = ?location.block,
            cli.name = "rooms",
            floor = ?location.floor,
            hostel = ?location.hostel,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rooms(
        location: &Location,
        ctx: &Context,
    ) -> Result<Vec<Room>, Error> {
        let Location {
            hostel,
            block,
            floor,
        } = location;

        Ok(Self::summary(ctx)
            .await?
            .narrow(hostel.as_ref(), block.as_ref(), floor.as_ref())
            .cloned()
            .collect())
    }

    /// Returns the [`Room`] with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_EXISTS` - the [`Room`] with the specified ID does not
    ///                       exist.
    #[tracing::instrument(
        skip_all,
        fields(
            cli.name = "room",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn room(id: room::Id, ctx: &Context) -> Result<Room, Error> {
        ctx.service()
            .execute(query::room::ById::by(id))
            .await
            .map_err(AsError::into_error)?
            .ok_or_else(|| RoomError::NotExists.into())
    }

    /// Returns all the [`Room`]s grouped into a [`read::Index`].
    #[tracing::instrument(
        skip_all,
        fields(
            cli.name = "summary",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn summary(ctx: &Context) -> Result<read::Index, Error> {
        ctx.service()
            .execute(query::rooms::Index)
            .await
            .map_err(AsError::into_error)
    }

    /// Fetches the page of allocation requests, oldest first.
    ///
    /// Without [`Capability::ViewRequestQueue`] only the own requests of the
    /// current [`User`] are returned.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - no session token is configured;
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?requests.after,
            before = ?requests.before,
            cli.name = "requests",
            first = ?requests.first,
            last = ?requests.last,
            otel.name = Self::SPAN_NAME,
            status = ?requests.status,
        ),
    )]
    pub async fn requests(
        requests: Requests,
        ctx: &Context,
    ) -> Result<list::Page, Error> {
        let Requests {
            status,
            student,
            room,
            first,
            after,
            last,
            before,
        } = requests;

        let session = ctx.current_session()?;
        let student_id = if session.role.can(Capability::ViewRequestQueue) {
            student
        } else {
            Some(session.user_id)
        };

        let arguments = list::Arguments::new(
            first,
            after,
            last,
            before,
            ctx.service().config().page_size,
        )
        .ok_or_else(|| Error::from(PaginationError::Ambiguous))?;

        ctx.service()
            .execute(query::allocation_requests::List(list::Selector {
                arguments,
                filter: list::Filter {
                    status,
                    student_id,
                    room_id: room,
                },
            }))
            .await
            .map_err(AsError::into_error)
    }
}
