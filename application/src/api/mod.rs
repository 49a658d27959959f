//! Command-line API definitions.

mod mutation;
mod query;

use crate::{
    args::{self, Command},
    define_error, render, Context, Error,
};

pub use self::{mutation::Mutation, query::Query};

/// Executes the provided [`Command`] rendering its outcome.
///
/// # Errors
///
/// Errors if the [`Command`] fails.
pub async fn execute(
    command: Command,
    ctx: &Context,
) -> Result<render::Table, Error> {
    Ok(match command {
        Command::Whoami => {
            render::user(&Query::whoami(ctx).await?, &ctx.capabilities())
        }
        Command::Hostels => render::hostels(&Query::hostels(ctx).await?),
        Command::Rooms(location) => {
            render::rooms(&Query::rooms(&location, ctx).await?)
        }
        Command::Room { id } => render::beds(&Query::room(id, ctx).await?),
        Command::Summary => render::summary(&Query::summary(ctx).await?),
        Command::Requests(requests) => {
            render::page(&Query::requests(requests, ctx).await?)
        }
        Command::Request(args::Request::Submit {
            location,
            room,
            bed,
        }) => render::requests([
            &Mutation::submit_request(location, room, bed, ctx).await?
        ]),
        Command::Request(args::Request::Approve { id }) => {
            render::requests([&Mutation::approve_request(id, ctx).await?])
        }
        Command::Request(args::Request::Decline { id }) => {
            render::requests([&Mutation::decline_request(id, ctx).await?])
        }
        Command::Assign { student, room, bed } => {
            render::beds(&Mutation::assign(student, room, bed, ctx).await?)
        }
        Command::Unassign { room, student } => {
            render::beds(&Mutation::unassign(room, student, ctx).await?)
        }
    })
}

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[kind = Validation]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}

define_error! {
    enum RequestError {
        #[code = "REQUEST_NOT_EXISTS"]
        #[kind = NotFound]
        #[message = "`AllocationRequest` with the specified ID does not exist"]
        NotExists,

        #[code = "REQUEST_DECIDED"]
        #[kind = Conflict]
        #[message = "`AllocationRequest` is decided already"]
        Decided,
    }
}

define_error! {
    enum RoomError {
        #[code = "ROOM_NOT_EXISTS"]
        #[kind = NotFound]
        #[message = "`Room` with the specified ID does not exist"]
        NotExists,
    }
}
