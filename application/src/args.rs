//! [`Args`] definitions.

use std::{fmt, str::FromStr};

use clap::{Parser, Subcommand};
use service::{
    domain::{
        allocation,
        room::{self, BedIndex},
        user,
    },
    read::locator::{BlockKey, FloorKey, HostelKey, Key},
};

/// Client of the hostel occupancy system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the current user and what it's offered.
    Whoami,

    /// Lists hostels.
    Hostels,

    /// Lists rooms with their occupancy.
    Rooms(Location),

    /// Shows the beds of a single room.
    Room {
        /// ID of the room.
        id: room::Id,
    },

    /// Shows occupancy per floor and in total.
    Summary,

    /// Lists allocation requests, oldest first.
    Requests(Requests),

    /// Manages allocation requests.
    #[command(subcommand)]
    Request(Request),

    /// Assigns a student into a bed directly.
    Assign {
        /// ID of the student.
        #[arg(long)]
        student: user::Id,

        /// ID of the room.
        #[arg(long)]
        room: room::Id,

        /// Index of the bed, starting from `0`.
        #[arg(long)]
        bed: BedIndex,
    },

    /// Vacates the bed of a student.
    Unassign {
        /// ID of the room.
        #[arg(long)]
        room: room::Id,

        /// ID of the student.
        #[arg(long)]
        student: user::Id,
    },
}

/// Allocation request command.
#[derive(Debug, Subcommand)]
pub enum Request {
    /// Requests a bed for the current user.
    Submit {
        /// Location of the room.
        #[command(flatten)]
        location: Location,

        /// ID of the room.
        #[arg(long)]
        room: Option<room::Id>,

        /// Index of the bed, starting from `0`.
        #[arg(long)]
        bed: Option<BedIndex>,
    },

    /// Approves a pending request, giving the bed to its student.
    Approve {
        /// ID of the request.
        id: allocation::Id,
    },

    /// Declines a pending request.
    Decline {
        /// ID of the request.
        id: allocation::Id,
    },
}

/// Location narrowing rooms.
///
/// `unknown` selects rooms missing the corresponding part.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct Location {
    /// Name of the hostel.
    #[arg(long, value_parser = key::<service::domain::hostel::Name>)]
    pub hostel: Option<HostelKey>,

    /// Block within the hostel.
    #[arg(long, value_parser = key::<room::Block>)]
    pub block: Option<BlockKey>,

    /// Floor within the block.
    #[arg(long, allow_hyphen_values = true, value_parser = key::<room::Floor>)]
    pub floor: Option<FloorKey>,
}

/// Filter and page of allocation requests.
#[derive(clap::Args, Clone, Copy, Debug, Default)]
pub struct Requests {
    /// Status of the requests.
    #[arg(long)]
    pub status: Option<allocation::Status>,

    /// ID of the requesting student.
    #[arg(long)]
    pub student: Option<user::Id>,

    /// ID of the requested room.
    #[arg(long)]
    pub room: Option<room::Id>,

    /// Number of requests to return from the start.
    #[arg(long)]
    pub first: Option<usize>,

    /// ID of the request to return the ones after.
    #[arg(long)]
    pub after: Option<allocation::Id>,

    /// Number of requests to return from the end.
    #[arg(long)]
    pub last: Option<usize>,

    /// ID of the request to return the ones before.
    #[arg(long)]
    pub before: Option<allocation::Id>,
}

/// Parses a [`Key`], where `unknown` stands for [`Key::Unknown`].
fn key<T>(s: &str) -> Result<Key<T>, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if s.eq_ignore_ascii_case("unknown") {
        return Ok(Key::Unknown);
    }
    s.parse::<T>().map(Key::Known).map_err(|e| e.to_string())
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;
    use service::{
        domain::{allocation::Status, room},
        read::locator::Key,
    };

    use super::{Args, Command, Location, Request};

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(["hostel"].iter().chain(args)).unwrap()
    }

    #[test]
    fn parses_location() {
        let Command::Rooms(Location {
            hostel,
            block,
            floor,
        }) = parse(&["rooms", "--hostel", "Unknown", "--floor", "-1"]).command
        else {
            panic!("not `rooms`");
        };

        assert_eq!(hostel, Some(Key::Unknown));
        assert_eq!(block, None);
        assert_eq!(floor, Some(Key::Known(-1)));
    }

    #[test]
    fn parses_submission() {
        let room = room::Id::new();

        let args = parse(&[
            "--config",
            "other.toml",
            "request",
            "submit",
            "--hostel",
            "North",
            "--block",
            "A",
            "--floor",
            "2",
            "--room",
            &room.to_string(),
            "--bed",
            "1",
        ]);

        assert_eq!(args.config, "other.toml");
        let Command::Request(Request::Submit {
            location,
            room: selected,
            bed,
        }) = args.command
        else {
            panic!("not `request submit`");
        };
        assert_eq!(
            location.hostel.map(|h| h.to_string()),
            Some("North".to_owned()),
        );
        assert_eq!(selected, Some(room));
        assert_eq!(bed, Some(1));
    }

    #[test]
    fn parses_status_in_camel_case() {
        let Command::Requests(requests) =
            parse(&["requests", "--status", "pending", "--first", "5"]).command
        else {
            panic!("not `requests`");
        };

        assert_eq!(requests.status, Some(Status::Pending));
        assert_eq!(requests.first, Some(5));
    }

    #[test]
    fn rejects_blank_block() {
        let res = Args::try_parse_from(["hostel", "rooms", "--block", " A"]);

        assert!(res.is_err());
    }
}
