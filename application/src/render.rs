//! Plain-text [`Table`]s rendering fetched state.

use std::{collections::BTreeSet, fmt, iter};

use common::Percent;
use itertools::Itertools as _;
use service::{
    domain::{user::Capability, AllocationRequest, Hostel, Room, User},
    read::{allocation::list, Index, Occupancy},
};

/// Plain-text table with aligned columns.
#[derive(Clone, Debug, Default)]
pub struct Table {
    /// Column titles.
    header: Vec<String>,

    /// Rows of cells.
    rows: Vec<Vec<String>>,

    /// Notes printed after the rows.
    notes: Vec<String>,
}

impl Table {
    /// Creates a new empty [`Table`] with the provided column titles.
    #[must_use]
    pub fn new<T: ToString>(header: impl IntoIterator<Item = T>) -> Self {
        Self {
            header: header.into_iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Appends a row of cells to this [`Table`].
    pub fn push<T: ToString>(&mut self, row: impl IntoIterator<Item = T>) {
        self.rows.push(row.into_iter().map(|c| c.to_string()).collect());
    }

    /// Appends a note printed after the rows of this [`Table`].
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Returns the number of rows in this [`Table`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Indicates whether this [`Table`] has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = || iter::once(&self.header).chain(&self.rows);
        let mut widths = Vec::<usize>::new();
        for line in lines() {
            for (i, cell) in line.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }

        for line in lines().filter(|l| !l.is_empty()) {
            let text = line
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:width$}"))
                .join("  ");
            writeln!(f, "{}", text.trim_end())?;
        }
        for note in &self.notes {
            writeln!(f, "{note}")?;
        }
        Ok(())
    }
}

/// Placeholder of a missing value.
const NONE: &str = "-";

/// Renders the provided occupancy [`Percent`].
fn rate(percent: Percent) -> String {
    format!("{percent}%")
}

/// Renders the provided [`User`] with the [`Capability`]s offered to it.
#[must_use]
pub fn user(user: &User, capabilities: &BTreeSet<Capability>) -> Table {
    let mut table = Table::new(["FIELD", "VALUE"]);
    table.push(["id".to_owned(), user.id.to_string()]);
    table.push(["name".to_owned(), user.name.to_string()]);
    table.push([
        "email".to_owned(),
        user.email.as_ref().map_or(NONE.to_owned(), ToString::to_string),
    ]);
    table.push(["role".to_owned(), user.role.to_string()]);
    table.push(["onboarded".to_owned(), user.onboarded.to_string()]);
    table.push(["capabilities".to_owned(), capabilities.iter().join(", ")]);
    table
}

/// Renders the provided [`Hostel`]s.
#[must_use]
pub fn hostels(hostels: &[Hostel]) -> Table {
    let mut table =
        Table::new(["ID", "NAME", "CAMPUS", "GENDER", "ADDRESS", "FACILITIES"]);
    for h in hostels {
        table.push([
            h.id.to_string(),
            h.name.to_string(),
            h.campus.as_ref().map_or(NONE.to_owned(), ToString::to_string),
            h.gender.to_string(),
            h.address.as_ref().map_or(NONE.to_owned(), ToString::to_string),
            h.facilities.iter().join(", "),
        ]);
    }
    table
}

/// Renders the provided [`Room`]s with their [`Occupancy`].
#[must_use]
pub fn rooms<'r>(rooms: impl IntoIterator<Item = &'r Room>) -> Table {
    let mut table = Table::new([
        "ID", "HOSTEL", "BLOCK", "FLOOR", "NUMBER", "CAPACITY", "OCCUPIED",
        "VACANT", "FREE BEDS", "PRICE",
    ]);
    for room in rooms {
        let Occupancy {
            capacity,
            occupied,
            vacant,
            free_beds,
        } = Occupancy::from(room);
        table.push([
            room.id.to_string(),
            room.hostel
                .as_ref()
                .map_or(NONE.to_owned(), |h| h.name.to_string()),
            room.block.as_ref().map_or(NONE.to_owned(), ToString::to_string),
            room.floor.map_or(NONE.to_owned(), |f| f.to_string()),
            room.number.to_string(),
            capacity.to_string(),
            occupied.to_string(),
            vacant.to_string(),
            free_beds.iter().join(","),
            room.price.map_or(NONE.to_owned(), |p| p.to_string()),
        ]);
    }
    table
}

/// Renders every bed of the provided [`Room`].
///
/// Stale occupants beyond the capacity are listed too.
#[must_use]
pub fn beds(room: &Room) -> Table {
    let mut table = Table::new(["BED", "STUDENT"]);
    let beds = usize::from(room.capacity.get()).max(room.slots.len());
    for (bed, slot) in (0..beds)
        .map(|i| (i, room.slots.get(i).copied().flatten()))
    {
        let student = slot.map_or_else(|| "free".to_owned(), |s| s.to_string());
        if bed < usize::from(room.capacity.get()) {
            table.push([bed.to_string(), student]);
        } else if slot.is_some() {
            table.push([bed.to_string(), format!("{student} (over capacity)")]);
        }
    }
    table.note(format!(
        "room {}: {} occupied",
        room.number,
        rate(Occupancy::from(room).rate()),
    ));
    table
}

/// Renders per-floor occupancy of the provided [`Index`] and its total.
#[must_use]
pub fn summary(index: &Index) -> Table {
    let mut table = Table::new([
        "HOSTEL", "BLOCK", "FLOOR", "ROOMS", "CAPACITY", "OCCUPIED", "VACANT",
        "RATE",
    ]);
    let rows = index
        .floor_summaries()
        .map(|f| {
            (
                [f.hostel.to_string(), f.block.to_string(), f.floor.to_string()],
                f.summary,
            )
        })
        .chain(iter::once((
            ["TOTAL".to_owned(), String::new(), String::new()],
            index.summary(),
        )));
    for (location, s) in rows {
        table.push(location.into_iter().chain([
            s.rooms.to_string(),
            s.capacity.to_string(),
            s.occupied.to_string(),
            s.vacant.to_string(),
            rate(s.rate()),
        ]));
    }
    table
}

/// Renders the provided [`AllocationRequest`]s.
#[must_use]
pub fn requests<'r>(
    requests: impl IntoIterator<Item = &'r AllocationRequest>,
) -> Table {
    let mut table = Table::new([
        "ID", "STUDENT", "ROOM", "BED", "STATUS", "PAYMENT", "CREATED",
    ]);
    for r in requests {
        table.push([
            r.id.to_string(),
            r.student_id.to_string(),
            r.room_id.to_string(),
            r.bed.to_string(),
            r.status.to_string(),
            r.payment.to_string(),
            r.created_at.to_rfc3339(),
        ]);
    }
    table
}

/// Renders the provided [`list::Page`] of [`AllocationRequest`]s along with
/// the arguments fetching its neighbours.
#[must_use]
pub fn page(page: &list::Page) -> Table {
    let mut table = requests(page.edges.iter().map(|e| &e.node));
    let info = page.page_info();
    if let (true, Some(end)) = (info.has_next_page, info.end_cursor) {
        table.note(format!("more: --after {end}"));
    }
    if let (true, Some(start)) = (info.has_previous_page, info.start_cursor) {
        table.note(format!("more: --before {start}"));
    }
    table
}

#[cfg(test)]
mod spec {
    use service::domain::{
        room::{self, Capacity, Number},
        user, Room,
    };

    use super::{beds, rooms, Table};

    fn room(capacity: u16, slots: Vec<Option<user::Id>>) -> Room {
        Room {
            id: room::Id::new(),
            hostel: None,
            block: None,
            floor: Some(1),
            number: Number::new("101").unwrap(),
            capacity: Capacity::new(capacity).unwrap(),
            price: None,
            slots,
        }
    }

    #[test]
    fn aligns_columns() {
        let mut table = Table::new(["A", "LONG"]);
        table.push(["wide cell", "x"]);
        table.note("done");

        assert_eq!(table.to_string(), "A          LONG\nwide cell  x\ndone\n");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn renders_free_beds() {
        let (a, b) = (user::Id::new(), user::Id::new());
        let room = room(4, vec![Some(a), None, None, Some(b)]);

        let text = rooms([&room]).to_string();
        let row = text.lines().nth(1).unwrap();

        assert!(row.contains("1,2"), "{row}");
        assert!(row.starts_with(&room.id.to_string()), "{row}");
    }

    #[test]
    fn lists_stale_occupants() {
        let stale = user::Id::new();
        let room = room(1, vec![None, Some(stale)]);

        let table = beds(&room);

        assert_eq!(table.len(), 2);
        assert!(table.to_string().contains("over capacity"));
    }
}
