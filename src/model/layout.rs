//! Tables, seats and the classroom layout.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SeatingError};

/// Identity of a table within a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Address of a seat: its table plus a seat number unique within that table.
///
/// Ordering is table-major, so iterating a map keyed by `SeatId` visits
/// all seats of one table before the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatId {
    pub table: TableId,
    pub number: u32,
}

impl SeatId {
    pub fn new(table: u32, number: u32) -> Self {
        Self {
            table: TableId(table),
            number,
        }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.table, self.number)
    }
}

/// Table geometry. Has no effect on scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TableShape {
    #[default]
    Rectangular,
    Round,
    UShaped,
    Individual,
}

/// Position of a seat relative to its table origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// An addressable seat at a table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seat {
    pub number: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_accessible: bool,
    /// Deactivated seats are never assigned nor counted as vacant.
    #[cfg_attr(feature = "serde", serde(default))]
    pub deactivated: bool,
}

impl Seat {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            position: Position::default(),
            is_accessible: false,
            deactivated: false,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn accessible(mut self) -> Self {
        self.is_accessible = true;
        self
    }

    pub fn deactivate(mut self) -> Self {
        self.deactivated = true;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.deactivated
    }
}

/// A table and its seats.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub id: TableId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: TableShape,
    pub seats: Vec<Seat>,
}

impl Table {
    pub fn new(id: u32, shape: TableShape, seats: Vec<Seat>) -> Self {
        Self {
            id: TableId(id),
            shape,
            seats,
        }
    }

    /// A table with seats numbered `1..=count`, none accessible.
    pub fn with_capacity(id: u32, count: u32) -> Self {
        Self::new(id, TableShape::Rectangular, (1..=count).map(Seat::new).collect())
    }

    pub fn seat_id(&self, seat: &Seat) -> SeatId {
        SeatId {
            table: self.id,
            number: seat.number,
        }
    }

    /// Ids of the active seats, in seat order.
    pub fn active_seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.seats
            .iter()
            .filter(|s| s.is_active())
            .map(move |s| self.seat_id(s))
    }

    pub fn capacity(&self) -> usize {
        self.seats.iter().filter(|s| s.is_active()).count()
    }
}

/// The classroom layout: every table with its seats.
///
/// Construction checks that table ids and seat numbers are unique and
/// builds an index for constant-time seat lookup. Serialized as the
/// bare table list; the index is rebuilt and checked on the way back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Table>", into = "Vec<Table>")
)]
pub struct Layout {
    tables: Vec<Table>,
    index: BTreeMap<SeatId, (usize, usize)>,
}

impl Layout {
    pub fn new(tables: Vec<Table>) -> Result<Self> {
        let mut index = BTreeMap::new();
        let mut table_ids = std::collections::BTreeSet::new();
        for (ti, table) in tables.iter().enumerate() {
            if !table_ids.insert(table.id) {
                let first = table.seats.first().map_or(0, |s| s.number);
                return Err(SeatingError::DuplicateSeat(SeatId {
                    table: table.id,
                    number: first,
                }));
            }
            for (si, seat) in table.seats.iter().enumerate() {
                let id = table.seat_id(seat);
                if index.insert(id, (ti, si)).is_some() {
                    return Err(SeatingError::DuplicateSeat(id));
                }
            }
        }
        Ok(Self { tables, index })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.index
            .get(&id)
            .map(|&(ti, si)| &self.tables[ti].seats[si])
    }

    /// Whether `id` names an existing, active seat.
    pub fn is_active_seat(&self, id: SeatId) -> bool {
        self.seat(id).is_some_and(Seat::is_active)
    }

    pub fn is_accessible(&self, id: SeatId) -> bool {
        self.seat(id).is_some_and(|s| s.is_accessible)
    }

    /// All active seats, table-major.
    pub fn active_seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.tables.iter().flat_map(Table::active_seats)
    }

    /// Number of active seats.
    pub fn capacity(&self) -> usize {
        self.tables.iter().map(Table::capacity).sum()
    }

    /// True when there is nothing to seat anyone at.
    pub fn is_empty(&self) -> bool {
        self.capacity() == 0
    }
}

impl TryFrom<Vec<Table>> for Layout {
    type Error = SeatingError;

    fn try_from(tables: Vec<Table>) -> Result<Self> {
        Layout::new(tables)
    }
}

impl From<Layout> for Vec<Table> {
    fn from(layout: Layout) -> Self {
        layout.tables
    }
}
