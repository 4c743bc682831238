// Candidate-room selection for the booking flow.
//
// Filtering is by current status flags only; it does not search existing
// reservations for date overlaps on the same room. Known simplification,
// pending product clarification (see DESIGN.md).

use chrono::NaiveDate;

use crate::model::Room;
use crate::money::{nights_between, DateRangeError};

/// Validated stay range. Construction enforces `check_out > check_in`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StayRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, DateRangeError> {
        let nights = nights_between(check_in, check_out)?;
        Ok(Self {
            check_in,
            check_out,
            nights,
        })
    }
}

/// Rooms a new booking may pick from, in catalog order.
///
/// A room qualifies when it is bookable (occupancy Available, maintenance
/// Ok) and, if a room-type filter is given, belongs to that type.
/// Deterministic for the same input snapshot.
pub fn available_rooms<'a>(
    rooms: &'a [Room],
    room_type_id: Option<&str>,
    _range: &StayRange,
) -> Vec<&'a Room> {
    rooms
        .iter()
        .filter(|room| room.is_bookable())
        .filter(|room| room_type_id.map_or(true, |rt| room.room_type_id == rt))
        .collect()
}
