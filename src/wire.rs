// Wire DTOs for the remote backend.
//
// The backend emits entities in two field-naming conventions depending on
// which service produced them (snake_case and camelCase). Each DTO here
// accepts both via serde aliases and converts into exactly one canonical
// `model` type, so nothing downstream ever branches on spelling.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::facade::ApiError;
use crate::model::{
    CleanlinessStatus, Client, MaintenanceStatus, OccupancyStatus, Reservation, ReservationState,
    Room,
};
use crate::money::{compute_totals, nights_between};

#[derive(Debug, Deserialize)]
pub struct WireRoom {
    pub id: String,
    #[serde(alias = "roomTypeId")]
    pub room_type_id: String,
    #[serde(alias = "roomNumber", alias = "number")]
    pub room_number: String,
    pub floor: u32,
    #[serde(alias = "occupancyStatus", alias = "status")]
    pub occupancy_status: String,
    #[serde(alias = "cleaningStatus", default)]
    pub cleaning_status: Option<String>,
    #[serde(alias = "maintenanceStatus", default)]
    pub maintenance_status: Option<String>,
}

impl WireRoom {
    pub fn into_room(self) -> Result<Room, ApiError> {
        Ok(Room {
            occupancy: parse_occupancy(&self.occupancy_status)?,
            cleanliness: match self.cleaning_status.as_deref() {
                Some(s) => parse_cleanliness(s)?,
                None => CleanlinessStatus::Clean,
            },
            maintenance: match self.maintenance_status.as_deref() {
                Some(s) => parse_maintenance(s)?,
                None => MaintenanceStatus::Ok,
            },
            id: self.id,
            room_type_id: self.room_type_id,
            number: self.room_number,
            floor: self.floor,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireClient {
    pub id: String,
    #[serde(alias = "firstName", alias = "name")]
    pub first_name: String,
    #[serde(alias = "lastName", alias = "surname")]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(alias = "documentType", default)]
    pub document_type: Option<String>,
    #[serde(alias = "documentNumber", default)]
    pub document_number: Option<String>,
    #[serde(alias = "totalStays", alias = "stays", default)]
    pub total_stays: u32,
}

impl WireClient {
    pub fn into_client(self) -> Client {
        Client {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            document_type: self.document_type,
            document_number: self.document_number,
            total_stays: self.total_stays,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireReservation {
    pub id: String,
    #[serde(alias = "reservationNumber", alias = "number")]
    pub reservation_number: String,
    #[serde(alias = "clientId")]
    pub client_id: String,
    #[serde(alias = "roomId", default)]
    pub room_id: Option<String>,
    #[serde(alias = "roomTypeId")]
    pub room_type_id: String,
    #[serde(alias = "checkIn", alias = "checkInDate")]
    pub check_in: NaiveDate,
    #[serde(alias = "checkOut", alias = "checkOutDate")]
    pub check_out: NaiveDate,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(alias = "nightlyRate", alias = "rate")]
    pub nightly_rate: f64,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(alias = "paidAmount", default)]
    pub paid_amount: Option<f64>,
    #[serde(alias = "pendingBalance", default)]
    pub pending_balance: Option<f64>,
    #[serde(alias = "state")]
    pub status: String,
    #[serde(alias = "specialRequests", default)]
    pub special_requests: Option<String>,
    #[serde(alias = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_adults() -> u32 {
    1
}

impl WireReservation {
    /// Money fields the server omitted are recomputed from the rate
    /// snapshot. Figures the server did provide are trusted as-is; in
    /// particular a server-side pending balance is never re-rounded, so
    /// rounding is not applied twice.
    pub fn into_reservation(self) -> Result<Reservation, ApiError> {
        let nights = nights_between(self.check_in, self.check_out)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let computed = compute_totals(self.nightly_rate, nights);
        let subtotal = self.subtotal.unwrap_or(computed.subtotal);
        let tax = self.tax.unwrap_or(computed.tax);
        let total = self.total.unwrap_or(computed.total);
        let paid_amount = self.paid_amount.unwrap_or(0.0);
        let pending_balance = self
            .pending_balance
            .unwrap_or_else(|| (total - paid_amount).max(0.0));

        Ok(Reservation {
            state: parse_reservation_state(&self.status)?,
            id: self.id,
            number: self.reservation_number,
            client_id: self.client_id,
            room_id: self.room_id,
            room_type_id: self.room_type_id,
            check_in: self.check_in,
            check_out: self.check_out,
            adults: self.adults,
            children: self.children,
            nightly_rate: self.nightly_rate,
            subtotal,
            tax,
            total,
            paid_amount,
            pending_balance,
            special_requests: self.special_requests,
            created_at: self.created_at,
        })
    }
}

fn parse_occupancy(raw: &str) -> Result<OccupancyStatus, ApiError> {
    match raw.to_ascii_lowercase().as_str() {
        "available" => Ok(OccupancyStatus::Available),
        "occupied" => Ok(OccupancyStatus::Occupied),
        "reserved" => Ok(OccupancyStatus::Reserved),
        "blocked" => Ok(OccupancyStatus::Blocked),
        other => Err(ApiError::InvalidResponse(format!(
            "unknown occupancy status {other:?}"
        ))),
    }
}

fn parse_cleanliness(raw: &str) -> Result<CleanlinessStatus, ApiError> {
    match raw.to_ascii_lowercase().as_str() {
        "clean" => Ok(CleanlinessStatus::Clean),
        "dirty" => Ok(CleanlinessStatus::Dirty),
        "in_progress" | "inprogress" | "cleaning" => Ok(CleanlinessStatus::InProgress),
        "inspection" => Ok(CleanlinessStatus::Inspection),
        other => Err(ApiError::InvalidResponse(format!(
            "unknown cleanliness status {other:?}"
        ))),
    }
}

fn parse_maintenance(raw: &str) -> Result<MaintenanceStatus, ApiError> {
    match raw.to_ascii_lowercase().as_str() {
        "ok" | "operational" => Ok(MaintenanceStatus::Ok),
        "pending" => Ok(MaintenanceStatus::Pending),
        "in_progress" | "inprogress" => Ok(MaintenanceStatus::InProgress),
        "out_of_service" | "outofservice" => Ok(MaintenanceStatus::OutOfService),
        other => Err(ApiError::InvalidResponse(format!(
            "unknown maintenance status {other:?}"
        ))),
    }
}

fn parse_reservation_state(raw: &str) -> Result<ReservationState, ApiError> {
    match raw.to_ascii_lowercase().as_str() {
        "pending" => Ok(ReservationState::Pending),
        "confirmed" => Ok(ReservationState::Confirmed),
        "checked_in" | "checkedin" => Ok(ReservationState::CheckedIn),
        "checked_out" | "checkedout" => Ok(ReservationState::CheckedOut),
        "cancelled" | "canceled" => Ok(ReservationState::Cancelled),
        "no_show" | "noshow" => Ok(ReservationState::NoShow),
        other => Err(ApiError::InvalidResponse(format!(
            "unknown reservation state {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_snake_case_reservations() {
        let value = json!({
            "id": "res-1",
            "reservation_number": "R-0001",
            "client_id": "c1",
            "room_type_id": "rt1",
            "check_in": "2025-06-01",
            "check_out": "2025-06-04",
            "adults": 2,
            "nightly_rate": 1200.0,
            "subtotal": 3600.0,
            "tax": 576.0,
            "total": 4176.0,
            "paid_amount": 2000.0,
            "pending_balance": 2176.0,
            "status": "confirmed"
        });
        let wire: WireReservation = serde_json::from_value(value).unwrap();
        let reservation = wire.into_reservation().unwrap();
        assert_eq!(reservation.state, ReservationState::Confirmed);
        assert_eq!(reservation.pending_balance, 2176.0);
    }

    #[test]
    fn decodes_camel_case_reservations_into_the_same_shape() {
        let value = json!({
            "id": "res-1",
            "reservationNumber": "R-0001",
            "clientId": "c1",
            "roomTypeId": "rt1",
            "checkIn": "2025-06-01",
            "checkOut": "2025-06-04",
            "adults": 2,
            "nightlyRate": 1200.0,
            "status": "checked_in"
        });
        let wire: WireReservation = serde_json::from_value(value).unwrap();
        let reservation = wire.into_reservation().unwrap();
        assert_eq!(reservation.number, "R-0001");
        assert_eq!(reservation.state, ReservationState::CheckedIn);
        // Money fields were omitted: recomputed from the rate snapshot.
        assert_eq!(reservation.subtotal, 3600.0);
        assert_eq!(reservation.tax, 576.0);
        assert_eq!(reservation.total, 4176.0);
        assert_eq!(reservation.pending_balance, 4176.0);
    }

    #[test]
    fn server_provided_pending_balance_is_not_rerounded() {
        let value = json!({
            "id": "res-1",
            "reservation_number": "R-0001",
            "client_id": "c1",
            "room_type_id": "rt1",
            "check_in": "2025-06-01",
            "check_out": "2025-06-02",
            "nightly_rate": 100.0,
            "total": 116.0,
            "paid_amount": 100.0,
            "pending_balance": 16.004,
            "status": "pending"
        });
        let wire: WireReservation = serde_json::from_value(value).unwrap();
        let reservation = wire.into_reservation().unwrap();
        assert_eq!(reservation.pending_balance, 16.004);
    }

    #[test]
    fn decodes_rooms_in_both_conventions() {
        let snake = json!({
            "id": "room-1",
            "room_type_id": "rt1",
            "room_number": "101",
            "floor": 1,
            "occupancy_status": "available",
            "cleaning_status": "dirty",
            "maintenance_status": "ok"
        });
        let camel = json!({
            "id": "room-1",
            "roomTypeId": "rt1",
            "roomNumber": "101",
            "floor": 1,
            "occupancyStatus": "Available",
            "cleaningStatus": "Dirty",
            "maintenanceStatus": "OK"
        });
        let a: Room = serde_json::from_value::<WireRoom>(snake)
            .unwrap()
            .into_room()
            .unwrap();
        let b: Room = serde_json::from_value::<WireRoom>(camel)
            .unwrap()
            .into_room()
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.occupancy, OccupancyStatus::Available);
        assert_eq!(a.cleanliness, CleanlinessStatus::Dirty);
    }

    #[test]
    fn decodes_clients_in_both_conventions() {
        let snake = json!({
            "id": "c1",
            "first_name": "Ana",
            "last_name": "Reyes",
            "total_stays": 12
        });
        let camel = json!({
            "id": "c1",
            "firstName": "Ana",
            "lastName": "Reyes",
            "totalStays": 12
        });
        let a = serde_json::from_value::<WireClient>(snake).unwrap().into_client();
        let b = serde_json::from_value::<WireClient>(camel).unwrap().into_client();
        assert_eq!(a, b);
        assert!(a.is_vip());
    }

    #[test]
    fn unknown_status_strings_are_invalid_responses() {
        let value = json!({
            "id": "room-1",
            "room_type_id": "rt1",
            "room_number": "101",
            "floor": 1,
            "occupancy_status": "quantum"
        });
        let err = serde_json::from_value::<WireRoom>(value)
            .unwrap()
            .into_room()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
