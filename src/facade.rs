// Data facade: one operation set, two interchangeable implementations.
//
// `RemoteClient` talks to the backend over HTTP; `DemoClient` answers from
// a seeded sample dataset. Callers hold a `dyn PmsApi` and never know
// which one they got — the choice is made once, at startup.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::try_join;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    CleaningTask, Client, OccupancyStatus, Payment, PaymentKind, PaymentMethod, Product,
    Reservation, ReservationState, Room, RoomType, SubscriptionStatus, User,
};

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success HTTP status with the message the backend put in the
    /// response body. Surfaced verbatim to the operator; never retried
    /// automatically — a retry is a deliberate user action.
    #[error("server error {status_code}: {message}")]
    Remote { status_code: u16, message: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("not found")]
    NotFound,
}

/// Booking payload. Totals are computed from the rate snapshot server-side
/// (or by the demo dataset); the caller never submits derived figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub client_id: String,
    pub room_type_id: String,
    pub room_id: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub nightly_rate: f64,
    pub special_requests: Option<String>,
    /// Booking flows may create directly in Confirmed.
    pub confirmed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub reservation_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub kind: PaymentKind,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// The full operation set both implementations expose. `get_*` returns
/// `Ok(None)` when the entity does not exist — absence is data, not an
/// error, and callers treat it as "fall through" or "feature unavailable".
#[async_trait]
pub trait PmsApi: Send + Sync {
    // Rooms
    async fn list_rooms(&self) -> Result<Vec<Room>, ApiError>;
    async fn get_room(&self, id: &str) -> Result<Option<Room>, ApiError>;
    async fn create_room(&self, room: Room) -> Result<Room, ApiError>;
    async fn update_room(&self, room: Room) -> Result<Room, ApiError>;
    async fn delete_room(&self, id: &str) -> Result<(), ApiError>;

    // Room types
    async fn list_room_types(&self) -> Result<Vec<RoomType>, ApiError>;
    async fn get_room_type(&self, id: &str) -> Result<Option<RoomType>, ApiError>;
    async fn create_room_type(&self, room_type: RoomType) -> Result<RoomType, ApiError>;
    async fn update_room_type(&self, room_type: RoomType) -> Result<RoomType, ApiError>;
    async fn delete_room_type(&self, id: &str) -> Result<(), ApiError>;

    // Clients
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError>;
    async fn get_client(&self, id: &str) -> Result<Option<Client>, ApiError>;
    async fn create_client(&self, client: Client) -> Result<Client, ApiError>;
    async fn update_client(&self, client: Client) -> Result<Client, ApiError>;
    async fn delete_client(&self, id: &str) -> Result<(), ApiError>;

    // Reservations
    async fn list_reservations(&self) -> Result<Vec<Reservation>, ApiError>;
    async fn get_reservation(&self, id: &str) -> Result<Option<Reservation>, ApiError>;
    async fn create_reservation(&self, booking: NewReservation) -> Result<Reservation, ApiError>;
    async fn update_reservation(&self, reservation: Reservation) -> Result<Reservation, ApiError>;
    async fn delete_reservation(&self, id: &str) -> Result<(), ApiError>;

    // Payments
    async fn list_reservation_payments(
        &self,
        reservation_id: &str,
    ) -> Result<Vec<Payment>, ApiError>;
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, ApiError>;
    async fn delete_payment(&self, id: &str) -> Result<(), ApiError>;

    // Cleaning tasks
    async fn list_cleaning_tasks(&self) -> Result<Vec<CleaningTask>, ApiError>;
    async fn get_cleaning_task(&self, id: &str) -> Result<Option<CleaningTask>, ApiError>;
    async fn create_cleaning_task(&self, task: CleaningTask) -> Result<CleaningTask, ApiError>;
    async fn update_cleaning_task(&self, task: CleaningTask) -> Result<CleaningTask, ApiError>;
    async fn delete_cleaning_task(&self, id: &str) -> Result<(), ApiError>;

    // Products
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn get_product(&self, id: &str) -> Result<Option<Product>, ApiError>;
    async fn create_product(&self, product: Product) -> Result<Product, ApiError>;
    async fn update_product(&self, product: Product) -> Result<Product, ApiError>;
    async fn delete_product(&self, id: &str) -> Result<(), ApiError>;

    // Users
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError>;
    async fn create_user(&self, user: User) -> Result<User, ApiError>;
    async fn update_user(&self, user: User) -> Result<User, ApiError>;
    async fn delete_user(&self, id: &str) -> Result<(), ApiError>;

    // Subscription
    async fn subscription_status(&self) -> Result<SubscriptionStatus, ApiError>;
}

/// Everything the front-desk dashboard renders, loaded in one pass.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub rooms: Vec<Room>,
    pub arrivals: Vec<Reservation>,
    pub departures: Vec<Reservation>,
    pub in_house: Vec<Reservation>,
    pub cleaning_tasks: Vec<CleaningTask>,
    pub occupied_rooms: usize,
    pub available_rooms: usize,
}

/// Load the dashboard's three collections concurrently and derive the
/// day's view. Counts are computed from this snapshot only, so a slower
/// request finishing later can never mix with a newer one.
pub async fn fetch_dashboard(
    api: &dyn PmsApi,
    today: NaiveDate,
) -> Result<DashboardSnapshot, ApiError> {
    let (rooms, reservations, cleaning_tasks) = try_join!(
        api.list_rooms(),
        api.list_reservations(),
        api.list_cleaning_tasks()
    )?;

    let occupied_rooms = rooms
        .iter()
        .filter(|r| r.occupancy == OccupancyStatus::Occupied)
        .count();
    let available_rooms = rooms.iter().filter(|r| r.is_bookable()).count();

    let mut arrivals = Vec::new();
    let mut departures = Vec::new();
    let mut in_house = Vec::new();
    for reservation in reservations {
        match reservation.state {
            ReservationState::Confirmed if reservation.check_in == today => {
                arrivals.push(reservation)
            }
            ReservationState::CheckedIn if reservation.check_out == today => {
                departures.push(reservation)
            }
            ReservationState::CheckedIn => in_house.push(reservation),
            _ => {}
        }
    }

    Ok(DashboardSnapshot {
        rooms,
        arrivals,
        departures,
        in_house,
        cleaning_tasks,
        occupied_rooms,
        available_rooms,
    })
}
