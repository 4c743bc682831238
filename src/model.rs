// Canonical property-management entities shared by every module.
//
// These are the shapes the UI layer works with. The remote backend's two
// field-naming conventions are normalized into these types at the facade
// boundary (see `wire`); nothing below that boundary branches on spelling.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reserved "no subscription data / feature disabled" signal. Never a
/// legitimate days-remaining value.
pub const SUBSCRIPTION_SENTINEL: i32 = -999;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomType {
    pub id: String,
    pub code: String,
    pub name: String,
    pub adult_capacity: u32,
    pub child_capacity: u32,
    pub max_capacity: u32,
    pub base_rate: f64,
    pub extra_person_rate: f64,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OccupancyStatus {
    Available,
    Occupied,
    Reserved,
    Blocked,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CleanlinessStatus {
    Clean,
    Dirty,
    InProgress,
    Inspection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MaintenanceStatus {
    Ok,
    Pending,
    InProgress,
    OutOfService,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub room_type_id: String,
    pub number: String,
    pub floor: u32,
    pub occupancy: OccupancyStatus,
    pub cleanliness: CleanlinessStatus,
    pub maintenance: MaintenanceStatus,
}

impl Room {
    /// Cleanliness does not block booking; housekeeping catches up after
    /// assignment. Only occupancy and maintenance gate the room.
    pub fn is_bookable(&self) -> bool {
        self.occupancy == OccupancyStatus::Available && self.maintenance == MaintenanceStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub total_stays: u32,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// VIP status is derived, never stored.
    pub fn is_vip(&self) -> bool {
        self.total_stays > 10
    }

    pub fn loyalty_tier(&self) -> LoyaltyTier {
        match self.total_stays {
            s if s > 15 => LoyaltyTier::Diamond,
            s if s > 10 => LoyaltyTier::Platinum,
            s if s > 5 => LoyaltyTier::Gold,
            s if s > 2 => LoyaltyTier::Silver,
            _ => LoyaltyTier::Bronze,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReservationState {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
}

impl ReservationState {
    /// CheckedOut, Cancelled and NoShow are history; no operation may
    /// move a reservation out of them or reassign its room.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationState::CheckedOut | ReservationState::Cancelled | ReservationState::NoShow
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub number: String,
    pub client_id: String,
    pub room_id: Option<String>,
    pub room_type_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    /// Rate snapshot taken at booking time. Later room-type price changes
    /// must not retroactively alter historical reservations.
    pub nightly_rate: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub paid_amount: f64,
    pub pending_balance: f64,
    pub state: ReservationState,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Deposit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentKind {
    Deposit,
    Installment,
    Settlement,
    Refund,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    pub reservation_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub kind: PaymentKind,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CleaningTaskType {
    Checkout,
    Occupied,
    Deep,
    Inspection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum CleaningPriority {
    Low,
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CleaningTaskState {
    Pending,
    InProgress,
    Completed,
    Verified,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleaningTask {
    pub id: String,
    pub room_id: String,
    pub date: NaiveDate,
    pub task_type: CleaningTaskType,
    pub priority: CleaningPriority,
    pub state: CleaningTaskState,
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionStatus {
    pub days_remaining: i32,
}

impl SubscriptionStatus {
    pub fn is_unknown(&self) -> bool {
        self.days_remaining == SUBSCRIPTION_SENTINEL
    }
}
