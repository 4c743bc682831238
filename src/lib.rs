// Core logic for the hotel property-management front end

// Export modules for each part of the system
pub mod availability;
pub mod demo;
pub mod facade;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod money;
pub mod remote;
pub mod session;
pub mod storage;
pub mod subscription;
pub mod wire;

// Re-export key types for convenience
pub use availability::{available_rooms, StayRange};
pub use demo::DemoClient;
pub use facade::{
    fetch_dashboard, ApiError, DashboardSnapshot, NewPayment, NewReservation, PmsApi,
};
pub use ledger::{balance_of, BalanceSummary, LedgerError, PaymentLedger};
pub use lifecycle::{
    cancel, check_in, check_out, confirm, CheckInChecklist, CheckOutChecklist, LifecycleError,
};
pub use model::{
    CleaningTask, Client, Payment, PaymentKind, PaymentMethod, Reservation, ReservationState,
    Room, RoomType, SubscriptionStatus, SUBSCRIPTION_SENTINEL,
};
pub use money::{compute_totals, format_currency, nights_between, DateRangeError, Totals};
pub use remote::RemoteClient;
pub use session::{Session, SessionContext};
pub use storage::{Clock, KeyValueStore, MemoryStore, SystemClock};
pub use subscription::{evaluate, GateDecision, SubscriptionGate, UrgencyTier};
