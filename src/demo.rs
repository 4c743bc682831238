// Local facade implementation backed by a seeded sample dataset.
//
// Stands in for the remote backend when no server is reachable or when the
// app runs in demo mode. It answers the same operation set with the same
// response shapes: unknown ids are `Ok(None)`, validation failures mirror
// the server's 422 responses, and balances are recomputed from the full
// payment history exactly as the live flow does.

use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::facade::{ApiError, NewPayment, NewReservation, PmsApi};
use crate::ledger::balance_of;
use crate::model::{
    CleaningPriority, CleaningTask, CleaningTaskState, CleaningTaskType, CleanlinessStatus,
    Client, MaintenanceStatus, OccupancyStatus, Payment, PaymentKind, PaymentMethod, Product,
    Reservation, ReservationState, Room, RoomType, SubscriptionStatus, User,
    SUBSCRIPTION_SENTINEL,
};
use crate::money::{compute_totals, nights_between};

fn validation_error(message: impl Into<String>) -> ApiError {
    // The live backend answers bad input with a 422 and a message body;
    // the demo mirrors that shape so callers cannot tell the difference.
    ApiError::Remote {
        status_code: 422,
        message: message.into(),
    }
}

pub struct DemoClient {
    room_types: DashMap<String, RoomType>,
    rooms: DashMap<String, Room>,
    clients: DashMap<String, Client>,
    reservations: DashMap<String, Reservation>,
    payments: DashMap<String, Payment>,
    cleaning_tasks: DashMap<String, CleaningTask>,
    products: DashMap<String, Product>,
    users: DashMap<String, User>,
    days_remaining: AtomicI32,
    next_id: AtomicU64,
}

impl DemoClient {
    /// The sample dataset's notion of "today". Seeded arrivals, departures
    /// and cleaning tasks are anchored to this date.
    pub const SEED_TODAY: NaiveDate = match NaiveDate::from_ymd_opt(2025, 6, 1) {
        Some(date) => date,
        None => panic!("valid seed date"),
    };

    /// Deterministic dataset: the same seed always produces the same
    /// entity tables.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let client = Self {
            room_types: DashMap::new(),
            rooms: DashMap::new(),
            clients: DashMap::new(),
            reservations: DashMap::new(),
            payments: DashMap::new(),
            cleaning_tasks: DashMap::new(),
            products: DashMap::new(),
            users: DashMap::new(),
            days_remaining: AtomicI32::new(SUBSCRIPTION_SENTINEL),
            next_id: AtomicU64::new(1000),
        };
        client.seed_catalog();
        client.seed_rooms(&mut rng);
        client.seed_clients();
        client.seed_reservations();
        client.seed_cleaning_tasks();
        client.seed_products_and_users();
        debug!(seed, "demo dataset generated");
        client
    }

    /// Configure the subscription the dataset reports. Defaults to the
    /// sentinel ("no data"), which the gate renders as nothing.
    pub fn set_days_remaining(&self, days: i32) {
        self.days_remaining.store(days, Ordering::SeqCst);
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{prefix}-{n}")
    }

    fn seed_timestamp(day_offset: i64, hour: u32) -> chrono::DateTime<Utc> {
        let date = Self::SEED_TODAY + chrono::Duration::days(day_offset);
        Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
    }

    fn seed_catalog(&self) {
        let catalog = [
            ("rt-std", "STD", "Standard", 2, 1, 3, 1200.0, 250.0),
            ("rt-dbl", "DBL", "Double Deluxe", 2, 2, 4, 1800.0, 300.0),
            ("rt-ste", "STE", "Junior Suite", 3, 2, 5, 2800.0, 400.0),
        ];
        for (id, code, name, adults, children, max, rate, extra) in catalog {
            self.room_types.insert(
                id.to_string(),
                RoomType {
                    id: id.to_string(),
                    code: code.to_string(),
                    name: name.to_string(),
                    adult_capacity: adults,
                    child_capacity: children,
                    max_capacity: max,
                    base_rate: rate,
                    extra_person_rate: extra,
                    amenities: vec!["wifi".to_string(), "tv".to_string()],
                },
            );
        }
    }

    fn seed_rooms(&self, rng: &mut StdRng) {
        let types = ["rt-std", "rt-std", "rt-dbl", "rt-ste"];
        for floor in 1..=3u32 {
            for slot in 1..=4u32 {
                let id = format!("room-{floor}{slot:02}");
                // A couple of rooms are deliberately unbookable so the
                // availability screens have something to gray out.
                let (occupancy, maintenance) = match (floor, slot) {
                    (1, 2) => (OccupancyStatus::Occupied, MaintenanceStatus::Ok),
                    (2, 1) => (OccupancyStatus::Occupied, MaintenanceStatus::Ok),
                    (2, 4) => (OccupancyStatus::Available, MaintenanceStatus::OutOfService),
                    (3, 3) => (OccupancyStatus::Reserved, MaintenanceStatus::Ok),
                    _ => (OccupancyStatus::Available, MaintenanceStatus::Ok),
                };
                let cleanliness = if occupancy == OccupancyStatus::Occupied {
                    // Lived-in rooms are a coin flip between serviced and
                    // not yet serviced; deterministic per seed.
                    if rng.gen_bool(0.5) {
                        CleanlinessStatus::Clean
                    } else {
                        CleanlinessStatus::Dirty
                    }
                } else {
                    CleanlinessStatus::Clean
                };
                self.rooms.insert(
                    id.clone(),
                    Room {
                        id,
                        room_type_id: types[(slot as usize - 1) % types.len()].to_string(),
                        number: format!("{floor}{slot:02}"),
                        floor,
                        occupancy,
                        cleanliness,
                        maintenance,
                    },
                );
            }
        }
    }

    fn seed_clients(&self) {
        let guests = [
            ("cl-1", "Ana", "Reyes", 18),
            ("cl-2", "Bruno", "Castillo", 12),
            ("cl-3", "Carla", "Mendes", 7),
            ("cl-4", "Diego", "Fuentes", 3),
            ("cl-5", "Elena", "Ortiz", 1),
            ("cl-6", "Farid", "Haddad", 0),
        ];
        for (id, first, last, stays) in guests {
            self.clients.insert(
                id.to_string(),
                Client {
                    id: id.to_string(),
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: Some(format!(
                        "{}.{}@example.com",
                        first.to_lowercase(),
                        last.to_lowercase()
                    )),
                    phone: None,
                    document_type: Some("passport".to_string()),
                    document_number: Some(format!("P{id}")),
                    total_stays: stays,
                },
            );
        }
    }

    fn seed_reservation(
        &self,
        id: &str,
        number: &str,
        client_id: &str,
        room_id: Option<&str>,
        room_type_id: &str,
        check_in_offset: i64,
        nights: i64,
        state: ReservationState,
        payments: &[(f64, PaymentKind)],
    ) {
        let check_in = Self::SEED_TODAY + chrono::Duration::days(check_in_offset);
        let check_out = check_in + chrono::Duration::days(nights);
        let rate = self
            .room_types
            .get(room_type_id)
            .map(|rt| rt.base_rate)
            .unwrap_or(1200.0);
        let totals = compute_totals(rate, nights);

        let mut history = Vec::new();
        for (i, (amount, kind)) in payments.iter().enumerate() {
            let payment = Payment {
                id: format!("{id}-p{}", i + 1),
                reservation_id: id.to_string(),
                amount: *amount,
                method: PaymentMethod::Card,
                kind: *kind,
                reference: None,
                notes: None,
                received_at: Self::seed_timestamp(check_in_offset - 1, 9 + i as u32),
            };
            history.push(payment.clone());
            self.payments.insert(payment.id.clone(), payment);
        }
        let balance = balance_of(totals.total, &history);

        self.reservations.insert(
            id.to_string(),
            Reservation {
                id: id.to_string(),
                number: number.to_string(),
                client_id: client_id.to_string(),
                room_id: room_id.map(str::to_string),
                room_type_id: room_type_id.to_string(),
                check_in,
                check_out,
                adults: 2,
                children: 0,
                nightly_rate: rate,
                subtotal: totals.subtotal,
                tax: totals.tax,
                total: totals.total,
                paid_amount: balance.paid,
                pending_balance: balance.pending,
                state,
                special_requests: None,
                created_at: Self::seed_timestamp(check_in_offset - 7, 12),
            },
        );
    }

    fn seed_reservations(&self) {
        // Arriving today, deposit already taken.
        self.seed_reservation(
            "res-1",
            "R-0001",
            "cl-1",
            Some("room-303"),
            "rt-ste",
            0,
            3,
            ReservationState::Confirmed,
            &[(2000.0, PaymentKind::Deposit)],
        );
        // Departing today, fully settled.
        self.seed_reservation(
            "res-2",
            "R-0002",
            "cl-2",
            Some("room-102"),
            "rt-std",
            -2,
            2,
            ReservationState::CheckedIn,
            &[(1392.0, PaymentKind::Deposit), (1392.0, PaymentKind::Settlement)],
        );
        // In-house for the rest of the week, balance outstanding.
        self.seed_reservation(
            "res-3",
            "R-0003",
            "cl-3",
            Some("room-201"),
            "rt-dbl",
            -1,
            5,
            ReservationState::CheckedIn,
            &[(3000.0, PaymentKind::Installment)],
        );
        // Future stay still unconfirmed, nothing paid.
        self.seed_reservation(
            "res-4",
            "R-0004",
            "cl-4",
            None,
            "rt-std",
            10,
            4,
            ReservationState::Pending,
            &[],
        );
        // History: settled and checked out last month, with a refund.
        self.seed_reservation(
            "res-5",
            "R-0005",
            "cl-5",
            Some("room-101"),
            "rt-std",
            -30,
            2,
            ReservationState::CheckedOut,
            &[
                (3000.0, PaymentKind::Settlement),
                (216.0, PaymentKind::Refund),
            ],
        );
    }

    fn seed_cleaning_tasks(&self) {
        let tasks = [
            (
                "ct-1",
                "room-102",
                CleaningTaskType::Checkout,
                CleaningPriority::High,
                CleaningTaskState::Pending,
            ),
            (
                "ct-2",
                "room-201",
                CleaningTaskType::Occupied,
                CleaningPriority::Normal,
                CleaningTaskState::InProgress,
            ),
            (
                "ct-3",
                "room-204",
                CleaningTaskType::Deep,
                CleaningPriority::Low,
                CleaningTaskState::Pending,
            ),
        ];
        for (id, room_id, task_type, priority, state) in tasks {
            self.cleaning_tasks.insert(
                id.to_string(),
                CleaningTask {
                    id: id.to_string(),
                    room_id: room_id.to_string(),
                    date: Self::SEED_TODAY,
                    task_type,
                    priority,
                    state,
                    assignee: None,
                },
            );
        }
    }

    fn seed_products_and_users(&self) {
        let products = [
            ("pr-1", "Breakfast buffet", 180.0, "restaurant"),
            ("pr-2", "Airport shuttle", 450.0, "transport"),
            ("pr-3", "Late checkout", 600.0, "front-desk"),
        ];
        for (id, name, price, category) in products {
            self.products.insert(
                id.to_string(),
                Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    price,
                    category: Some(category.to_string()),
                    active: true,
                },
            );
        }

        let users = [
            ("us-1", "mgarcia", "Marta García", "manager"),
            ("us-2", "jlopez", "Jorge López", "front-desk"),
            ("us-3", "rnavarro", "Rosa Navarro", "housekeeping"),
        ];
        for (id, username, display, role) in users {
            self.users.insert(
                id.to_string(),
                User {
                    id: id.to_string(),
                    username: username.to_string(),
                    display_name: display.to_string(),
                    role: role.to_string(),
                    active: true,
                },
            );
        }
    }

    fn sorted<T: Clone>(table: &DashMap<String, T>) -> Vec<T> {
        let mut entries: Vec<(String, T)> = table
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, v)| v).collect()
    }

    fn recompute_reservation_balance(&self, reservation_id: &str) {
        let mut history: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| p.reservation_id == reservation_id)
            .map(|p| p.value().clone())
            .collect();
        history.sort_by_key(|p| p.received_at);
        if let Some(mut reservation) = self.reservations.get_mut(reservation_id) {
            let balance = balance_of(reservation.total, &history);
            reservation.paid_amount = balance.paid;
            reservation.pending_balance = balance.pending;
        }
    }
}

#[async_trait]
impl PmsApi for DemoClient {
    async fn list_rooms(&self) -> Result<Vec<Room>, ApiError> {
        Ok(Self::sorted(&self.rooms))
    }

    async fn get_room(&self, id: &str) -> Result<Option<Room>, ApiError> {
        Ok(self.rooms.get(id).map(|r| r.clone()))
    }

    async fn create_room(&self, room: Room) -> Result<Room, ApiError> {
        self.rooms.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    async fn update_room(&self, room: Room) -> Result<Room, ApiError> {
        if !self.rooms.contains_key(&room.id) {
            return Err(ApiError::NotFound);
        }
        self.rooms.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    async fn delete_room(&self, id: &str) -> Result<(), ApiError> {
        self.rooms.remove(id).map(|_| ()).ok_or(ApiError::NotFound)
    }

    async fn list_room_types(&self) -> Result<Vec<RoomType>, ApiError> {
        Ok(Self::sorted(&self.room_types))
    }

    async fn get_room_type(&self, id: &str) -> Result<Option<RoomType>, ApiError> {
        Ok(self.room_types.get(id).map(|rt| rt.clone()))
    }

    async fn create_room_type(&self, room_type: RoomType) -> Result<RoomType, ApiError> {
        self.room_types
            .insert(room_type.id.clone(), room_type.clone());
        Ok(room_type)
    }

    async fn update_room_type(&self, room_type: RoomType) -> Result<RoomType, ApiError> {
        if !self.room_types.contains_key(&room_type.id) {
            return Err(ApiError::NotFound);
        }
        self.room_types
            .insert(room_type.id.clone(), room_type.clone());
        Ok(room_type)
    }

    async fn delete_room_type(&self, id: &str) -> Result<(), ApiError> {
        self.room_types
            .remove(id)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        Ok(Self::sorted(&self.clients))
    }

    async fn get_client(&self, id: &str) -> Result<Option<Client>, ApiError> {
        Ok(self.clients.get(id).map(|c| c.clone()))
    }

    async fn create_client(&self, mut client: Client) -> Result<Client, ApiError> {
        if client.id.is_empty() {
            client.id = self.fresh_id("cl");
        }
        self.clients.insert(client.id.clone(), client.clone());
        Ok(client)
    }

    async fn update_client(&self, client: Client) -> Result<Client, ApiError> {
        if !self.clients.contains_key(&client.id) {
            return Err(ApiError::NotFound);
        }
        self.clients.insert(client.id.clone(), client.clone());
        Ok(client)
    }

    async fn delete_client(&self, id: &str) -> Result<(), ApiError> {
        self.clients.remove(id).map(|_| ()).ok_or(ApiError::NotFound)
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        Ok(Self::sorted(&self.reservations))
    }

    async fn get_reservation(&self, id: &str) -> Result<Option<Reservation>, ApiError> {
        Ok(self.reservations.get(id).map(|r| r.clone()))
    }

    async fn create_reservation(&self, booking: NewReservation) -> Result<Reservation, ApiError> {
        let nights = nights_between(booking.check_in, booking.check_out)
            .map_err(|e| validation_error(e.to_string()))?;
        if !self.clients.contains_key(&booking.client_id) {
            return Err(validation_error(format!(
                "unknown client {}",
                booking.client_id
            )));
        }
        let totals = compute_totals(booking.nightly_rate, nights);
        let id = self.fresh_id("res");
        let number = format!("R-{}", &id[4..]);
        let reservation = Reservation {
            id: id.clone(),
            number,
            client_id: booking.client_id,
            room_id: booking.room_id,
            room_type_id: booking.room_type_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            adults: booking.adults,
            children: booking.children,
            nightly_rate: booking.nightly_rate,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            paid_amount: 0.0,
            pending_balance: totals.total,
            state: if booking.confirmed {
                ReservationState::Confirmed
            } else {
                ReservationState::Pending
            },
            special_requests: booking.special_requests,
            created_at: Utc::now(),
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn update_reservation(&self, reservation: Reservation) -> Result<Reservation, ApiError> {
        if !self.reservations.contains_key(&reservation.id) {
            return Err(ApiError::NotFound);
        }
        self.reservations
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn delete_reservation(&self, id: &str) -> Result<(), ApiError> {
        self.reservations
            .remove(id)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn list_reservation_payments(
        &self,
        reservation_id: &str,
    ) -> Result<Vec<Payment>, ApiError> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| p.reservation_id == reservation_id)
            .map(|p| p.value().clone())
            .collect();
        payments.sort_by_key(|p| p.received_at);
        Ok(payments)
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, ApiError> {
        if payment.amount <= 0.0 {
            return Err(validation_error(format!(
                "invalid payment amount {:.2}: must be greater than zero",
                payment.amount
            )));
        }
        if !self.reservations.contains_key(&payment.reservation_id) {
            return Err(ApiError::NotFound);
        }
        let stored = Payment {
            id: self.fresh_id("pay"),
            reservation_id: payment.reservation_id.clone(),
            amount: payment.amount,
            method: payment.method,
            kind: payment.kind,
            reference: payment.reference,
            notes: payment.notes,
            received_at: Utc::now(),
        };
        self.payments.insert(stored.id.clone(), stored.clone());
        // Balance is always derived from the full history, never nudged.
        self.recompute_reservation_balance(&payment.reservation_id);
        Ok(stored)
    }

    async fn delete_payment(&self, id: &str) -> Result<(), ApiError> {
        let removed = self.payments.remove(id).ok_or(ApiError::NotFound)?;
        self.recompute_reservation_balance(&removed.1.reservation_id);
        Ok(())
    }

    async fn list_cleaning_tasks(&self) -> Result<Vec<CleaningTask>, ApiError> {
        Ok(Self::sorted(&self.cleaning_tasks))
    }

    async fn get_cleaning_task(&self, id: &str) -> Result<Option<CleaningTask>, ApiError> {
        Ok(self.cleaning_tasks.get(id).map(|t| t.clone()))
    }

    async fn create_cleaning_task(&self, mut task: CleaningTask) -> Result<CleaningTask, ApiError> {
        if task.id.is_empty() {
            task.id = self.fresh_id("ct");
        }
        self.cleaning_tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update_cleaning_task(&self, task: CleaningTask) -> Result<CleaningTask, ApiError> {
        if !self.cleaning_tasks.contains_key(&task.id) {
            return Err(ApiError::NotFound);
        }
        self.cleaning_tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn delete_cleaning_task(&self, id: &str) -> Result<(), ApiError> {
        self.cleaning_tasks
            .remove(id)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Ok(Self::sorted(&self.products))
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, ApiError> {
        Ok(self.products.get(id).map(|p| p.clone()))
    }

    async fn create_product(&self, product: Product) -> Result<Product, ApiError> {
        self.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: Product) -> Result<Product, ApiError> {
        if !self.products.contains_key(&product.id) {
            return Err(ApiError::NotFound);
        }
        self.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.products.remove(id).map(|_| ()).ok_or(ApiError::NotFound)
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(Self::sorted(&self.users))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn create_user(&self, user: User) -> Result<User, ApiError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, ApiError> {
        if !self.users.contains_key(&user.id) {
            return Err(ApiError::NotFound);
        }
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.users.remove(id).map(|_| ()).ok_or(ApiError::NotFound)
    }

    async fn subscription_status(&self) -> Result<SubscriptionStatus, ApiError> {
        Ok(SubscriptionStatus {
            days_remaining: self.days_remaining.load(Ordering::SeqCst),
        })
    }
}
