// Network-backed facade implementation.
//
// Every call is one-shot: a failed request surfaces its error and nothing
// retries behind the operator's back. Credentials come from the session
// snapshot taken at the start of each request.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::facade::{ApiError, NewPayment, NewReservation, PmsApi};
use crate::model::{
    CleaningTask, Client, Payment, Product, Reservation, Room, RoomType, SubscriptionStatus, User,
};
use crate::session::SessionContext;
use crate::wire::{WireClient, WireReservation, WireRoom};

/// Tenant scoping header attached to every request when a hotel is known.
pub const TENANT_HEADER: &str = "X-Hotel-Id";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionContext>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "remote request");

        let mut request = self.http.request(method, &url);
        if let Some(session) = self.session.snapshot() {
            request = request.bearer_auth(&session.token);
            if let Some(hotel_id) = &session.hotel_id {
                request = request.header(TENANT_HEADER, hotel_id);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))
    }

    /// Map a non-success response to `ApiError::Remote`, pulling the
    /// backend's `message` out of the JSON body when there is one.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
            .and_then(|body| body.message)
            .unwrap_or_else(|| "could not reach the server, try again".to_string());
        warn!(status = status.as_u16(), %message, "remote request failed");
        Err(ApiError::Remote {
            status_code: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// GET where a 404 means "does not exist", not a failure.
    async fn fetch_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map(Some)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn submit<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, Some(body)).await?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send::<()>(Method::DELETE, path, None).await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PmsApi for RemoteClient {
    async fn list_rooms(&self) -> Result<Vec<Room>, ApiError> {
        let wire: Vec<WireRoom> = self.fetch("/rooms").await?;
        wire.into_iter().map(WireRoom::into_room).collect()
    }

    async fn get_room(&self, id: &str) -> Result<Option<Room>, ApiError> {
        match self.fetch_optional::<WireRoom>(&format!("/rooms/{id}")).await? {
            Some(wire) => Ok(Some(wire.into_room()?)),
            None => Ok(None),
        }
    }

    async fn create_room(&self, room: Room) -> Result<Room, ApiError> {
        let wire: WireRoom = self.submit(Method::POST, "/rooms", &room).await?;
        wire.into_room()
    }

    async fn update_room(&self, room: Room) -> Result<Room, ApiError> {
        let path = format!("/rooms/{}", room.id);
        let wire: WireRoom = self.submit(Method::PUT, &path, &room).await?;
        wire.into_room()
    }

    async fn delete_room(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/rooms/{id}")).await
    }

    async fn list_room_types(&self) -> Result<Vec<RoomType>, ApiError> {
        self.fetch("/room-types").await
    }

    async fn get_room_type(&self, id: &str) -> Result<Option<RoomType>, ApiError> {
        self.fetch_optional(&format!("/room-types/{id}")).await
    }

    async fn create_room_type(&self, room_type: RoomType) -> Result<RoomType, ApiError> {
        self.submit(Method::POST, "/room-types", &room_type).await
    }

    async fn update_room_type(&self, room_type: RoomType) -> Result<RoomType, ApiError> {
        let path = format!("/room-types/{}", room_type.id);
        self.submit(Method::PUT, &path, &room_type).await
    }

    async fn delete_room_type(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/room-types/{id}")).await
    }

    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        let wire: Vec<WireClient> = self.fetch("/clients").await?;
        Ok(wire.into_iter().map(WireClient::into_client).collect())
    }

    async fn get_client(&self, id: &str) -> Result<Option<Client>, ApiError> {
        Ok(self
            .fetch_optional::<WireClient>(&format!("/clients/{id}"))
            .await?
            .map(WireClient::into_client))
    }

    async fn create_client(&self, client: Client) -> Result<Client, ApiError> {
        let wire: WireClient = self.submit(Method::POST, "/clients", &client).await?;
        Ok(wire.into_client())
    }

    async fn update_client(&self, client: Client) -> Result<Client, ApiError> {
        let path = format!("/clients/{}", client.id);
        let wire: WireClient = self.submit(Method::PUT, &path, &client).await?;
        Ok(wire.into_client())
    }

    async fn delete_client(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/clients/{id}")).await
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        let wire: Vec<WireReservation> = self.fetch("/reservations").await?;
        wire.into_iter().map(WireReservation::into_reservation).collect()
    }

    async fn get_reservation(&self, id: &str) -> Result<Option<Reservation>, ApiError> {
        match self
            .fetch_optional::<WireReservation>(&format!("/reservations/{id}"))
            .await?
        {
            Some(wire) => Ok(Some(wire.into_reservation()?)),
            None => Ok(None),
        }
    }

    async fn create_reservation(&self, booking: NewReservation) -> Result<Reservation, ApiError> {
        let wire: WireReservation = self.submit(Method::POST, "/reservations", &booking).await?;
        wire.into_reservation()
    }

    async fn update_reservation(&self, reservation: Reservation) -> Result<Reservation, ApiError> {
        let path = format!("/reservations/{}", reservation.id);
        let wire: WireReservation = self.submit(Method::PUT, &path, &reservation).await?;
        wire.into_reservation()
    }

    async fn delete_reservation(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/reservations/{id}")).await
    }

    async fn list_reservation_payments(
        &self,
        reservation_id: &str,
    ) -> Result<Vec<Payment>, ApiError> {
        self.fetch(&format!("/reservations/{reservation_id}/payments"))
            .await
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, ApiError> {
        let path = format!("/reservations/{}/payments", payment.reservation_id);
        self.submit(Method::POST, &path, &payment).await
    }

    async fn delete_payment(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/payments/{id}")).await
    }

    async fn list_cleaning_tasks(&self) -> Result<Vec<CleaningTask>, ApiError> {
        self.fetch("/cleaning-tasks").await
    }

    async fn get_cleaning_task(&self, id: &str) -> Result<Option<CleaningTask>, ApiError> {
        self.fetch_optional(&format!("/cleaning-tasks/{id}")).await
    }

    async fn create_cleaning_task(&self, task: CleaningTask) -> Result<CleaningTask, ApiError> {
        self.submit(Method::POST, "/cleaning-tasks", &task).await
    }

    async fn update_cleaning_task(&self, task: CleaningTask) -> Result<CleaningTask, ApiError> {
        let path = format!("/cleaning-tasks/{}", task.id);
        self.submit(Method::PATCH, &path, &task).await
    }

    async fn delete_cleaning_task(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/cleaning-tasks/{id}")).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch("/products").await
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, ApiError> {
        self.fetch_optional(&format!("/products/{id}")).await
    }

    async fn create_product(&self, product: Product) -> Result<Product, ApiError> {
        self.submit(Method::POST, "/products", &product).await
    }

    async fn update_product(&self, product: Product) -> Result<Product, ApiError> {
        let path = format!("/products/{}", product.id);
        self.submit(Method::PUT, &path, &product).await
    }

    async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/products/{id}")).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.fetch("/users").await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, ApiError> {
        self.fetch_optional(&format!("/users/{id}")).await
    }

    async fn create_user(&self, user: User) -> Result<User, ApiError> {
        self.submit(Method::POST, "/users", &user).await
    }

    async fn update_user(&self, user: User) -> Result<User, ApiError> {
        let path = format!("/users/{}", user.id);
        self.submit(Method::PUT, &path, &user).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/users/{id}")).await
    }

    async fn subscription_status(&self) -> Result<SubscriptionStatus, ApiError> {
        self.fetch("/subscription").await
    }
}
