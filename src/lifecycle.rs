// Reservation lifecycle state machine
//
// Pending -> Confirmed -> CheckedIn -> CheckedOut, with Cancelled reachable
// from Pending and Confirmed only. NoShow is a recognized state with no
// transition into it here; an external process owns that edge. Every guard
// failure leaves the reservation and the room exactly as they were.

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{CleanlinessStatus, OccupancyStatus, Reservation, ReservationState, Room};

#[derive(Error, Debug, PartialEq)]
pub enum LifecycleError {
    #[error("cannot {action} a reservation in state {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: ReservationState,
    },

    #[error("precondition not met: {missing:?}")]
    PreconditionNotMet { missing: Vec<&'static str> },

    /// Distinct from a generic precondition failure so the front desk can
    /// tell the guest the exact amount owed.
    #[error("outstanding balance of {amount:.2} must be settled before check-out")]
    OutstandingBalance { amount: f64 },

    #[error("reservation {reservation_id} is assigned to room {expected}, not {actual}")]
    RoomMismatch {
        reservation_id: String,
        expected: String,
        actual: String,
    },
}

/// Front-desk verification steps required before handing over keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckInChecklist {
    pub document_verified: bool,
    pub card_registered: bool,
    pub signature_captured: bool,
}

impl CheckInChecklist {
    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.document_verified {
            missing.push("identity document verified");
        }
        if !self.card_registered {
            missing.push("guarantee card registered");
        }
        if !self.signature_captured {
            missing.push("digital signature captured");
        }
        missing
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOutChecklist {
    pub room_inspected: bool,
    pub keys_returned: bool,
}

impl CheckOutChecklist {
    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.room_inspected {
            missing.push("room inspected");
        }
        if !self.keys_returned {
            missing.push("keys returned");
        }
        missing
    }
}

/// Pending -> Confirmed. No guard.
pub fn confirm(reservation: &mut Reservation) -> Result<(), LifecycleError> {
    match reservation.state {
        ReservationState::Pending => {
            reservation.state = ReservationState::Confirmed;
            debug!(reservation = %reservation.number, "reservation confirmed");
            Ok(())
        }
        state => Err(LifecycleError::InvalidTransition {
            action: "confirm",
            state,
        }),
    }
}

/// Pending/Confirmed -> Cancelled, once the operator has confirmed the
/// action with the guest. Cancellation is a state, never a deletion.
pub fn cancel(reservation: &mut Reservation, operator_confirmed: bool) -> Result<(), LifecycleError> {
    match reservation.state {
        ReservationState::Pending | ReservationState::Confirmed => {
            if !operator_confirmed {
                return Err(LifecycleError::PreconditionNotMet {
                    missing: vec!["operator confirmation"],
                });
            }
            reservation.state = ReservationState::Cancelled;
            debug!(reservation = %reservation.number, "reservation cancelled");
            Ok(())
        }
        state => Err(LifecycleError::InvalidTransition {
            action: "cancel",
            state,
        }),
    }
}

/// Confirmed -> CheckedIn. All three verification steps must be complete.
/// On success the room is assigned to the reservation (if it was not
/// already) and marked Occupied.
pub fn check_in(
    reservation: &mut Reservation,
    room: &mut Room,
    checklist: CheckInChecklist,
) -> Result<(), LifecycleError> {
    if reservation.state != ReservationState::Confirmed {
        return Err(LifecycleError::InvalidTransition {
            action: "check in",
            state: reservation.state,
        });
    }
    if let Some(assigned) = &reservation.room_id {
        if assigned != &room.id {
            return Err(LifecycleError::RoomMismatch {
                reservation_id: reservation.id.clone(),
                expected: assigned.clone(),
                actual: room.id.clone(),
            });
        }
    }
    let missing = checklist.missing();
    if !missing.is_empty() {
        warn!(reservation = %reservation.number, ?missing, "check-in blocked");
        return Err(LifecycleError::PreconditionNotMet { missing });
    }

    reservation.room_id = Some(room.id.clone());
    reservation.state = ReservationState::CheckedIn;
    room.occupancy = OccupancyStatus::Occupied;
    debug!(reservation = %reservation.number, room = %room.number, "guest checked in");
    Ok(())
}

/// CheckedIn -> CheckedOut. Requires an inspected room, returned keys and a
/// settled balance. An outstanding balance is reported as its own error so
/// the exact amount reaches the operator.
pub fn check_out(
    reservation: &mut Reservation,
    room: &mut Room,
    checklist: CheckOutChecklist,
) -> Result<(), LifecycleError> {
    if reservation.state != ReservationState::CheckedIn {
        return Err(LifecycleError::InvalidTransition {
            action: "check out",
            state: reservation.state,
        });
    }
    let missing = checklist.missing();
    if !missing.is_empty() {
        warn!(reservation = %reservation.number, ?missing, "check-out blocked");
        return Err(LifecycleError::PreconditionNotMet { missing });
    }
    if reservation.pending_balance > 0.0 {
        warn!(
            reservation = %reservation.number,
            owed = reservation.pending_balance,
            "check-out blocked by outstanding balance"
        );
        return Err(LifecycleError::OutstandingBalance {
            amount: reservation.pending_balance,
        });
    }

    reservation.state = ReservationState::CheckedOut;
    room.occupancy = OccupancyStatus::Available;
    // Housekeeping owns the rest of the turnaround; we only flag the room.
    room.cleanliness = CleanlinessStatus::Dirty;
    debug!(reservation = %reservation.number, room = %room.number, "guest checked out");
    Ok(())
}
