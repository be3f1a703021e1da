/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, Elevator, ElevatorState, RideId, RideStatus, TripId};
use crate::store::Txn;

// Matching queries that admit queued rides into the active trip and decide
// whether the elevator should stop at its current floor. The direction rule:
// once a trip has committed to a direction (carries any in-flight ride), new
// pickups at the current floor must be continuing the same way.

/// True if the trip already carries rides, i.e. has committed to a direction.
pub fn trip_has_riders(txn: &Txn, trip_id: Option<TripId>) -> bool {
    let Some(trip_id) = trip_id else {
        return false;
    };
    txn.rides().any(|r| {
        r.trip_id == Some(trip_id)
            && matches!(r.status, RideStatus::Enroute | RideStatus::Queued)
    })
}

/// Dock eligibility for the elevator's current floor: a matching unclaimed
/// pickup, or a dropoff belonging to this trip. Floors without an
/// accessible door are never docked at.
pub fn should_dock(txn: &Txn, elevator: &Elevator, state: &ElevatorState) -> bool {
    let floor = state.floor;
    if !elevator.doors.get(floor as usize).copied().unwrap_or(false) {
        return false;
    }

    let committed = trip_has_riders(txn, state.trip_id);
    txn.rides().any(|r| {
        let pickup_here = r.building_id == elevator.building_id
            && r.trip_id.is_none()
            && r.status == RideStatus::Queued
            && r.pickup == floor
            && (!committed || r.direction == state.direction);
        let dropoff_here = state.trip_id.is_some()
            && r.trip_id == state.trip_id
            && r.status == RideStatus::Enroute
            && r.dropoff == floor;
        pickup_here || dropoff_here
    })
}

/// Claims every unclaimed QUEUED ride waiting at the current floor, FIFO by
/// creation time, filtered by the trip's direction once it is committed.
/// Returns the claimed ride ids.
pub fn do_pickups(
    txn: &mut Txn,
    elevator: &Elevator,
    state: &ElevatorState,
    trip_id: TripId,
) -> Vec<RideId> {
    let committed = trip_has_riders(txn, Some(trip_id));

    let mut matches: Vec<(u64, RideId)> = txn
        .rides()
        .filter(|r| {
            r.building_id == elevator.building_id
                && r.trip_id.is_none()
                && r.status == RideStatus::Queued
                && r.pickup == state.floor
                && (!committed || r.direction == state.direction)
        })
        .map(|r| (r.created_at, r.id))
        .collect();
    matches.sort_unstable();

    let mut claimed = Vec::with_capacity(matches.len());
    for (_, ride_id) in matches {
        if let Ok(ride) = txn.ride_mut(ride_id) {
            ride.trip_id = Some(trip_id);
            ride.status = RideStatus::Enroute;
            claimed.push(ride_id);
        }
    }
    claimed
}

/// Marks every ENROUTE ride of this trip whose dropoff is the current floor
/// as ARRIVED, FIFO by creation time. Returns the arrived ride ids.
pub fn do_dropoffs(txn: &mut Txn, state: &ElevatorState, trip_id: TripId) -> Vec<RideId> {
    let mut matches: Vec<(u64, RideId)> = txn
        .rides()
        .filter(|r| {
            r.trip_id == Some(trip_id)
                && r.status == RideStatus::Enroute
                && r.dropoff == state.floor
        })
        .map(|r| (r.created_at, r.id))
        .collect();
    matches.sort_unstable();

    let mut arrived = Vec::with_capacity(matches.len());
    for (_, ride_id) in matches {
        if let Ok(ride) = txn.ride_mut(ride_id) {
            ride.status = RideStatus::Arrived;
            arrived.push(ride_id);
        }
    }
    arrived
}

/// Distinct directions still needed by this trip's ENROUTE rides.
pub fn pending_directions(txn: &Txn, trip_id: TripId) -> Vec<Direction> {
    let mut dirs = Vec::new();
    for ride in txn.rides() {
        if ride.trip_id == Some(trip_id)
            && ride.status == RideStatus::Enroute
            && !dirs.contains(&ride.direction)
        {
            dirs.push(ride.direction);
        }
    }
    dirs
}
