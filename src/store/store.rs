/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::structs::intersect_doors;
use crate::shared::{
    Building, BuildingId, Direction, Elevator, ElevatorId, ElevatorState, Ride, RideId, RideStatus,
    Trip, TripId, TripStatus,
};

/***************************************/
/*               Errors                */
/***************************************/
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("building {0} not found")]
    BuildingNotFound(BuildingId),

    #[error("elevator {0} not found")]
    ElevatorNotFound(ElevatorId),

    #[error("trip {0} not found")]
    TripNotFound(TripId),

    #[error("ride {0} not found")]
    RideNotFound(RideId),

    #[error("invalid ride: {0}")]
    InvalidRide(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl StoreError {
    /// Transient failures roll the tick back and are worth retrying;
    /// everything else is a hard error.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * Shared transactional record store.
 *
 * Holds the buildings, elevators, elevator states, trips and rides that the
 * control loops coordinate through. `transaction` runs a closure against a
 * working copy of the tables and installs the copy only if the closure
 * returns `Ok`, so every mutation made inside one control-loop tick commits
 * or rolls back as a unit.
 *
 * The table lock is held for the duration of a transaction, which gives
 * serializable isolation: a ride matched by two elevators' concurrent
 * pickup attempts is claimed by exactly one, the second transaction sees
 * `trip_id` already set and excludes it.
 */
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Clone, Default)]
struct Tables {
    buildings: HashMap<BuildingId, Building>,
    elevators: HashMap<ElevatorId, Elevator>,
    states: HashMap<ElevatorId, ElevatorState>,
    trips: HashMap<TripId, Trip>,
    // BTreeMap keeps ride iteration in insertion (id) order.
    rides: BTreeMap<RideId, Ride>,
    next_elevator_id: ElevatorId,
    next_trip_id: TripId,
    next_ride_id: RideId,
    seq: u64,
}

/// One in-flight transaction. All reads and writes go through this handle;
/// nothing is visible to other loops until commit.
pub struct Txn {
    tables: Tables,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Txn) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let mut txn = Txn {
            tables: guard.clone(),
        };
        let out = f(&mut txn)?;
        *guard = txn.tables;
        Ok(out)
    }
}

impl Txn {
    /***************************************/
    /*             Buildings               */
    /***************************************/
    pub fn insert_building(
        &mut self,
        id: &str,
        floor_count: u8,
        doors: Vec<bool>,
    ) -> Result<Building, StoreError> {
        let building = Building::new(id, floor_count, doors);
        self.tables.buildings.insert(building.id.clone(), building.clone());
        Ok(building)
    }

    pub fn building(&self, id: &str) -> Result<&Building, StoreError> {
        self.tables
            .buildings
            .get(id)
            .ok_or_else(|| StoreError::BuildingNotFound(id.to_string()))
    }

    /// Removes the building together with everything it owns: elevators,
    /// their states and trips, and the building's ride pool.
    pub fn delete_building(&mut self, id: &str) -> Result<(), StoreError> {
        self.tables
            .buildings
            .remove(id)
            .ok_or_else(|| StoreError::BuildingNotFound(id.to_string()))?;

        let doomed: Vec<ElevatorId> = self
            .tables
            .elevators
            .values()
            .filter(|e| e.building_id == id)
            .map(|e| e.id)
            .collect();
        for elevator_id in doomed {
            self.tables.elevators.remove(&elevator_id);
            self.tables.states.remove(&elevator_id);
            self.tables.trips.retain(|_, t| t.elevator_id != elevator_id);
        }
        self.tables.rides.retain(|_, r| r.building_id != id);
        Ok(())
    }

    /***************************************/
    /*             Elevators               */
    /***************************************/
    /// Inserts the elevator with its door mask intersected against the
    /// building's, and creates the default 1:1 state row.
    pub fn insert_elevator(
        &mut self,
        building_id: &str,
        name: &str,
        doors: Vec<bool>,
        speed_per_floor: u64,
        docking_speed: u64,
        time_on_dock: u64,
    ) -> Result<Elevator, StoreError> {
        let building = self.building(building_id)?;
        let doors = intersect_doors(building, doors);

        self.tables.next_elevator_id += 1;
        let elevator = Elevator {
            id: self.tables.next_elevator_id,
            name: name.to_string(),
            building_id: building_id.to_string(),
            doors,
            speed_per_floor,
            docking_speed,
            time_on_dock,
        };
        self.tables
            .states
            .insert(elevator.id, ElevatorState::new(elevator.id));
        self.tables.elevators.insert(elevator.id, elevator.clone());
        Ok(elevator)
    }

    pub fn elevator(&self, id: ElevatorId) -> Result<&Elevator, StoreError> {
        self.tables
            .elevators
            .get(&id)
            .ok_or(StoreError::ElevatorNotFound(id))
    }

    pub fn elevators_in(&self, building_id: &str) -> Vec<Elevator> {
        let mut elevators: Vec<Elevator> = self
            .tables
            .elevators
            .values()
            .filter(|e| e.building_id == building_id)
            .cloned()
            .collect();
        elevators.sort_by_key(|e| e.id);
        elevators
    }

    /***************************************/
    /*           Elevator states           */
    /***************************************/
    pub fn state(&self, id: ElevatorId) -> Result<ElevatorState, StoreError> {
        self.tables
            .states
            .get(&id)
            .cloned()
            .ok_or(StoreError::ElevatorNotFound(id))
    }

    pub fn put_state(&mut self, state: ElevatorState) {
        self.tables.states.insert(state.id, state);
    }

    /***************************************/
    /*               Trips                 */
    /***************************************/
    pub fn insert_trip(&mut self, elevator_id: ElevatorId) -> Result<Trip, StoreError> {
        self.elevator(elevator_id)?;
        self.tables.next_trip_id += 1;
        self.tables.seq += 1;
        let trip = Trip {
            id: self.tables.next_trip_id,
            status: TripStatus::Draft,
            elevator_id,
            created_at: self.tables.seq,
        };
        self.tables.trips.insert(trip.id, trip.clone());
        Ok(trip)
    }

    pub fn trip(&self, id: TripId) -> Result<&Trip, StoreError> {
        self.tables.trips.get(&id).ok_or(StoreError::TripNotFound(id))
    }

    pub fn set_trip_status(&mut self, id: TripId, status: TripStatus) -> Result<(), StoreError> {
        let trip = self
            .tables
            .trips
            .get_mut(&id)
            .ok_or(StoreError::TripNotFound(id))?;
        trip.status = status;
        Ok(())
    }

    /***************************************/
    /*               Rides                 */
    /***************************************/
    pub fn insert_ride(
        &mut self,
        building_id: &str,
        pickup: u8,
        dropoff: u8,
        direction: Direction,
    ) -> Result<Ride, StoreError> {
        self.building(building_id)?;
        self.tables.next_ride_id += 1;
        self.tables.seq += 1;
        let ride = Ride {
            id: self.tables.next_ride_id,
            status: RideStatus::Queued,
            building_id: building_id.to_string(),
            pickup,
            dropoff,
            direction,
            trip_id: None,
            created_at: self.tables.seq,
        };
        self.tables.rides.insert(ride.id, ride.clone());
        Ok(ride)
    }

    pub fn ride(&self, id: RideId) -> Result<&Ride, StoreError> {
        self.tables.rides.get(&id).ok_or(StoreError::RideNotFound(id))
    }

    pub fn ride_mut(&mut self, id: RideId) -> Result<&mut Ride, StoreError> {
        self.tables
            .rides
            .get_mut(&id)
            .ok_or(StoreError::RideNotFound(id))
    }

    pub fn rides(&self) -> impl Iterator<Item = &Ride> {
        self.tables.rides.values()
    }

    /// Oldest unclaimed QUEUED ride in the building, FIFO by creation order.
    pub fn oldest_unclaimed_ride(&self, building_id: &str) -> Option<Ride> {
        self.tables
            .rides
            .values()
            .filter(|r| {
                r.building_id == building_id
                    && r.trip_id.is_none()
                    && r.status == RideStatus::Queued
            })
            .min_by_key(|r| r.created_at)
            .cloned()
    }
}
