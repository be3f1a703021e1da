/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*            Record ids               */
/***************************************/
pub type BuildingId = String;
pub type ElevatorId = u32;
pub type TripId = u64;
pub type RideId = u64;

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    None,
    Up,
    Down,
}

impl Direction {
    /// UP if `to > from`, DOWN if `to < from`, NONE if equal.
    /// NONE is never a valid direction for a real ride.
    pub fn resolve(from: u8, to: u8) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::None
        }
    }

    pub fn reversed(&self) -> Direction {
        match *self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::None => Direction::None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Moving,
    Docking,
    Docked,
    Undocking,
    Undocked,
    Disabled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Queued,
    Enroute,
    Arrived,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Draft,
    Enroute,
    Stopped,
    Arrived,
    Cancelled,
}

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Building {
    pub id: BuildingId,
    pub floor_count: u8,
    /// One entry per floor, true = the floor has an accessible door.
    pub doors: Vec<bool>,
}

impl Building {
    pub fn new(id: &str, floor_count: u8, doors: Vec<bool>) -> Building {
        Building {
            id: id.to_string(),
            floor_count,
            doors: normalize_doors(floor_count, doors),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Elevator {
    pub id: ElevatorId,
    pub name: String,
    pub building_id: BuildingId,
    /// Intersection of the building's mask and the mask requested for this
    /// elevator, computed on assignment. An elevator cannot claim door
    /// access the building does not have.
    pub doors: Vec<bool>,
    /// Milliseconds to traverse one floor.
    pub speed_per_floor: u64,
    /// Milliseconds for one door open/close transition.
    pub docking_speed: u64,
    /// Milliseconds of dwell once docked.
    pub time_on_dock: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorState {
    /// Same key as the owning elevator (1:1).
    pub id: ElevatorId,
    pub status: Status,
    pub door_state: DoorState,
    pub direction: Direction,
    pub floor: u8,
    pub floor_time: u64,
    pub door_time: u64,
    pub docked_time: u64,
    pub trip_id: Option<TripId>,
}

impl ElevatorState {
    pub fn new(id: ElevatorId) -> ElevatorState {
        ElevatorState {
            id,
            status: Status::Idle,
            door_state: DoorState::Closed,
            direction: Direction::None,
            floor: 0,
            floor_time: 0,
            door_time: 0,
            docked_time: 0,
            trip_id: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: TripId,
    pub status: TripStatus,
    pub elevator_id: ElevatorId,
    pub created_at: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ride {
    pub id: RideId,
    pub status: RideStatus,
    pub building_id: BuildingId,
    pub pickup: u8,
    pub dropoff: u8,
    pub direction: Direction,
    /// Null while unclaimed; set exactly once by the claiming trip.
    pub trip_id: Option<TripId>,
    /// Monotonic store sequence, used for FIFO ordering among eligible rides.
    pub created_at: u64,
}

/***************************************/
/*             Public API              */
/***************************************/
/// Pad a door mask with accessible floors up to `floor_count`, truncate if
/// it is longer.
pub fn normalize_doors(floor_count: u8, mut doors: Vec<bool>) -> Vec<bool> {
    doors.truncate(floor_count as usize);
    while doors.len() < floor_count as usize {
        doors.push(true);
    }
    doors
}

/// Door mask an elevator ends up with: the building's mask ANDed with the
/// mask requested for the elevator. An empty request inherits the
/// building's mask.
pub fn intersect_doors(building: &Building, requested: Vec<bool>) -> Vec<bool> {
    if requested.is_empty() {
        return building.doors.clone();
    }
    let requested = normalize_doors(building.floor_count, requested);
    building
        .doors
        .iter()
        .zip(requested)
        .map(|(a, b)| *a && b)
        .collect()
}
