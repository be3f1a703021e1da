pub mod macros;
pub mod structs;

pub use structs::Building;
pub use structs::BuildingId;
pub use structs::Direction;
pub use structs::DoorState;
pub use structs::Elevator;
pub use structs::ElevatorId;
pub use structs::ElevatorState;
pub use structs::Ride;
pub use structs::RideId;
pub use structs::RideStatus;
pub use structs::Status;
pub use structs::Trip;
pub use structs::TripId;
pub use structs::TripStatus;
