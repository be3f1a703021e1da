/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::info;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{BuildingId, Direction, RideId};
use crate::store::{Store, StoreError};

/**
 * Inbound ride-submission interface.
 *
 * External request handlers go through a `RideManager` to insert new ride
 * requests into the shared pool; the elevator control loops pick them up
 * from there. Invalid requests are rejected here and never enter the queue.
 */
pub struct RideManager {
    store: Store,
    building_id: BuildingId,
}

impl RideManager {
    pub fn new(store: Store, building_id: &str) -> RideManager {
        RideManager {
            store,
            building_id: building_id.to_string(),
        }
    }

    /// Queues a ride from `pickup` to `dropoff`.
    ///
    /// Rejects requests whose resolved direction is NONE (pickup equals
    /// dropoff) and floors outside the building.
    pub fn create_ride(&self, pickup: u8, dropoff: u8) -> Result<RideId, StoreError> {
        let direction = Direction::resolve(pickup, dropoff);
        if direction == Direction::None {
            return Err(StoreError::InvalidRide(format!(
                "pickup and dropoff are both floor {}",
                pickup
            )));
        }

        let ride = self.store.transaction(|txn| {
            let building = txn.building(&self.building_id)?;
            let top = building.floor_count;
            if pickup >= top || dropoff >= top {
                return Err(StoreError::InvalidRide(format!(
                    "floors {}->{} outside building of {} floors",
                    pickup, dropoff, top
                )));
            }
            txn.insert_ride(&self.building_id, pickup, dropoff, direction)
        })?;

        info!(
            "[{}] queued ride {}: floor {} -> {} ({:?})",
            self.building_id, ride.id, pickup, dropoff, direction
        );
        Ok(ride.id)
    }
}
