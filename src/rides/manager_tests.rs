/*
 * Unit tests for the ride-submission interface.
 *
 * The unit tests follow the Arrange, Act, Assert pattern.
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod manager_tests {
    use crate::rides::RideManager;
    use crate::shared::{Direction, RideStatus};
    use crate::store::Store;

    fn setup() -> (Store, RideManager) {
        let store = Store::new();
        store
            .transaction(|txn| {
                txn.insert_building("B01", 5, vec![])?;
                Ok(())
            })
            .unwrap();
        let manager = RideManager::new(store.clone(), "B01");
        (store, manager)
    }

    #[test]
    fn test_create_ride_queues_with_resolved_direction() {
        // Arrange
        let (store, manager) = setup();

        // Act
        let ride_id = manager.create_ride(1, 4).unwrap();

        // Assert
        let ride = store.transaction(|txn| txn.ride(ride_id).cloned()).unwrap();
        assert_eq!(ride.status, RideStatus::Queued);
        assert_eq!(ride.direction, Direction::Up);
        assert_eq!(ride.trip_id, None);
        assert_eq!((ride.pickup, ride.dropoff), (1, 4));
    }

    #[test]
    fn test_create_ride_rejects_equal_pickup_and_dropoff() {
        let (store, manager) = setup();

        let result = manager.create_ride(2, 2);

        // The invalid request never enters the queue
        assert!(result.is_err());
        let rides = store.transaction(|txn| Ok(txn.rides().count())).unwrap();
        assert_eq!(rides, 0);
    }

    #[test]
    fn test_create_ride_rejects_floors_outside_building() {
        let (store, manager) = setup();

        assert!(manager.create_ride(0, 5).is_err());
        assert!(manager.create_ride(7, 2).is_err());

        let rides = store.transaction(|txn| Ok(txn.rides().count())).unwrap();
        assert_eq!(rides, 0);
    }

    #[test]
    fn test_create_ride_rejects_unknown_building() {
        let store = Store::new();
        let manager = RideManager::new(store, "nowhere");

        assert!(manager.create_ride(0, 3).is_err());
    }
}
