/*
 * Unit tests for the transactional record store.
 *
 * The unit tests follow the Arrange, Act, Assert pattern.
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod store_tests {
    use crate::shared::{Direction, RideStatus, Status, TripStatus};
    use crate::store::{with_retries, RetryPolicy, Store, StoreError};

    fn seeded_store() -> Store {
        let store = Store::new();
        store
            .transaction(|txn| {
                txn.insert_building("B01", 5, vec![])?;
                txn.insert_elevator("B01", "E01", vec![], 500, 200, 400)?;
                Ok(())
            })
            .unwrap();
        store
    }

    #[test]
    fn test_insert_elevator_creates_default_state_row() {
        // Arrange
        let store = seeded_store();

        // Act
        let state = store
            .transaction(|txn| {
                let elevator = txn.elevators_in("B01").remove(0);
                txn.state(elevator.id)
            })
            .unwrap();

        // Assert
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.floor, 0);
        assert_eq!(state.direction, Direction::None);
        assert_eq!(state.trip_id, None);
    }

    #[test]
    fn test_insert_elevator_intersects_door_mask() {
        let store = Store::new();

        let elevator = store
            .transaction(|txn| {
                txn.insert_building("B01", 4, vec![true, true, false, true])?;
                txn.insert_elevator("B01", "E01", vec![true, false, true, true], 500, 200, 400)
            })
            .unwrap();

        assert_eq!(elevator.doors, vec![true, false, false, true]);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        // Arrange
        let store = seeded_store();

        // Act: mutate, then fail the transaction
        let result: Result<(), StoreError> = store.transaction(|txn| {
            txn.insert_ride("B01", 0, 3, Direction::Up)?;
            Err(StoreError::Unavailable("connection lost".to_string()))
        });

        // Assert: the insert never became visible
        assert!(result.is_err());
        let rides = store
            .transaction(|txn| Ok(txn.rides().count()))
            .unwrap();
        assert_eq!(rides, 0);
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let store = seeded_store();

        store
            .transaction(|txn| {
                txn.insert_ride("B01", 0, 3, Direction::Up)?;
                Ok(())
            })
            .unwrap();

        let ride = store
            .transaction(|txn| txn.ride(1).cloned())
            .unwrap();
        assert_eq!(ride.status, RideStatus::Queued);
        assert_eq!(ride.trip_id, None);
    }

    #[test]
    fn test_oldest_unclaimed_ride_is_fifo_and_skips_claimed() {
        // Arrange: three rides, the oldest already claimed by a trip
        let store = seeded_store();
        store
            .transaction(|txn| {
                let elevator = txn.elevators_in("B01").remove(0);
                let trip = txn.insert_trip(elevator.id)?;
                let first = txn.insert_ride("B01", 0, 3, Direction::Up)?;
                txn.insert_ride("B01", 1, 4, Direction::Up)?;
                txn.insert_ride("B01", 2, 0, Direction::Down)?;
                let ride = txn.ride_mut(first.id)?;
                ride.trip_id = Some(trip.id);
                ride.status = RideStatus::Enroute;
                Ok(())
            })
            .unwrap();

        // Act
        let oldest = store
            .transaction(|txn| Ok(txn.oldest_unclaimed_ride("B01")))
            .unwrap();

        // Assert: the second ride is the oldest still unclaimed
        assert_eq!(oldest.unwrap().pickup, 1);
    }

    #[test]
    fn test_delete_building_cascades() {
        // Arrange: a second building that must survive
        let store = seeded_store();
        store
            .transaction(|txn| {
                txn.insert_building("B02", 3, vec![])?;
                txn.insert_elevator("B02", "X01", vec![], 500, 200, 400)?;
                let elevator = txn.elevators_in("B01").remove(0);
                txn.insert_trip(elevator.id)?;
                txn.insert_ride("B01", 0, 3, Direction::Up)?;
                txn.insert_ride("B02", 0, 2, Direction::Up)?;
                Ok(())
            })
            .unwrap();

        // Act
        store.transaction(|txn| txn.delete_building("B01")).unwrap();

        // Assert: B01 and everything it owned is gone, B02 is untouched
        store
            .transaction(|txn| {
                assert!(txn.building("B01").is_err());
                assert!(txn.elevators_in("B01").is_empty());
                assert!(txn.trip(1).is_err());
                assert_eq!(txn.rides().count(), 1);
                assert_eq!(txn.elevators_in("B02").len(), 1);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_trip_lifecycle_statuses() {
        let store = seeded_store();

        let trip = store
            .transaction(|txn| {
                let elevator = txn.elevators_in("B01").remove(0);
                let trip = txn.insert_trip(elevator.id)?;
                txn.set_trip_status(trip.id, TripStatus::Stopped)?;
                txn.trip(trip.id).cloned()
            })
            .unwrap();

        assert_eq!(trip.status, TripStatus::Stopped);
    }

    #[test]
    fn test_with_retries_recovers_from_transient_failures() {
        // Arrange
        let policy = RetryPolicy {
            max_retries: 5,
            backoff_ms: 1,
        };
        let mut attempts = 0;

        // Act: fail twice, then succeed
        let result = with_retries(policy, || {
            attempts += 1;
            if attempts < 3 {
                Err(StoreError::Unavailable("deadlock".to_string()))
            } else {
                Ok(attempts)
            }
        });

        // Assert
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_with_retries_gives_up_after_budget() {
        let policy = RetryPolicy {
            max_retries: 2,
            backoff_ms: 1,
        };
        let mut attempts = 0;

        let result: Result<(), StoreError> = with_retries(policy, || {
            attempts += 1;
            Err(StoreError::Unavailable("deadlock".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_with_retries_does_not_retry_hard_errors() {
        let policy = RetryPolicy {
            max_retries: 5,
            backoff_ms: 1,
        };
        let mut attempts = 0;

        let result: Result<(), StoreError> = with_retries(policy, || {
            attempts += 1;
            Err(StoreError::Invariant("floor out of range".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }
}
