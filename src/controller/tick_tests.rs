/*
 * Unit tests for the tick engine.
 *
 * The unit tests follow the Arrange, Act, Assert pattern. The elapsed-time
 * tests touch the wall clock, so they only assert lower bounds and a
 * generous upper bound.
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tick_tests {
    use std::thread::sleep;
    use std::time::Duration;

    use crate::controller::tick::TickClock;
    use crate::shared::Status;

    #[test]
    fn test_delay_table_per_status() {
        // Arrange
        let clock = TickClock::new("E01", 100);

        // Act + Assert: idle wakes at half the precision, disabled at five
        // times, every other status at exactly the precision
        assert_eq!(clock.delay_for(Status::Idle), 50);
        assert_eq!(clock.delay_for(Status::Disabled), 500);
        for status in [
            Status::Moving,
            Status::Docking,
            Status::Docked,
            Status::Undocking,
            Status::Undocked,
        ] {
            assert_eq!(clock.delay_for(status), 100);
        }
    }

    #[test]
    fn test_delay_is_never_zero() {
        // Arrange: the smallest possible precision
        let clock = TickClock::new("E01", 1);

        // Act + Assert: integer division must not produce a busy loop
        assert_eq!(clock.delay_for(Status::Idle), 1);
        assert_eq!(clock.delay_for(Status::Moving), 1);
    }

    #[test]
    fn test_zero_precision_is_clamped_to_one() {
        let clock = TickClock::new("E01", 0);

        assert_eq!(clock.delay_for(Status::Moving), 1);
        assert_eq!(clock.delay_for(Status::Disabled), 5);
    }

    #[test]
    fn test_first_tick_elapses_nothing() {
        // Arrange
        let mut clock = TickClock::new("E01", 1);

        // Act: there is no previous tick to measure against
        let elapsed = clock.tick(1);

        // Assert
        assert_eq!(elapsed, 0);
    }

    #[test]
    fn test_tick_measures_time_since_previous_tick() {
        // Arrange
        let mut clock = TickClock::new("E01", 1);
        clock.tick(1);

        // Act
        sleep(Duration::from_millis(25));
        let elapsed = clock.tick(1);

        // Assert: at least the time slept, and nowhere near a runaway value
        assert!(elapsed >= 25, "elapsed {} below the time slept", elapsed);
        assert!(elapsed < 5_000, "elapsed {} implausibly large", elapsed);
    }

    #[test]
    fn test_elapsed_is_independent_of_the_slept_argument() {
        // Arrange: the slept argument only feeds the heartbeat buffer
        let mut clock = TickClock::new("E01", 1);
        clock.tick(1_000_000);

        // Act
        let elapsed = clock.tick(1_000_000);

        // Assert: back-to-back ticks measure almost no wall time
        assert!(elapsed < 1_000, "elapsed {} tracked the slept argument", elapsed);
    }
}
