/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::SimConfig;
use crate::controller::scheduler;
use crate::controller::tick::TickClock;
use crate::shared::{
    Building, Direction, DoorState, Elevator, ElevatorState, Status, TripStatus,
};
use crate::store::{with_retries, RetryPolicy, Store, StoreError, Txn};

/**
 * Autonomous control loop for one elevator.
 *
 * The controller exclusively owns its elevator's state row; it shares the
 * ride and trip tables with every other controller through the
 * transactional store. Each tick runs exactly one status handler inside a
 * single transaction. A failed tick rolls back and is retried against
 * fresh state.
 *
 * # Fields
 * - `elevator`:     This elevator's configuration row, read once at spawn.
 * - `building`:     The owning building (floor count for the boundary clamp).
 * - `store`:        Shared transactional record store.
 * - `clock`:        Tick engine: elapsed-time accounting and delay table.
 * - `retry`:        Backoff policy for transient store failures.
 * - `terminate_rx`: Cooperative shutdown signal from the coordinator.
 */
pub struct ElevatorController {
    elevator: Elevator,
    building: Building,
    store: Store,
    clock: TickClock,
    retry: RetryPolicy,
    terminate_rx: cbc::Receiver<()>,
    last_status: Status,
}

impl ElevatorController {
    pub fn new(
        elevator: Elevator,
        building: Building,
        store: Store,
        config: &SimConfig,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorController {
        let clock = TickClock::new(&elevator.name, config.precision);
        ElevatorController {
            elevator,
            building,
            store,
            clock,
            retry: RetryPolicy {
                max_retries: config.max_txn_retries,
                backoff_ms: config.retry_backoff,
            },
            terminate_rx,
            last_status: Status::Idle,
        }
    }

    pub fn run(mut self) {
        info!("[{}] control loop starting", self.elevator.name);

        loop {
            let delay = self.clock.delay_for(self.last_status);
            cbc::select! {
                recv(self.terminate_rx) -> _ => {
                    info!("[{}] control loop stopped", self.elevator.name);
                    break;
                }
                default(Duration::from_millis(delay)) => {
                    let elapsed = self.clock.tick(delay);
                    match self.step(elapsed) {
                        Ok(status) => self.last_status = status,
                        Err(e) => {
                            error!(
                                "[{}] tick failed, disabling elevator: {}",
                                self.elevator.name, e
                            );
                            self.disable();
                            self.last_status = Status::Disabled;
                        }
                    }
                }
            }
        }
    }

    /// Executes one tick: reads the state fresh, dispatches to the handler
    /// for the current status and commits every mutation atomically.
    /// Transient store failures are retried with backoff.
    pub(crate) fn step(&self, elapsed: u64) -> Result<Status, StoreError> {
        with_retries(self.retry, || {
            self.store.transaction(|txn| {
                let mut state = txn.state(self.elevator.id)?;
                match state.status {
                    Status::Idle => self.run_idle(txn, &mut state)?,
                    Status::Moving => self.run_moving(txn, &mut state, elapsed)?,
                    Status::Docking => self.run_docking(&mut state, elapsed)?,
                    Status::Docked => self.run_docked(txn, &mut state, elapsed)?,
                    Status::Undocking => self.run_undocking(&mut state, elapsed)?,
                    Status::Undocked => self.run_undocked(txn, &mut state)?,
                    Status::Disabled => {}
                }

                if state.floor >= self.building.floor_count {
                    return Err(StoreError::Invariant(format!(
                        "floor {} outside building of {} floors",
                        state.floor, self.building.floor_count
                    )));
                }

                let status = state.status;
                txn.put_state(state);
                Ok(status)
            })
        })
    }

    /// Best-effort transition to DISABLED after a fatal tick error. The
    /// loop keeps running (at the disabled cadence) until an operator
    /// clears the status externally.
    fn disable(&self) {
        let result = self.store.transaction(|txn| {
            let mut state = txn.state(self.elevator.id)?;
            state.status = Status::Disabled;
            txn.put_state(state);
            Ok(())
        });
        if let Err(e) = result {
            error!("[{}] could not mark elevator disabled: {}", self.elevator.name, e);
        }
    }

    /***************************************/
    /*           State handlers            */
    /***************************************/

    /// IDLE: adopt the oldest unclaimed queued ride in the building and
    /// start a fresh draft trip towards its pickup floor.
    fn run_idle(
        &self,
        txn: &mut Txn,
        state: &mut ElevatorState,
    ) -> Result<(), StoreError> {
        let Some(ride) = txn.oldest_unclaimed_ride(&self.elevator.building_id) else {
            return Ok(());
        };

        let trip = txn.insert_trip(self.elevator.id)?;
        state.trip_id = Some(trip.id);
        state.status = Status::Moving;
        state.direction = Direction::resolve(state.floor, ride.pickup);
        info!(
            "[{}] found ride {} (pickup at floor {}), starting trip {} heading {:?}",
            self.elevator.name, ride.id, ride.pickup, trip.id, state.direction
        );
        Ok(())
    }

    /// MOVING: dwell `speed_per_floor` at each floor, then advance one floor
    /// in the current direction (boundary-clamped) and check whether the
    /// new floor is worth docking at.
    fn run_moving(
        &self,
        txn: &mut Txn,
        state: &mut ElevatorState,
        elapsed: u64,
    ) -> Result<(), StoreError> {
        if state.direction == Direction::None {
            return self.run_moving_in_place(txn, state);
        }

        if state.floor_time + elapsed < self.elevator.speed_per_floor {
            state.floor_time += elapsed;
            return Ok(());
        }
        state.floor_time = 0;

        let top = self.building.floor_count.saturating_sub(1);
        match state.direction {
            Direction::Up if state.floor >= top => {
                state.direction = Direction::Down;
                state.floor = state.floor.saturating_sub(1);
            }
            Direction::Down if state.floor == 0 => {
                state.direction = Direction::Up;
                state.floor = (state.floor + 1).min(top);
            }
            Direction::Up => state.floor += 1,
            Direction::Down => state.floor -= 1,
            Direction::None => {}
        }

        if scheduler::should_dock(txn, &self.elevator, state) {
            state.status = Status::Docking;
            return Ok(());
        }

        // An empty trip keeps sweeping only while something is left to
        // chase; once every ride is claimed or served elsewhere, give the
        // trip up instead of patrolling the shaft forever.
        if let Some(trip_id) = state.trip_id {
            if !scheduler::trip_has_riders(txn, state.trip_id)
                && txn.oldest_unclaimed_ride(&self.elevator.building_id).is_none()
            {
                warn!(
                    "[{}] no rides left to chase, cancelling empty trip {}",
                    self.elevator.name, trip_id
                );
                txn.set_trip_status(trip_id, TripStatus::Cancelled)?;
                state.trip_id = None;
                state.direction = Direction::None;
                state.status = Status::Idle;
            }
        }
        Ok(())
    }

    /// A trip whose pickup is the floor the elevator is already on resolves
    /// to direction NONE; there is nothing to traverse, so dock right away.
    fn run_moving_in_place(
        &self,
        txn: &mut Txn,
        state: &mut ElevatorState,
    ) -> Result<(), StoreError> {
        if scheduler::should_dock(txn, &self.elevator, state) {
            state.floor_time = 0;
            state.status = Status::Docking;
            return Ok(());
        }

        // Not dock-eligible: the floor is door-masked, or another elevator
        // claimed the ride first. Either way this trip has nothing to do.
        if let Some(trip_id) = state.trip_id {
            warn!(
                "[{}] nothing to service at floor {}, cancelling trip {}",
                self.elevator.name, state.floor, trip_id
            );
            txn.set_trip_status(trip_id, TripStatus::Cancelled)?;
        }
        state.trip_id = None;
        state.status = Status::Idle;
        Ok(())
    }

    /// DOCKING: closed doors start opening immediately, then the transition
    /// takes `docking_speed` before the elevator counts as docked.
    fn run_docking(&self, state: &mut ElevatorState, elapsed: u64) -> Result<(), StoreError> {
        match state.door_state {
            DoorState::Closed => state.door_state = DoorState::Opening,
            DoorState::Opening if state.door_time + elapsed < self.elevator.docking_speed => {
                state.door_time += elapsed;
            }
            DoorState::Opening => {
                state.door_time = 0;
                state.door_state = DoorState::Open;
                state.status = Status::Docked;
            }
            other => {
                return Err(StoreError::Invariant(format!(
                    "docking with door state {:?}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// DOCKED: on the first tick at this floor the trip stops and services
    /// dropoffs then pickups; afterwards dwell `time_on_dock` before
    /// undocking with the trip back enroute.
    fn run_docked(
        &self,
        txn: &mut Txn,
        state: &mut ElevatorState,
        elapsed: u64,
    ) -> Result<(), StoreError> {
        let trip_id = state
            .trip_id
            .ok_or_else(|| StoreError::Invariant("docked without an active trip".to_string()))?;

        let trip_status = txn.trip(trip_id)?.status;
        if matches!(trip_status, TripStatus::Draft | TripStatus::Enroute) {
            txn.set_trip_status(trip_id, TripStatus::Stopped)?;
            let arrived = scheduler::do_dropoffs(txn, state, trip_id);
            let claimed = scheduler::do_pickups(txn, &self.elevator, state, trip_id);
            if !arrived.is_empty() || !claimed.is_empty() {
                info!(
                    "[{}] docked at floor {}: {} dropoff(s), {} pickup(s)",
                    self.elevator.name,
                    state.floor,
                    arrived.len(),
                    claimed.len()
                );
            }
        }

        if state.docked_time + elapsed < self.elevator.time_on_dock {
            state.docked_time += elapsed;
        } else {
            state.docked_time = 0;
            state.status = Status::Undocking;
            txn.set_trip_status(trip_id, TripStatus::Enroute)?;
        }
        Ok(())
    }

    /// UNDOCKING: mirror of docking, closing the doors over `docking_speed`.
    fn run_undocking(&self, state: &mut ElevatorState, elapsed: u64) -> Result<(), StoreError> {
        match state.door_state {
            DoorState::Open => state.door_state = DoorState::Closing,
            DoorState::Closing if state.door_time + elapsed < self.elevator.docking_speed => {
                state.door_time += elapsed;
            }
            DoorState::Closing => {
                state.door_time = 0;
                state.door_state = DoorState::Closed;
                state.status = Status::Undocked;
            }
            other => {
                return Err(StoreError::Invariant(format!(
                    "undocking with door state {:?}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// UNDOCKED: keep moving while the trip still has riders aboard,
    /// reversing if none of them continue the current way; otherwise the
    /// trip is finished and gets archived.
    fn run_undocked(
        &self,
        txn: &mut Txn,
        state: &mut ElevatorState,
    ) -> Result<(), StoreError> {
        let trip_id = state
            .trip_id
            .ok_or_else(|| StoreError::Invariant("undocked without an active trip".to_string()))?;

        let dirs = scheduler::pending_directions(txn, trip_id);
        if dirs.is_empty() {
            let carried = txn.rides().any(|r| r.trip_id == Some(trip_id));
            let archived = if carried {
                TripStatus::Arrived
            } else {
                TripStatus::Cancelled
            };
            txn.set_trip_status(trip_id, archived)?;
            state.trip_id = None;
            state.direction = Direction::None;
            state.status = Status::Idle;
            info!(
                "[{}] trip {} finished ({:?}), going idle at floor {}",
                self.elevator.name, trip_id, archived, state.floor
            );
            return Ok(());
        }

        state.status = Status::Moving;
        if !dirs.contains(&state.direction) {
            state.direction = match state.direction {
                Direction::None => dirs[0],
                current => current.reversed(),
            };
        }
        Ok(())
    }
}
