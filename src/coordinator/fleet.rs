/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{error, info};
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::SimConfig;
use crate::controller::ElevatorController;
use crate::store::{Store, StoreError};

/**
 * Runs one control loop per elevator of a building.
 *
 * Every loop gets its own named thread and terminate channel; the loops
 * share nothing in-process except the store handle. A loop that panics
 * takes only its own elevator down; the join result is logged and the
 * remaining loops keep running.
 */
pub struct Fleet {
    loops: Vec<ControlLoop>,
}

struct ControlLoop {
    name: String,
    terminate_tx: cbc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Fleet {
    /// Enumerates the building's elevators and spawns a control loop for
    /// each.
    pub fn spawn(store: &Store, config: &SimConfig, building_id: &str) -> Result<Fleet, StoreError> {
        let (building, elevators) = store.transaction(|txn| {
            let building = txn.building(building_id)?.clone();
            let elevators = txn.elevators_in(building_id);
            Ok((building, elevators))
        })?;

        info!(
            "[{}] spawning {} control loop(s)",
            building_id,
            elevators.len()
        );

        let mut loops = Vec::with_capacity(elevators.len());
        for elevator in elevators {
            let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
            let name = elevator.name.clone();
            let controller = ElevatorController::new(
                elevator,
                building.clone(),
                store.clone(),
                config,
                terminate_rx,
            );

            let handle = Builder::new()
                .name(format!("elevator_{}", name))
                .spawn(move || controller.run())
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;

            loops.push(ControlLoop {
                name,
                terminate_tx,
                handle,
            });
        }

        Ok(Fleet { loops })
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Signals every control loop to stop and waits for them to exit.
    pub fn stop(self) {
        for control_loop in &self.loops {
            // A loop that already died has dropped its receiver; ignore.
            let _ = control_loop.terminate_tx.send(());
        }
        for control_loop in self.loops {
            if control_loop.handle.join().is_err() {
                error!("[{}] control loop panicked", control_loop.name);
            }
        }
    }
}
