/* 3rd party libraries */
use clap::{Arg, Command};
use log::{error, info, warn};
use std::thread::sleep;
use std::time::Duration;

/* Custom libraries */
use coordinator::Fleet;
use rides::RideManager;
use store::Store;

/* Modules */
mod config;
mod controller;
mod coordinator;
mod rides;
mod shared;
mod store;

/* Main */
fn main() {
    env_logger::init();

    let matches = Command::new("liftsim")
        .about("Simulates a fleet of elevators servicing ride requests")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .get_matches();
    let config_path = matches.value_of("config").unwrap_or("config.toml");

    // Load the configuration
    let config = config::load_config(config_path);

    // Seed the store with the building and its elevators
    let store = Store::new();
    unwrap_or_exit!(store.transaction(|txn| {
        txn.insert_building(
            &config.building.id,
            config.building.floor_count,
            config.building.doors.clone(),
        )?;
        for elevator in &config.elevators {
            txn.insert_elevator(
                &config.building.id,
                &elevator.name,
                elevator.doors.clone(),
                elevator.speed_per_floor,
                elevator.docking_speed,
                elevator.time_on_dock,
            )?;
        }
        Ok(())
    }));

    // Start one control loop per elevator
    let fleet = unwrap_or_exit!(Fleet::spawn(&store, &config.sim, &config.building.id));
    info!(
        "{} elevator(s) running in building {}",
        fleet.len(),
        config.building.id
    );

    // Queue any rides declared in the configuration
    let manager = RideManager::new(store.clone(), &config.building.id);
    for ride in &config.rides {
        if let Err(e) = manager.create_ride(ride.pickup, ride.dropoff) {
            warn!(
                "rejected configured ride {} -> {}: {}",
                ride.pickup, ride.dropoff, e
            );
        }
    }

    // The elevator state rows are the only externally observable status
    // surface; report them once a second.
    loop {
        sleep(Duration::from_secs(1));

        let states = unwrap_or_exit!(store.transaction(|txn| {
            txn.elevators_in(&config.building.id)
                .iter()
                .map(|e| txn.state(e.id))
                .collect::<Result<Vec<_>, _>>()
        }));
        for state in states {
            match serde_json::to_string(&state) {
                Ok(line) => info!("status: {}", line),
                Err(e) => error!("could not serialize elevator state: {}", e),
            }
        }
    }
}
