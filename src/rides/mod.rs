pub mod manager;
pub mod manager_tests;

pub use manager::RideManager;
