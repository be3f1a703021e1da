pub mod fsm;
pub mod scheduler;
pub mod tick;

pub mod tick_tests;

pub use fsm::ElevatorController;
