pub mod control_loops;
pub mod flight_controllers;
