pub mod camera;
pub mod gimbal;
pub mod indicators;
pub mod motors_state_manager;
pub mod vehicle_movement_mappers;
