pub mod hardware_adapter;
pub mod simulated;
