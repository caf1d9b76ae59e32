pub mod resource;
pub mod simulated;
