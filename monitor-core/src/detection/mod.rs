pub mod poller;
pub mod roster;
