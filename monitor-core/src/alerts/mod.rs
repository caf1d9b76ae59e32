pub mod board;
pub mod dispatcher;
