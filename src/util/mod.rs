pub mod log;
pub mod misc;
pub mod wall;
