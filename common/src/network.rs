pub mod device;
pub mod port;
pub mod range;
pub mod target;
