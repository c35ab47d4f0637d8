pub mod alert;
pub mod device;
pub mod event;
pub mod station;
pub mod train;
pub mod user;
