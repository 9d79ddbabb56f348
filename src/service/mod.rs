pub mod attachment;
pub mod lifecycle;
pub mod notify;
pub mod overlap;
