pub mod attachment;
pub mod audit;
pub mod leave_request;
pub mod user;
