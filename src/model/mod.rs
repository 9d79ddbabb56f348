pub mod audit_log;
pub mod leave_request;
pub mod role;
pub mod status;
pub mod user;
