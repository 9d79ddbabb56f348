//! Typed accessors over the relational store. Parameterized SQL only;
//! no business rules live here.

pub mod audit;
pub mod leave_requests;
pub mod users;
