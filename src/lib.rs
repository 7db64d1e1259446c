pub mod calendar;
pub mod error;
pub mod models;
pub mod reports;
pub mod routes;
pub mod session;
pub mod state;
