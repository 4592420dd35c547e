pub mod auth;
pub mod college;
pub mod participant;
pub mod upload;
