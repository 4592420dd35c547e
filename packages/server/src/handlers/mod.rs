pub mod auth;
pub mod college;
pub mod files;
pub mod participant;
pub mod upload;
