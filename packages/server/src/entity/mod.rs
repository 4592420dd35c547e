pub mod admin;
pub mod college;
pub mod file_upload;
pub mod participant;
