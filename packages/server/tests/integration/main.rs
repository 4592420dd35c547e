mod common;

mod college;
mod upload;
