pub mod cleanup;
pub mod paths;
