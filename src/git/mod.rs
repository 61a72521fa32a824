pub mod clone;
pub mod repo;
