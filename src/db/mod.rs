pub mod connection;
pub mod repository;
