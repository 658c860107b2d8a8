//! The repository coordinator.

pub mod auth_token_repository;
