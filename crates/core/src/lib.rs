//! Core business logic for letcook.

pub mod services;

pub use services::*;
