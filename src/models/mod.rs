pub mod auth;
pub mod common;
pub mod event;
pub mod result;
pub mod standing;
pub mod views;
