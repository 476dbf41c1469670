//! HTTP request handlers

pub mod geocode;
pub mod health;
pub mod status;
