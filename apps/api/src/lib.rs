//! COVID-19 vaccination information community API
//!
//! Users sign in with a social account, share vaccination reviews per
//! vaccine, comment on and like them, and browse daily public vaccination
//! statistics ingested from public data providers.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;
