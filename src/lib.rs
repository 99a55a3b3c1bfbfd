//! Request-handling layer for the user API: create and fetch user records,
//! announcing each creation as a versioned `user.created` event.

pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;
pub mod state;
