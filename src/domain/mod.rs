pub mod events;
pub mod user;
pub mod validation;
