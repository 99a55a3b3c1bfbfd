pub mod kafka;
pub mod memory;
pub mod postgres;
