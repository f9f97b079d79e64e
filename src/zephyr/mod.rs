pub mod catalog;
pub mod client;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod transport;
