//! Periodic polling of the air-quality sensor endpoint.

pub mod poller;
