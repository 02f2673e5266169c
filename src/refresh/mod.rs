// src/refresh/mod.rs
mod poller;

pub use poller::StatusPoller;
