pub mod serial;
pub mod service;
