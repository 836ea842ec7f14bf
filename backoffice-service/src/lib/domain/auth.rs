pub mod code_manager;
pub mod errors;
pub mod models;
pub mod ports;
pub mod reset_manager;
pub mod service;
