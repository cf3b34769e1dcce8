pub mod app;
pub mod auth;
pub mod categories;
pub mod config;
pub mod error;
pub mod expenses;
pub mod seed;
pub mod state;
pub mod statistics;
pub mod storage;
