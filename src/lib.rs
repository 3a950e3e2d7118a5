pub mod api;
pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod tasks;
pub mod users;

#[cfg(test)]
pub mod test_utils;
