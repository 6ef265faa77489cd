pub mod config;
pub mod health;
pub mod parse;
pub mod search;
