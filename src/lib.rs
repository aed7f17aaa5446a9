pub mod api;
pub mod cards;
pub mod config;
pub mod data_models;
pub mod query_handler;
pub mod search_client;
