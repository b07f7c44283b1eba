pub mod ai;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractions;
pub mod health;
pub mod repositories;
pub mod routes;
pub mod selection;
pub mod validation;
pub mod vocabulary;
pub mod words;
pub mod workspace;
