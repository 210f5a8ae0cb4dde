//! Recipe Book web library.
//!
//! This crate provides the recipe site as a library, allowing it to be
//! tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schemas;
pub mod seed;
pub mod services;
pub mod state;
