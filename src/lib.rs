//! Client for the Vinilos vinyl catalog backend.
//!
//! [`api`] talks to the REST backend, [`repository`] turns each call into a
//! [`resource::ResourceStream`], and [`viewmodel`] folds those streams into
//! per-screen UI state. [`profiling`] times selected operations into a CSV
//! file.

pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod profiling;
pub mod repository;
pub mod resource;
pub mod viewmodel;
