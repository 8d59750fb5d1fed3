//! Media Renamer Library
//!
//! Classifies TV episodes, movies and anime dropped into an arbitrary path
//! using TMDB and optional AI hints, then links, copies or moves them into a
//! canonical library layout.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
