//! Folio reader
//!
//! Column-flow pagination engine for long-form text, with a small library
//! server around it: book records, bookmarks, and a document export proxy.

pub mod bookmarks;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod library;
pub mod reader;
pub mod routes;
pub mod state;
