//! web_service - HTTP surface for the plant chat pipeline
//!
//! Thin actix-web layer over [`chat_pipeline::ChatService`]: submit,
//! edit, delete and the poll listing. No business rules live here.

pub mod controllers;
pub mod server;
