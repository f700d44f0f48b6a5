//! HTTP handlers

pub mod admin_handlers;
pub mod diagram_handlers;
pub mod health_handlers;
