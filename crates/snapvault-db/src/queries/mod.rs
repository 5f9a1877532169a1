//! Database query modules.
//!
//! This module organizes all database operations into logical groups:
//! - images: Image record persistence, lookup, partial update, and soft delete

pub mod images;
