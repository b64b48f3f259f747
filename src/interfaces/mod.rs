//! Interface layer for external data formats.

pub mod csv;
