//! CSV reading and writing for cart snapshots and price quotes.

pub mod cart_reader;
pub mod quote_writer;
