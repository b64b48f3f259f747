use crate::domain::cart::CartLineItem;
use crate::error::{CheckoutError, Result};
use std::io::Read;

/// Reads a cart snapshot from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<CartLineItem>`. It handles whitespace trimming and flexible record
/// lengths automatically; the `sessions` column may be omitted entirely.
pub struct CartSnapshotReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CartSnapshotReader<R> {
    /// Creates a new `CartSnapshotReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes cart items.
    pub fn items(self) -> impl Iterator<Item = Result<CartLineItem>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
