use crate::domain::cart::CartLineItem;
use crate::domain::pricing::{GstRate, ItemPricing, PriceBreakdown, compute_breakdown, price_item};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::io::Write;

/// One row of quote output: a priced cart line, or the trailing `total` row
/// with empty `id` and `title` columns.
#[derive(Debug, Serialize)]
pub struct QuoteRow {
    pub kind: String,
    pub id: String,
    pub title: String,
    #[serde(serialize_with = "serialize_two_dp")]
    pub effective_price: Decimal,
    #[serde(serialize_with = "serialize_two_dp")]
    pub ex_gst: Decimal,
    #[serde(serialize_with = "serialize_two_dp")]
    pub gst: Decimal,
}

impl QuoteRow {
    fn item(item: &CartLineItem, pricing: &ItemPricing) -> Self {
        Self {
            kind: item.kind.as_str().to_string(),
            id: item.id.clone(),
            title: item.title.clone(),
            effective_price: pricing.effective,
            ex_gst: pricing.ex_gst,
            gst: pricing.gst,
        }
    }

    fn total(breakdown: &PriceBreakdown) -> Self {
        Self {
            kind: "total".to_string(),
            id: String::new(),
            title: String::new(),
            effective_price: breakdown.total_payable,
            ex_gst: breakdown.subtotal_ex_gst,
            gst: breakdown.gst_amount,
        }
    }
}

fn serialize_two_dp<S>(value: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{value:.2}"))
}

/// Writes a price quote as CSV to any `Write` target.
///
/// Output is one row per cart line followed by a `total` row. The per-item
/// amounts are the same 2-decimal-rounded figures the totals sum, so the
/// written parts always add up to the written total.
pub struct QuoteWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> QuoteWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    /// Prices every item at the given rate, writes the quote, and returns the
    /// breakdown it wrote.
    pub fn write_quote(mut self, items: &[CartLineItem], rate: GstRate) -> Result<PriceBreakdown> {
        let breakdown = compute_breakdown(items, rate);
        for item in items {
            let pricing = price_item(item, rate);
            self.writer.serialize(QuoteRow::item(item, &pricing))?;
        }
        self.writer.serialize(QuoteRow::total(&breakdown))?;
        self.writer.flush()?;
        Ok(breakdown)
    }
}
