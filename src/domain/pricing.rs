use crate::domain::cart::CartLineItem;
use crate::error::CheckoutError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// A GST percentage, constrained to `[0, 100)`.
///
/// Rates at or above 100 would make the tax-inclusive extraction meaningless,
/// so they are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GstRate(Decimal);

impl GstRate {
    pub fn new(percent: Decimal) -> Result<Self, CheckoutError> {
        if percent >= Decimal::ZERO && percent < Decimal::ONE_HUNDRED {
            Ok(Self(percent))
        } else {
            Err(CheckoutError::ValidationError(format!(
                "GST rate must be in [0, 100), got {percent}"
            )))
        }
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }
}

/// The priced row for a single cart line, as displayed to the user.
///
/// All three amounts are rounded to two decimal places and satisfy
/// `ex_gst + gst == effective` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemPricing {
    pub effective: Decimal,
    pub ex_gst: Decimal,
    pub gst: Decimal,
}

/// Aggregate totals for a cart, derived from the per-item rows.
///
/// `total_payable == subtotal_ex_gst + gst_amount` holds exactly because the
/// aggregates are sums of already-rounded rows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceBreakdown {
    pub subtotal_ex_gst: Decimal,
    pub gst_amount: Decimal,
    pub total_payable: Decimal,
}

/// Prices a single item, extracting GST from its tax-inclusive effective
/// price: `gst = effective * rate / (100 + rate)`.
pub fn price_item(item: &CartLineItem, rate: GstRate) -> ItemPricing {
    let effective = round2(item.effective_price());
    let gst = round2(effective * rate.percent() / (Decimal::ONE_HUNDRED + rate.percent()));
    ItemPricing {
        effective,
        ex_gst: effective - gst,
        gst,
    }
}

/// Computes the cart totals by summing per-item rows.
///
/// Rounding happens per item, at the finest displayed granularity, so the
/// displayed sum of parts always equals the displayed total. Pure and
/// deterministic; an empty cart yields an all-zero breakdown.
pub fn compute_breakdown(items: &[CartLineItem], rate: GstRate) -> PriceBreakdown {
    let mut breakdown = PriceBreakdown::default();
    for item in items {
        let row = price_item(item, rate);
        breakdown.subtotal_ex_gst += row.ex_gst;
        breakdown.gst_amount += row.gst;
    }
    breakdown.total_payable = breakdown.subtotal_ex_gst + breakdown.gst_amount;
    breakdown
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::ItemKind;
    use rust_decimal_macros::dec;

    fn course(id: &str, price: Decimal) -> CartLineItem {
        CartLineItem::new(ItemKind::Course, id, price, 1, id)
    }

    fn workshop(id: &str, price: Decimal, sessions: u32) -> CartLineItem {
        CartLineItem::new(ItemKind::Workshop, id, price, sessions, id)
    }

    fn gst(percent: Decimal) -> GstRate {
        GstRate::new(percent).unwrap()
    }

    #[test]
    fn test_rate_bounds() {
        assert!(GstRate::new(dec!(0)).is_ok());
        assert!(GstRate::new(dec!(99.99)).is_ok());
        assert!(matches!(
            GstRate::new(dec!(100)),
            Err(CheckoutError::ValidationError(_))
        ));
        assert!(matches!(
            GstRate::new(dec!(-1)),
            Err(CheckoutError::ValidationError(_))
        ));
    }

    #[test]
    fn test_single_course_extraction() {
        let row = price_item(&course("c1", dec!(999)), gst(dec!(18)));
        assert_eq!(row.effective, dec!(999.00));
        assert_eq!(row.gst, dec!(152.39));
        assert_eq!(row.ex_gst, dec!(846.61));
    }

    #[test]
    fn test_mixed_cart_breakdown() {
        let items = vec![course("c1", dec!(999)), workshop("w1", dec!(1299), 1)];
        let breakdown = compute_breakdown(&items, gst(dec!(18)));

        assert_eq!(breakdown.total_payable, dec!(2298.00));
        assert_eq!(breakdown.gst_amount, dec!(350.54));
        assert_eq!(breakdown.subtotal_ex_gst, dec!(1947.46));
    }

    #[test]
    fn test_workshop_sessions_priced_in() {
        let items = vec![workshop("w1", dec!(500), 4)];
        let breakdown = compute_breakdown(&items, gst(dec!(18)));
        assert_eq!(breakdown.total_payable, dec!(2000.00));
    }

    #[test]
    fn test_breakdown_is_additive() {
        let items = vec![
            course("c1", dec!(999)),
            course("c2", dec!(0.01)),
            workshop("w1", dec!(1299.50), 3),
            workshop("w2", dec!(42.42), 1),
        ];
        for percent in [dec!(0), dec!(5), dec!(12), dec!(18), dec!(28), dec!(99.9)] {
            let b = compute_breakdown(&items, gst(percent));
            assert_eq!(
                b.subtotal_ex_gst + b.gst_amount,
                b.total_payable,
                "breakdown must be additive at rate {percent}"
            );
        }
    }

    #[test]
    fn test_rounding_at_item_granularity() {
        // Two items priced 1.01 each: per-item GST rounds to 0.15, so the cart
        // shows 0.30 even though the unrounded sum would round to 0.31.
        let items = vec![course("c1", dec!(1.01)), course("c2", dec!(1.01))];
        let breakdown = compute_breakdown(&items, gst(dec!(18)));
        assert_eq!(breakdown.gst_amount, dec!(0.30));
        assert_eq!(breakdown.total_payable, dec!(2.02));
    }

    #[test]
    fn test_zero_rate_yields_zero_gst() {
        let items = vec![course("c1", dec!(999))];
        let breakdown = compute_breakdown(&items, gst(dec!(0)));
        assert_eq!(breakdown.gst_amount, dec!(0.00));
        assert_eq!(breakdown.subtotal_ex_gst, dec!(999.00));
        assert_eq!(breakdown.total_payable, dec!(999.00));
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let breakdown = compute_breakdown(&[], gst(dec!(18)));
        assert_eq!(breakdown, PriceBreakdown::default());
    }

    #[test]
    fn test_breakdown_is_deterministic() {
        let items = vec![course("c1", dec!(999)), workshop("w1", dec!(1299), 2)];
        let first = compute_breakdown(&items, gst(dec!(18)));
        let second = compute_breakdown(&items, gst(dec!(18)));
        assert_eq!(first, second);
    }
}
