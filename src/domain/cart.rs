use crate::error::CheckoutError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a cart line refers to a course or a workshop.
///
/// The two kinds are priced and enrolled differently: workshop prices are
/// multiplied by the session count, and enrollment is routed to a
/// kind-specific endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Course,
    Workshop,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Course => "course",
            ItemKind::Workshop => "workshop",
        }
    }
}

/// One purchasable unit in the cart.
///
/// Created and owned by the external cart store; the checkout flow only reads
/// a snapshot and, after successful enrollment, requests removal by
/// [`ItemRef`]. `sessions` is priced in only for workshops; `None` means the
/// snapshot did not carry a count and the configured workshop default applies
/// via [`resolve_sessions`](Self::resolve_sessions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub kind: ItemKind,
    pub id: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image_url: Option<String>,
}

impl CartLineItem {
    pub fn new(
        kind: ItemKind,
        id: impl Into<String>,
        price: Decimal,
        sessions: u32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            price,
            sessions: Some(sessions),
            title: title.into(),
            short_title: None,
            preview_image_url: None,
        }
    }

    /// Fills in `workshop_default` for a workshop whose snapshot carried no
    /// session count. An explicit count is never overridden, and courses are
    /// left untouched.
    pub fn resolve_sessions(mut self, workshop_default: u32) -> Self {
        if self.kind == ItemKind::Workshop && self.sessions.is_none() {
            self.sessions = Some(workshop_default);
        }
        self
    }

    /// The tax-inclusive price this item contributes to the cart total:
    /// `price * sessions` for workshops, `price` for courses. An unresolved
    /// workshop counts as a single session.
    pub fn effective_price(&self) -> Decimal {
        match self.kind {
            ItemKind::Course => self.price,
            ItemKind::Workshop => self.price * Decimal::from(self.sessions.unwrap_or(1)),
        }
    }

    /// The key used to request removal from the external cart.
    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            kind: self.kind,
            id: self.id.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.id.trim().is_empty() {
            return Err(CheckoutError::ValidationError(
                "item id must not be empty".to_string(),
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(CheckoutError::ValidationError(format!(
                "price of {} must not be negative",
                self.id
            )));
        }
        if self.sessions == Some(0) {
            return Err(CheckoutError::ValidationError(format!(
                "session count of {} must be at least 1",
                self.id
            )));
        }
        Ok(())
    }
}

/// Removal key for a cart line item: the kind plus its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: String,
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.id)
    }
}
