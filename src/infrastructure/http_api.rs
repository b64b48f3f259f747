use crate::config::CheckoutConfig;
use crate::domain::cart::{CartLineItem, ItemKind};
use crate::domain::order::{Order, PaymentConfirmation, to_minor_units};
use crate::domain::ports::OrderApi;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// REST adapter for the storefront backend: order creation, payment
/// verification, and the two enrollment endpoints.
///
/// Each method is a single round trip with no internal retry; the
/// orchestrator decides what is retriable. Amounts cross this boundary in
/// minor units (paise for INR) and are converted back to major units on the
/// way in.
pub struct HttpOrderApi {
    client: Client,
    base_url: String,
    currency: String,
}

impl HttpOrderApi {
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            currency: config.currency.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    course_ids: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    workshop_ids: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    order_id: String,
    amount: i64,
    currency: String,
}

#[derive(Debug, Serialize)]
struct VerifyPaymentRequest<'a> {
    order_id: &'a str,
    payment_id: &'a str,
    signature: &'a str,
}

#[derive(Debug, Serialize)]
struct EnrollmentRequest<'a> {
    user_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    course_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workshop_id: Option<&'a str>,
}

fn ids_of_kind(items: &[CartLineItem], kind: ItemKind) -> Vec<&str> {
    items
        .iter()
        .filter(|item| item.kind == kind)
        .map(|item| item.id.as_str())
        .collect()
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn create_order(&self, items: &[CartLineItem], token: &str) -> Result<Order> {
        // The gateway receives the tax-inclusive total, not the GST split.
        let total: Decimal = items.iter().map(|item| item.effective_price()).sum();
        let amount = to_minor_units(total).ok_or_else(|| CheckoutError::OrderCreationFailed {
            message: format!("cart total {total} cannot be expressed in minor units"),
        })?;

        let request = CreateOrderRequest {
            amount,
            currency: &self.currency,
            course_ids: ids_of_kind(items, ItemKind::Course),
            workshop_ids: ids_of_kind(items, ItemKind::Workshop),
        };

        tracing::debug!(amount, currency = %self.currency, "requesting order creation");
        let response = self
            .client
            .post(self.url("orders"))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::OrderCreationFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CheckoutError::OrderCreationFailed {
                message: format!("server returned {}", response.status()),
            });
        }

        let body: CreateOrderResponse =
            response
                .json()
                .await
                .map_err(|e| CheckoutError::OrderCreationFailed {
                    message: e.to_string(),
                })?;

        Ok(Order {
            order_id: body.order_id,
            amount: Decimal::new(body.amount, 2),
            currency: body.currency,
        })
    }

    async fn verify_payment(&self, confirmation: &PaymentConfirmation, token: &str) -> Result<()> {
        let request = VerifyPaymentRequest {
            order_id: &confirmation.order_id,
            payment_id: &confirmation.payment_id,
            signature: &confirmation.signature,
        };

        let failure = |message: String| CheckoutError::VerificationFailed {
            payment_id: confirmation.payment_id.clone(),
            message,
        };

        let response = self
            .client
            .post(self.url("payments/verify"))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| failure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure(format!("server returned {}", response.status())));
        }
        Ok(())
    }

    async fn enroll_item(&self, item: &CartLineItem, user_email: &str, token: &str) -> Result<()> {
        let (path, request) = match item.kind {
            ItemKind::Course => (
                "enrollments/courses",
                EnrollmentRequest {
                    user_email,
                    course_id: Some(&item.id),
                    workshop_id: None,
                },
            ),
            ItemKind::Workshop => (
                "enrollments/workshops",
                EnrollmentRequest {
                    user_email,
                    course_id: None,
                    workshop_id: Some(&item.id),
                },
            ),
        };

        let failure = |message: String| CheckoutError::EnrollmentFailed {
            item_id: item.id.clone(),
            message,
        };

        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| failure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure(format!("server returned {}", response.status())));
        }
        Ok(())
    }
}
