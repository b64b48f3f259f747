#![allow(dead_code)]

use async_trait::async_trait;
use coursepay::domain::cart::{CartLineItem, ItemKind};
use coursepay::domain::order::{PaymentConfirmation, PaymentRequest};
use coursepay::domain::ports::{DeviceAuthenticator, PaymentSheet};
use coursepay::error::{AuthError, CheckoutError, Result};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub fn course(id: &str, price: Decimal) -> CartLineItem {
    CartLineItem::new(ItemKind::Course, id, price, 1, format!("Course {id}"))
}

pub fn workshop(id: &str, price: Decimal, sessions: u32) -> CartLineItem {
    CartLineItem::new(ItemKind::Workshop, id, price, sessions, format!("Workshop {id}"))
}

/// A device authenticator with a fixed scripted outcome that counts how often
/// the user was actually prompted.
#[derive(Clone)]
pub struct StubDevice {
    supported: bool,
    outcome: std::result::Result<(), AuthError>,
    prompts: Arc<Mutex<u32>>,
}

impl StubDevice {
    pub fn approving() -> Self {
        Self {
            supported: true,
            outcome: Ok(()),
            prompts: Arc::new(Mutex::new(0)),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            outcome: Err(AuthError::NotEnrolled),
            prompts: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing(error: AuthError) -> Self {
        Self {
            supported: true,
            outcome: Err(error),
            prompts: Arc::new(Mutex::new(0)),
        }
    }

    pub fn prompt_count(&self) -> u32 {
        *self.prompts.lock().unwrap()
    }
}

#[async_trait]
impl DeviceAuthenticator for StubDevice {
    async fn is_supported(&self) -> bool {
        self.supported
    }

    async fn authenticate(&self, _reason: &str) -> std::result::Result<(), AuthError> {
        *self.prompts.lock().unwrap() += 1;
        self.outcome.clone()
    }
}

/// Scripted payment sheet outcome for one `present` call.
pub enum SheetOutcome {
    /// Confirm with the given payment id; order id and a fixed signature are
    /// echoed from the request.
    Confirm(&'static str),
    Cancel,
    Fail(&'static str),
}

/// A payment sheet that replays scripted outcomes in order and records the
/// requests it was shown.
#[derive(Clone, Default)]
pub struct StubPaymentSheet {
    outcomes: Arc<Mutex<VecDeque<SheetOutcome>>>,
    requests: Arc<Mutex<Vec<PaymentRequest>>>,
}

impl StubPaymentSheet {
    pub fn with_outcomes(outcomes: Vec<SheetOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn confirming(payment_id: &'static str) -> Self {
        Self::with_outcomes(vec![SheetOutcome::Confirm(payment_id)])
    }

    pub fn presented_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<PaymentRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentSheet for StubPaymentSheet {
    async fn present(&self, request: &PaymentRequest) -> Result<PaymentConfirmation> {
        self.requests.lock().unwrap().push(request.clone());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SheetOutcome::Cancel);
        match outcome {
            SheetOutcome::Confirm(payment_id) => Ok(PaymentConfirmation {
                order_id: request.order_id.clone(),
                payment_id: payment_id.to_string(),
                signature: format!("sig_{payment_id}"),
            }),
            SheetOutcome::Cancel => Err(CheckoutError::GatewayCancelled),
            SheetOutcome::Fail(message) => Err(CheckoutError::GatewayFailed {
                message: message.to_string(),
            }),
        }
    }
}
