use crate::application::biometric::{AuthGrant, BiometricGate};
use crate::config::CheckoutConfig;
use crate::domain::cart::CartLineItem;
use crate::domain::enrollment::EnrollmentResult;
use crate::domain::order::{Order, PaymentRequest, to_minor_units};
use crate::domain::ports::{CartStoreBox, DeviceAuthenticatorBox, OrderApiBox, PaymentSheetBox};
use crate::domain::pricing::{GstRate, PriceBreakdown, compute_breakdown};
use crate::domain::user::UserContext;
use crate::error::{CheckoutError, Result};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::fmt;

/// Where a checkout currently stands.
///
/// `OrderFailed` is a dead end that only `retry_create_order` leaves;
/// `Failed` is terminal for the attempt and only `reset` leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    CreatingOrder,
    OrderReady,
    Authenticating,
    AwaitingGateway,
    VerifyingPayment,
    Enrolling,
    Completed,
    OrderFailed,
    Failed,
}

impl CheckoutPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::CreatingOrder => "creating-order",
            CheckoutPhase::OrderReady => "order-ready",
            CheckoutPhase::Authenticating => "authenticating",
            CheckoutPhase::AwaitingGateway => "awaiting-gateway",
            CheckoutPhase::VerifyingPayment => "verifying-payment",
            CheckoutPhase::Enrolling => "enrolling",
            CheckoutPhase::Completed => "completed",
            CheckoutPhase::OrderFailed => "order-failed",
            CheckoutPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one checkout from cart snapshot to enrolled items (or a reported
/// failure), sequencing the pricing, order, biometric, gateway, verification,
/// and enrollment steps over the injected ports.
///
/// All operations are cooperative single-task async: the flow suspends at
/// each port call and owns no shared mutable state beyond its own fields.
/// Every surfaced flow error is retained in [`last_error`](Self::last_error)
/// for UI consumption.
pub struct CheckoutOrchestrator {
    config: CheckoutConfig,
    user: UserContext,
    gst_rate: GstRate,
    cart: CartStoreBox,
    gate: BiometricGate,
    sheet: PaymentSheetBox,
    api: OrderApiBox,
    phase: CheckoutPhase,
    items: Vec<CartLineItem>,
    breakdown: Option<PriceBreakdown>,
    order: Option<Order>,
    grant: Option<AuthGrant>,
    results: Vec<EnrollmentResult>,
    last_error: Option<CheckoutError>,
}

impl CheckoutOrchestrator {
    pub fn new(
        config: CheckoutConfig,
        user: UserContext,
        cart: CartStoreBox,
        device: DeviceAuthenticatorBox,
        sheet: PaymentSheetBox,
        api: OrderApiBox,
    ) -> Result<Self> {
        config.validate()?;
        let gst_rate = GstRate::new(Decimal::from(config.gst_rate_percent))?;
        Ok(Self {
            config,
            user,
            gst_rate,
            cart,
            gate: BiometricGate::new(device),
            sheet,
            api,
            phase: CheckoutPhase::Idle,
            items: Vec::new(),
            breakdown: None,
            order: None,
            grant: None,
            results: Vec::new(),
            last_error: None,
        })
    }

    /// Takes the cart snapshot, validates it, computes the price breakdown,
    /// and creates the order.
    ///
    /// Snapshot and validation failures leave the flow in `Idle`; an order
    /// creation failure moves it to `OrderFailed`, recoverable via
    /// [`retry_create_order`](Self::retry_create_order).
    pub async fn begin(&mut self) -> Result<()> {
        self.require_phase(CheckoutPhase::Idle, "begin")?;
        self.last_error = None;

        let items = match self.cart.snapshot().await {
            Ok(items) => items,
            Err(e) => return Err(self.retain_error(CheckoutPhase::Idle, e)),
        };
        if items.is_empty() {
            return Err(self.retain_error(
                CheckoutPhase::Idle,
                CheckoutError::ValidationError("cart is empty".to_string()),
            ));
        }
        // Workshop rows without a session count take the configured default
        // before anything is priced.
        let items: Vec<CartLineItem> = items
            .into_iter()
            .map(|item| item.resolve_sessions(self.config.workshop_sessions))
            .collect();
        for item in &items {
            if let Err(e) = item.validate() {
                return Err(self.retain_error(CheckoutPhase::Idle, e));
            }
        }

        self.items = items;
        self.breakdown = Some(compute_breakdown(&self.items, self.gst_rate));
        self.create_order().await
    }

    /// Discards the failed order and issues exactly one new creation attempt.
    pub async fn retry_create_order(&mut self) -> Result<()> {
        self.require_phase(CheckoutPhase::OrderFailed, "retry_create_order")?;
        self.last_error = None;
        self.order = None;
        self.create_order().await
    }

    /// Runs the pay action: biometric gate, payment sheet, verification, and
    /// the concurrent enrollment pass.
    ///
    /// Authentication and gateway failures return the flow to `OrderReady`
    /// with the order intact (no funds moved). A verification failure is
    /// terminal: funds have moved, so the flow parks in `Failed` and is never
    /// retried automatically. Per-item enrollment failures do not fail the
    /// checkout; they are reported through
    /// [`enrollment_results`](Self::enrollment_results).
    pub async fn pay(&mut self) -> Result<()> {
        self.require_phase(CheckoutPhase::OrderReady, "pay")?;
        self.last_error = None;
        let Some(order) = self.order.clone() else {
            return Err(self.retain_error(
                CheckoutPhase::Failed,
                CheckoutError::ValidationError("no order to pay for".to_string()),
            ));
        };

        self.phase = CheckoutPhase::Authenticating;
        match self.gate.ensure_authenticated(self.grant.as_ref()).await {
            Ok(grant) => self.grant = Some(grant),
            Err(e) => {
                tracing::warn!(error = %e, "device authentication failed; payment not attempted");
                return Err(self.retain_error(CheckoutPhase::OrderReady, e.into()));
            }
        }

        let request = match self.payment_request(&order) {
            Ok(request) => request,
            Err(e) => return Err(self.retain_error(CheckoutPhase::Failed, e)),
        };

        self.phase = CheckoutPhase::AwaitingGateway;
        tracing::debug!(
            order_id = %order.order_id,
            amount_minor = request.amount_minor,
            "presenting payment sheet"
        );
        let confirmation = match self.sheet.present(&request).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                // No funds moved; the order stays valid for another pay attempt.
                tracing::warn!(error = %e, "payment sheet closed without a payment");
                return Err(self.retain_error(CheckoutPhase::OrderReady, e));
            }
        };

        self.phase = CheckoutPhase::VerifyingPayment;
        if let Err(e) = self.api.verify_payment(&confirmation, &self.user.token).await {
            tracing::error!(
                payment_id = %confirmation.payment_id,
                error = %e,
                "payment verification failed after the charge; support follow-up required"
            );
            return Err(self.retain_error(CheckoutPhase::Failed, e));
        }

        self.enroll_all().await;
        self.grant = None;
        self.phase = CheckoutPhase::Completed;
        let failed = self.results.iter().filter(|r| !r.is_succeeded()).count();
        tracing::info!(
            enrolled = self.results.len() - failed,
            failed,
            "checkout completed"
        );
        Ok(())
    }

    /// Clears all per-session state, including the cached authentication
    /// grant, and returns to `Idle`. Called on screen teardown or when the
    /// user leaves mid-flow.
    pub fn reset(&mut self) {
        self.phase = CheckoutPhase::Idle;
        self.items.clear();
        self.breakdown = None;
        self.order = None;
        self.grant = None;
        self.results.clear();
        self.last_error = None;
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn breakdown(&self) -> Option<&PriceBreakdown> {
        self.breakdown.as_ref()
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn enrollment_results(&self) -> &[EnrollmentResult] {
        &self.results
    }

    /// The items the user has paid for but is not enrolled in, for the
    /// "contact support" report.
    pub fn failed_items(&self) -> Vec<&EnrollmentResult> {
        self.results.iter().filter(|r| !r.is_succeeded()).collect()
    }

    pub fn last_error(&self) -> Option<&CheckoutError> {
        self.last_error.as_ref()
    }

    async fn create_order(&mut self) -> Result<()> {
        self.phase = CheckoutPhase::CreatingOrder;
        tracing::debug!(items = self.items.len(), "creating order");
        match self.api.create_order(&self.items, &self.user.token).await {
            Ok(order) => {
                tracing::debug!(
                    order_id = %order.order_id,
                    amount = %order.amount,
                    "order created"
                );
                self.order = Some(order);
                self.phase = CheckoutPhase::OrderReady;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "order creation failed");
                Err(self.retain_error(CheckoutPhase::OrderFailed, e))
            }
        }
    }

    /// Issues every enrollment call concurrently and settles them all: one
    /// item's failure never cancels the rest. Succeeded items are removed
    /// from the external cart one by one; failed items stay in it.
    async fn enroll_all(&mut self) {
        self.phase = CheckoutPhase::Enrolling;
        let api = &self.api;
        let email = &self.user.email;
        let token = &self.user.token;
        let enrollments = self.items.iter().map(|item| async move {
            let outcome = api.enroll_item(item, email, token).await;
            (item.clone(), outcome)
        });
        let settled = join_all(enrollments).await;

        let mut results = Vec::with_capacity(settled.len());
        for (item, outcome) in settled {
            match outcome {
                Ok(()) => {
                    if let Err(e) = self.cart.remove_item(&item.item_ref()).await {
                        tracing::warn!(
                            item = %item.item_ref(),
                            error = %e,
                            "enrolled item could not be removed from the cart"
                        );
                    }
                    results.push(EnrollmentResult::succeeded(item));
                }
                Err(e) => {
                    tracing::warn!(
                        item = %item.item_ref(),
                        error = %e,
                        "enrollment failed; item stays in the cart"
                    );
                    results.push(EnrollmentResult::failed(item, e.to_string()));
                }
            }
        }
        self.results = results;
    }

    fn payment_request(&self, order: &Order) -> Result<PaymentRequest> {
        let amount_minor = to_minor_units(order.amount).ok_or_else(|| {
            CheckoutError::ValidationError(format!(
                "order amount {} cannot be expressed in minor units",
                order.amount
            ))
        })?;
        Ok(PaymentRequest {
            order_id: order.order_id.clone(),
            amount_minor,
            currency: order.currency.clone(),
            key_id: self.config.gateway_key_id.clone(),
            merchant: self.config.merchant_name.clone(),
            description: describe_items(&self.items),
            prefill_email: self.user.email.clone(),
            prefill_contact: self.user.contact.clone(),
        })
    }

    fn require_phase(&self, expected: CheckoutPhase, operation: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            // Phase misuse is a caller bug; it is reported but does not
            // overwrite the retained flow error.
            Err(CheckoutError::InvalidPhase {
                operation,
                phase: self.phase.as_str(),
            })
        }
    }

    fn retain_error(&mut self, phase: CheckoutPhase, error: CheckoutError) -> CheckoutError {
        self.phase = phase;
        self.last_error = Some(error.clone());
        error
    }
}

fn describe_items(items: &[CartLineItem]) -> String {
    match items {
        [] => String::new(),
        [only] => only.title.clone(),
        [first, rest @ ..] => format!("{} and {} more", first.title, rest.len()),
    }
}
