use super::cart::{CartLineItem, ItemRef};
use super::order::{Order, PaymentConfirmation, PaymentRequest};
use crate::error::{AuthError, Result};
use async_trait::async_trait;
use mockall::automock;

/// The externally owned cart collection.
///
/// Checkout reads a snapshot and requests per-item removal after successful
/// enrollment; it never bulk-clears or mutates items it has not confirmed.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<CartLineItem>>;
    async fn remove_item(&self, item: &ItemRef) -> Result<()>;
}

/// The device authentication capability (biometric or device credential).
#[automock]
#[async_trait]
pub trait DeviceAuthenticator: Send + Sync {
    /// Whether any device credential can be challenged at all.
    async fn is_supported(&self) -> bool;
    /// Prompts the user, presenting `reason`. Native SDK codes are mapped to
    /// [`AuthError`] by the implementation.
    async fn authenticate(&self, reason: &str) -> std::result::Result<(), AuthError>;
}

/// The external payment gateway sheet.
///
/// A dismissed sheet resolves to [`CheckoutError::GatewayCancelled`] and a
/// gateway-side failure to [`CheckoutError::GatewayFailed`]; in both cases no
/// funds have moved.
///
/// [`CheckoutError::GatewayCancelled`]: crate::error::CheckoutError::GatewayCancelled
/// [`CheckoutError::GatewayFailed`]: crate::error::CheckoutError::GatewayFailed
#[automock]
#[async_trait]
pub trait PaymentSheet: Send + Sync {
    async fn present(&self, request: &PaymentRequest) -> Result<PaymentConfirmation>;
}

/// The backend order, verification, and enrollment endpoints.
///
/// Each call is a single round trip with no internal retry; retries are the
/// orchestrator's responsibility.
#[automock]
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, items: &[CartLineItem], token: &str) -> Result<Order>;
    async fn verify_payment(&self, confirmation: &PaymentConfirmation, token: &str) -> Result<()>;
    async fn enroll_item(&self, item: &CartLineItem, user_email: &str, token: &str) -> Result<()>;
}

pub type CartStoreBox = Box<dyn CartStore>;
pub type DeviceAuthenticatorBox = Box<dyn DeviceAuthenticator>;
pub type PaymentSheetBox = Box<dyn PaymentSheet>;
pub type OrderApiBox = Box<dyn OrderApi>;
