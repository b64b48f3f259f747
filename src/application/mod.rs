//! Application layer containing the checkout orchestration logic.
//!
//! This module defines the `CheckoutOrchestrator`, the single owner of a
//! checkout session's state machine, and the `BiometricGate` that fronts the
//! device authenticator with a short-lived grant cache.

pub mod biometric;
pub mod checkout;
