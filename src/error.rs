use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Device authentication failures, mapped from native SDK codes at the
/// adapter boundary.
///
/// `NotEnrolled` is distinguished from the other variants because it is not
/// retriable in-app: the caller has to direct the user to system settings to
/// set up a device lock screen first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication was cancelled")]
    Cancelled,
    #[error("no device credential is enrolled; set up a lock screen in system settings")]
    NotEnrolled,
    #[error("biometric sample did not match")]
    Mismatch,
    #[error("device authentication failed: {0}")]
    Other(String),
}

/// Failures surfaced by the checkout flow.
///
/// Every variant is retained on the orchestrator state for UI consumption, so
/// the whole enum is cheap to clone. External error types that are not `Clone`
/// (csv, io, reqwest) are rendered to strings at the conversion boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// Recoverable: no funds moved, the order can be recreated via retry.
    #[error("order creation failed: {message}")]
    OrderCreationFailed { message: String },
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The user dismissed the payment sheet; no funds moved.
    #[error("payment was cancelled from the gateway sheet")]
    GatewayCancelled,
    #[error("payment gateway error: {message}")]
    GatewayFailed { message: String },
    /// Funds have moved but the server could not confirm the payment. Never
    /// retried automatically; the user must contact support with the payment id.
    #[error("payment verification failed for payment {payment_id}: {message}")]
    VerificationFailed { payment_id: String, message: String },
    /// Per-item failure; does not fail the overall checkout.
    #[error("enrollment failed for {item_id}: {message}")]
    EnrollmentFailed { item_id: String, message: String },
    #[error("{operation} is not allowed while checkout is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: &'static str,
    },
    #[error("cart error: {0}")]
    CartError(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("config error: {0}")]
    ConfigError(String),
    #[error("CSV error: {0}")]
    CsvError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<csv::Error> for CheckoutError {
    fn from(e: csv::Error) -> Self {
        Self::CsvError(e.to_string())
    }
}

impl From<std::io::Error> for CheckoutError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}
