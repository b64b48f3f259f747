use crate::domain::ports::DeviceAuthenticatorBox;
use crate::error::AuthError;
use std::time::{Duration, Instant};

/// How long a successful device authentication stays valid for further pay
/// actions within the same checkout session.
pub const AUTH_CACHE_DURATION: Duration = Duration::from_secs(180);

const AUTH_PROMPT: &str = "Confirm your identity to authorize this payment";

/// Proof of a successful device authentication.
///
/// Freshness is decided lazily by timestamp comparison at the moment of use;
/// there is no timer. A grant never outlives the checkout session that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthGrant {
    pub granted_at: Instant,
}

impl AuthGrant {
    fn issued_now() -> Self {
        Self {
            granted_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.granted_at.elapsed()
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Instant::now())
    }

    fn is_fresh_at(&self, now: Instant) -> bool {
        now.duration_since(self.granted_at) < AUTH_CACHE_DURATION
    }
}

/// Wraps the device authentication capability with the time-boxed grant
/// cache, so quick retries within a checkout session do not prompt again.
pub struct BiometricGate {
    device: DeviceAuthenticatorBox,
}

impl BiometricGate {
    pub fn new(device: DeviceAuthenticatorBox) -> Self {
        Self { device }
    }

    /// Returns a usable grant, reusing `cached` when it is still fresh and
    /// challenging the device otherwise.
    ///
    /// An unsupported device resolves to [`AuthError::NotEnrolled`] before
    /// any prompt is shown. No network or storage is touched.
    pub async fn ensure_authenticated(
        &self,
        cached: Option<&AuthGrant>,
    ) -> Result<AuthGrant, AuthError> {
        if let Some(grant) = cached
            && grant.is_fresh()
        {
            tracing::debug!(
                age_secs = grant.age().as_secs(),
                "reusing cached device authentication grant"
            );
            return Ok(*grant);
        }

        if !self.device.is_supported().await {
            return Err(AuthError::NotEnrolled);
        }

        tracing::debug!("challenging device authentication");
        self.device.authenticate(AUTH_PROMPT).await?;
        Ok(AuthGrant::issued_now())
    }
}
