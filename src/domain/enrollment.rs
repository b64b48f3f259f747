use crate::domain::cart::CartLineItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Succeeded,
    Failed,
}

/// Per-item outcome of the post-payment enrollment pass.
///
/// A failed result keeps its item in the cart and is reported individually;
/// it never reverts the overall checkout. The constructors keep
/// `failure_reason` present exactly when the status is `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentResult {
    pub item: CartLineItem,
    pub status: EnrollmentStatus,
    failure_reason: Option<String>,
}

impl EnrollmentResult {
    pub fn succeeded(item: CartLineItem) -> Self {
        Self {
            item,
            status: EnrollmentStatus::Succeeded,
            failure_reason: None,
        }
    }

    pub fn failed(item: CartLineItem, reason: impl Into<String>) -> Self {
        Self {
            item,
            status: EnrollmentStatus::Failed,
            failure_reason: Some(reason.into()),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == EnrollmentStatus::Succeeded
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}
