/// The authenticated principal handed over by the external auth service.
///
/// The checkout flow never manages login or logout; it only consumes the
/// bearer token for API calls and the contact details for the payment sheet
/// prefill.
#[derive(Debug, Clone, PartialEq)]
pub struct UserContext {
    pub token: String,
    pub email: String,
    pub contact: Option<String>,
}

impl UserContext {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
            contact: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}
