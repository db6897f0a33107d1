use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::app::AppContext;
use crate::errors::ClientError;
use crate::models::{ContactRequest, ContactResponse};

const DEFAULT_SUCCESS: &str = "Thank you! We will get back to you shortly.";
const DEFAULT_FAILURE: &str = "We could not send your message. Please try again.";

/// Contact form as typed by the visitor.
#[derive(Debug, Clone, Default, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub company: String,
    pub role: String,
    pub phone: String,
    pub country: String,
    pub linkedin: String,
}

// Reporting order when several fields fail.
const FIELD_ORDER: &[&str] = &["full_name", "email"];

impl ContactForm {
    fn trimmed(&self) -> ContactForm {
        ContactForm {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: self.company.trim().to_string(),
            role: self.role.trim().to_string(),
            phone: self.phone.trim().to_string(),
            country: self.country.trim().to_string(),
            linkedin: self.linkedin.trim().to_string(),
        }
    }

    /// First validation message, or the request body ready to send.
    pub fn to_request(&self) -> Result<ContactRequest, ClientError> {
        let form = self.trimmed();
        form.validate()
            .map_err(|errs| ClientError::Validation(first_message(&errs)))?;

        Ok(ContactRequest {
            full_name: form.full_name,
            email: form.email,
            company: form.company,
            role: form.role,
            phone: form.phone,
            country: form.country,
            linkedin: form.linkedin,
        })
    }
}

fn first_message(errs: &ValidationErrors) -> String {
    let fields = errs.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|name| fields.get(*name))
        .flat_map(|list| list.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check the form and try again".to_string())
}

/// Validates and sends the contact form, reporting the outcome as a notification.
pub async fn submit_contact(
    ctx: &AppContext,
    form: &ContactForm,
) -> Result<ContactResponse, ClientError> {
    let request = form.to_request()?;

    match ctx.api.submit_contact(&request).await {
        Ok(response) => {
            let message = response.message.as_deref().filter(|m| !m.trim().is_empty());
            if response.success {
                info!("Contact request submitted");
                ctx.notifier.success(message.unwrap_or(DEFAULT_SUCCESS));
            } else {
                warn!("Contact request rejected: {:?}", response.message);
                ctx.notifier.error(message.unwrap_or(DEFAULT_FAILURE));
            }
            Ok(response)
        }
        Err(e) if e.is_session_expired() => Err(e),
        Err(e) => {
            warn!("Contact request failed ({}): {e}", e.code());
            ctx.notifier.error(&e.user_message());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::NotificationLevel;
    use crate::testing::{harness, FakeApi};

    fn form() -> ContactForm {
        ContactForm {
            full_name: " Ada Lovelace ".into(),
            email: "ada@example.com".into(),
            company: "Analytical Engines".into(),
            role: "CTO".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_is_trimmed_and_camel_cased() {
        let request = form().to_request().unwrap();
        assert_eq!(request.full_name, "Ada Lovelace");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["fullName"], "Ada Lovelace");
        assert_eq!(body["linkedin"], "");
    }

    #[test]
    fn test_name_is_reported_before_email() {
        let bad = ContactForm {
            full_name: "   ".into(),
            email: "not-an-email".into(),
            ..Default::default()
        };
        match bad.to_request() {
            Err(ClientError::Validation(msg)) => assert_eq!(msg, "Full name is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_email() {
        let mut bad = form();
        bad.email = "ada@".into();
        assert!(matches!(
            bad.to_request(),
            Err(ClientError::Validation(msg)) if msg == "Please enter a valid email address"
        ));
    }

    #[tokio::test]
    async fn test_submit_notifies_success() {
        let h = harness(FakeApi::seeded());
        let response = submit_contact(&h.ctx, &form()).await.unwrap();
        assert!(response.success);
        assert_eq!(h.api.with(|s| s.contacts.len()), 1);
        assert_eq!(h.notifier.count(NotificationLevel::Success), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_surfaces_server_message() {
        let h = harness(FakeApi::seeded());
        h.api
            .with(|s| s.fail_submit = Some((400, Some("Email already registered".into()))));
        assert!(submit_contact(&h.ctx, &form()).await.is_err());
        let notes = h.notifier.snapshot();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "Email already registered");
    }
}
