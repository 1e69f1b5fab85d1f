//! Customer domain entity

use chrono::{DateTime, Utc};

/// A customer, registered or guest.
///
/// Guests are matched by contact email: reserving without an account either
/// finds the existing record for that email or creates one.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID
    pub id: String,
    pub name: String,
    /// Contact email; guest identity key
    pub email: String,
    pub phone: Option<String>,
    /// Consent to email notifications
    pub email_opt_in: bool,
    /// Consent to SMS notifications
    pub sms_opt_in: bool,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn guest(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        email_opt_in: bool,
        sms_opt_in: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            phone,
            email_opt_in,
            sms_opt_in,
            created_at: Utc::now(),
        }
    }

    /// SMS requires both consent and a phone number on file.
    pub fn can_receive_sms(&self) -> bool {
        self.sms_opt_in && self.phone.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sms_needs_phone_and_consent() {
        let mut c = Customer::guest("Ada", "ada@example.com", Some("+15550100".into()), true, true);
        assert!(c.can_receive_sms());

        c.phone = None;
        assert!(!c.can_receive_sms());

        c.phone = Some("+15550100".into());
        c.sms_opt_in = false;
        assert!(!c.can_receive_sms());
    }
}
