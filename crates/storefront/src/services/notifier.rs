//! Out-of-band delivery of one-time codes.

use core::fmt;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use freshco_core::{CodePurpose, Email, Mobile};

/// Where a code is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Email(Email),
    /// SMS to a mobile number.
    Mobile(Mobile),
}

impl Destination {
    /// Short channel name for logs.
    #[must_use]
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Mobile(_) => "sms",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(email) => fmt::Display::fmt(email, f),
            Self::Mobile(mobile) => f.write_str(&mobile.international()),
        }
    }
}

impl From<Email> for Destination {
    fn from(email: Email) -> Self {
        Self::Email(email)
    }
}

impl From<&Email> for Destination {
    fn from(email: &Email) -> Self {
        Self::Email(email.clone())
    }
}

impl From<Mobile> for Destination {
    fn from(mobile: Mobile) -> Self {
        Self::Mobile(mobile)
    }
}

impl From<&Mobile> for Destination {
    fn from(mobile: &Mobile) -> Self {
        Self::Mobile(mobile.clone())
    }
}

/// The delivery channel refused or failed to deliver a code.
#[derive(Debug, Error)]
#[error("could not deliver code to {destination}: {reason}")]
pub struct DeliveryError {
    /// Where the code was headed.
    pub destination: String,
    /// What went wrong.
    pub reason: String,
}

/// Delivers a one-time code to its owner.
///
/// A failed delivery fails the operation that issued the code.
#[trait_variant::make(Notifier: Send)]
pub trait LocalNotifier {
    async fn deliver(
        &self,
        destination: &Destination,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), DeliveryError>;
}

/// Writes codes to the terminal, for local development.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    #[allow(clippy::print_stdout)]
    async fn deliver(
        &self,
        destination: &Destination,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), DeliveryError> {
        let heading = match purpose {
            CodePurpose::RegistrationVerification => "VERIFICATION CODE",
            CodePurpose::PasswordReset => "PASSWORD RESET CODE",
        };

        let channel = destination.channel();

        println!();
        println!("========================================");
        println!("  {heading} ({channel}) FOR: {destination}");
        println!("  CODE: {code}");
        println!("========================================");
        println!();

        tracing::info!(%destination, channel, %purpose, "Code delivered to console");
        Ok(())
    }
}

/// A delivered code, as captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub destination: Destination,
    pub code: String,
    pub purpose: CodePurpose,
}

/// Keeps every delivered code in memory so callers can read it back.
///
/// Can be switched into a failing mode to exercise delivery errors.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    deliveries: Mutex<Vec<Delivery>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent deliveries fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap_or_else(PoisonError::into_inner) = failing;
    }

    /// All successful deliveries, oldest first.
    #[must_use]
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent delivery to `destination`.
    #[must_use]
    pub fn last_delivery_to(&self, destination: impl Into<Destination>) -> Option<Delivery> {
        let destination = destination.into();
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|d| d.destination == destination)
            .cloned()
    }

    /// The code most recently delivered to `destination`.
    #[must_use]
    pub fn last_code_for(&self, destination: impl Into<Destination>) -> Option<String> {
        self.last_delivery_to(destination).map(|d| d.code)
    }
}

impl Notifier for RecordingNotifier {
    async fn deliver(
        &self,
        destination: &Destination,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), DeliveryError> {
        if *self.failing.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(DeliveryError {
                destination: destination.to_string(),
                reason: "delivery channel unavailable".to_owned(),
            });
        }

        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Delivery {
                destination: destination.clone(),
                code: code.to_owned(),
                purpose,
            });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freshco_core::{CodePurpose, Email, Mobile};

    use super::{Destination, Notifier, RecordingNotifier};

    #[test]
    fn test_destination_display() {
        let email = Destination::from(Email::parse("jane@x.com").unwrap());
        let sms = Destination::from(Mobile::parse("9876543210").unwrap());
        assert_eq!(email.to_string(), "jane@x.com");
        assert_eq!(sms.to_string(), "+919876543210");
        assert_eq!(sms.channel(), "sms");
    }

    #[tokio::test]
    async fn test_recording_notifier_keeps_latest_code() {
        let notifier = RecordingNotifier::new();
        let jane = Destination::from(Email::parse("jane@x.com").unwrap());

        notifier
            .deliver(&jane, "111111", CodePurpose::RegistrationVerification)
            .await
            .unwrap();
        notifier
            .deliver(&jane, "222222", CodePurpose::RegistrationVerification)
            .await
            .unwrap();

        assert_eq!(notifier.deliveries().len(), 2);
        assert_eq!(notifier.last_code_for(jane).as_deref(), Some("222222"));
    }

    #[tokio::test]
    async fn test_recording_notifier_separates_channels() {
        let notifier = RecordingNotifier::new();
        let email = Email::parse("jane@x.com").unwrap();
        let mobile = Mobile::parse("9876543210").unwrap();

        notifier
            .deliver(&Destination::from(&email), "111111", CodePurpose::PasswordReset)
            .await
            .unwrap();
        notifier
            .deliver(&Destination::from(&mobile), "222222", CodePurpose::PasswordReset)
            .await
            .unwrap();

        assert_eq!(notifier.last_code_for(&email).as_deref(), Some("111111"));
        assert_eq!(notifier.last_code_for(&mobile).as_deref(), Some("222222"));
    }

    #[tokio::test]
    async fn test_recording_notifier_failing_mode() {
        let notifier = RecordingNotifier::new();
        let jane = Destination::from(Email::parse("jane@x.com").unwrap());

        notifier.set_failing(true);
        let err = notifier
            .deliver(&jane, "111111", CodePurpose::PasswordReset)
            .await
            .unwrap_err();
        assert_eq!(err.destination, "jane@x.com");
        assert!(notifier.deliveries().is_empty());

        notifier.set_failing(false);
        notifier
            .deliver(&jane, "111111", CodePurpose::PasswordReset)
            .await
            .unwrap();
        assert_eq!(notifier.deliveries().len(), 1);
    }
}
