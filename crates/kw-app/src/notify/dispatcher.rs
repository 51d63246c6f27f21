//! Fan-out of lifecycle events to owner, emergency contacts and requester.
//!
//! The dispatcher is constructed once at startup with its senders injected;
//! there is no global transporter. Every send is best-effort and isolated:
//! one recipient failing never stops the others, and no failure here ever
//! rolls back a state transition.

use std::sync::Arc;

use tracing::{debug, warn};

use kw_core::ports::{EmailSenderPort, SendError, SmsSenderPort};
use kw_core::{AccessRequest, ContactPoint, KeysafeInfo, Property};

use super::templates::{self, EmailMessage};

#[derive(Clone)]
pub struct NotificationDispatcher {
    email: Arc<dyn EmailSenderPort>,
    sms: Arc<dyn SmsSenderPort>,
    /// Base URL the owner-action links are rooted at, without trailing slash.
    base_url: String,
}

impl NotificationDispatcher {
    pub fn new(
        email: Arc<dyn EmailSenderPort>,
        sms: Arc<dyn SmsSenderPort>,
        base_url: String,
    ) -> Self {
        Self {
            email,
            sms,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn owner_action_link(&self, request: &AccessRequest, action: &str) -> String {
        format!(
            "{}/api/access-requests/owner-action?request={}&token={}&action={}",
            self.base_url, request.id, request.verification_token, action
        )
    }

    async fn send_email(&self, to: &str, message: &EmailMessage) {
        match self.email.send(to, &message.subject, &message.html_body).await {
            Ok(()) => debug!(to, subject = %message.subject, "email sent"),
            Err(SendError::NotConfigured) => {
                warn!(to, "email sender not configured, dropping message")
            }
            Err(e) => warn!(to, "failed to send email: {e}"),
        }
    }

    /// Notify the owner and every primary emergency contact of a new
    /// request, each recipient independently. SMS to the owner is attempted
    /// when a phone number is on file; an unconfigured SMS sender degrades
    /// silently to email-only.
    pub async fn notify_owner_of_request(
        &self,
        request: &AccessRequest,
        property: &Property,
        owner: Option<&ContactPoint>,
        emergency_contacts: &[ContactPoint],
    ) {
        let approve_link = self.owner_action_link(request, "approve");
        let deny_link = self.owner_action_link(request, "deny");
        let message =
            templates::owner_request_notification(property, request, &approve_link, &deny_link);

        let mut recipients: Vec<&str> = Vec::new();
        if let Some(email) = owner.and_then(|o| o.email.as_deref()) {
            recipients.push(email);
        }
        for contact in emergency_contacts {
            if let Some(email) = contact.email.as_deref() {
                if !recipients.contains(&email) {
                    recipients.push(email);
                }
            }
        }
        if recipients.is_empty() {
            warn!(request_id = %request.id, "no notification recipients for owner of property");
        }
        for to in recipients {
            self.send_email(to, &message).await;
        }

        if let Some(phone) = owner.and_then(|o| o.phone.as_deref()) {
            let body = templates::owner_request_sms(property, request, &approve_link, &deny_link);
            match self.sms.send(phone, &body).await {
                Ok(()) => debug!(to = phone, "owner SMS sent"),
                Err(SendError::NotConfigured) => {
                    debug!("SMS sender not configured, skipping owner SMS")
                }
                Err(e) => warn!(to = phone, "failed to send owner SMS: {e}"),
            }
        }
    }

    /// Email the requester their 6-digit verification code. Email-only: the
    /// code is never pushed over SMS.
    pub async fn notify_requester_of_code(
        &self,
        request: &AccessRequest,
        property: &Property,
        verification_code: &str,
    ) {
        let Some(to) = request.requester_email.as_deref() else {
            debug!(request_id = %request.id, "requester has no email, skipping code delivery");
            return;
        };
        let message = templates::requester_verification_code(property, request, verification_code);
        self.send_email(to, &message).await;
    }

    /// Tell the requester the outcome. On approval this carries the keysafe
    /// disclosure, so it must only run after the transition is durable.
    pub async fn notify_requester_of_decision(
        &self,
        request: &AccessRequest,
        property: &Property,
        approved: bool,
        keysafe: Option<&KeysafeInfo>,
    ) {
        let Some(to) = request.requester_email.as_deref() else {
            debug!(request_id = %request.id, "requester has no email, skipping decision notice");
            return;
        };
        let message = if approved {
            templates::requester_approved(property, keysafe)
        } else {
            templates::requester_denied(property)
        };
        self.send_email(to, &message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use kw_core::{PropertyId, RequestId, RequestStatus, UserId};

    #[derive(Default)]
    struct RecordingEmailSender {
        sent: Mutex<Vec<(String, String)>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl EmailSenderPort for RecordingEmailSender {
        async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), SendError> {
            if self.fail_for.as_deref() == Some(to) {
                return Err(SendError::Delivery("boom".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    struct NoSms;

    #[async_trait]
    impl SmsSenderPort for NoSms {
        async fn send(&self, _to: &str, _body: &str) -> Result<(), SendError> {
            Err(SendError::NotConfigured)
        }
    }

    fn property() -> Property {
        Property {
            id: PropertyId::from("prop-1"),
            owner_user_id: UserId::from("user-1"),
            name: "Harbour Cottage".to_string(),
            address: "12 Quay Lane".to_string(),
            city: None,
            region: None,
            postal_code: None,
            latitude: None,
            longitude: None,
            emergency_access_enabled: true,
            keysafe: None,
        }
    }

    fn request() -> AccessRequest {
        AccessRequest {
            id: RequestId::from("req-1"),
            property_id: PropertyId::from("prop-1"),
            requester_email: Some("requester@example.com".to_string()),
            requester_phone: None,
            requester_name: None,
            access_code_entered: "A1B2C3D4".to_string(),
            verification_token: "f00d".to_string(),
            status: RequestStatus::Pending,
            ip_address: None,
            user_agent: None,
            location_data: None,
            location_verified: false,
            distance_from_property_m: None,
            created_at: chrono::Utc::now(),
            expires_at: chrono::Utc::now(),
            verified_at: None,
            approved_at: None,
        }
    }

    fn contact(email: &str) -> ContactPoint {
        ContactPoint {
            email: Some(email.to_string()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn one_failed_recipient_does_not_stop_the_rest() {
        let sender = Arc::new(RecordingEmailSender {
            sent: Mutex::new(Vec::new()),
            fail_for: Some("owner@example.com".to_string()),
        });
        let dispatcher = NotificationDispatcher::new(
            sender.clone(),
            Arc::new(NoSms),
            "https://keyward.test".to_string(),
        );

        dispatcher
            .notify_owner_of_request(
                &request(),
                &property(),
                Some(&contact("owner@example.com")),
                &[contact("contact-a@example.com"), contact("contact-b@example.com")],
            )
            .await;

        let sent = sender.sent.lock().unwrap();
        let recipients: Vec<&str> = sent.iter().map(|(to, _)| to.as_str()).collect();
        assert_eq!(recipients, vec!["contact-a@example.com", "contact-b@example.com"]);
    }

    #[tokio::test]
    async fn duplicate_recipients_are_sent_once() {
        let sender = Arc::new(RecordingEmailSender::default());
        let dispatcher = NotificationDispatcher::new(
            sender.clone(),
            Arc::new(NoSms),
            "https://keyward.test/".to_string(),
        );

        dispatcher
            .notify_owner_of_request(
                &request(),
                &property(),
                Some(&contact("owner@example.com")),
                &[contact("owner@example.com")],
            )
            .await;

        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn action_links_embed_id_token_action() {
        let dispatcher = NotificationDispatcher::new(
            Arc::new(RecordingEmailSender::default()),
            Arc::new(NoSms),
            "https://keyward.test".to_string(),
        );
        let link = dispatcher.owner_action_link(&request(), "approve");
        assert_eq!(
            link,
            "https://keyward.test/api/access-requests/owner-action?request=req-1&token=f00d&action=approve"
        );
    }
}
