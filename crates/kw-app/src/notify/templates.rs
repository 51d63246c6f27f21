//! Email and SMS bodies for the access-request flow.
//!
//! Plain string building; the dispatcher decides who receives what and the
//! senders decide how it leaves the process.

use kw_core::{AccessRequest, KeysafeInfo, Property};

pub struct EmailMessage {
    pub subject: String,
    pub html_body: String,
}

fn wrap(title_color: &str, title: &str, inner: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: {title_color};">{title}</h2>
  {inner}
  <div style="margin-top: 24px; padding-top: 16px; border-top: 1px solid #e5e7eb;">
    <p style="color: #6b7280; font-size: 14px;">This is an automated message from the Keyward access system.</p>
  </div>
</div>"#
    )
}

/// Owner/contact notification with one-click approve and deny links.
pub fn owner_request_notification(
    property: &Property,
    request: &AccessRequest,
    approve_link: &str,
    deny_link: &str,
) -> EmailMessage {
    let inner = format!(
        r#"<p><strong>Property:</strong> {property_name}</p>
  <p><strong>Address:</strong> {address}</p>
  <div style="background-color: #f3f4f6; padding: 16px; border-radius: 8px; margin: 16px 0;">
    <h3 style="margin-top: 0;">Requester Details:</h3>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Contact:</strong> {contact}</p>
    <p><strong>Request ID:</strong> {request_id}</p>
  </div>
  <p>Please review this request and take action:</p>
  <div style="margin: 24px 0;">
    <a href="{approve_link}" style="background-color: #047857; color: white; padding: 12px 24px; text-decoration: none; border-radius: 8px; font-weight: bold; display: inline-block; margin-right: 12px;">Approve</a>
    <a href="{deny_link}" style="background-color: #dc2626; color: white; padding: 12px 24px; text-decoration: none; border-radius: 8px; font-weight: bold; display: inline-block;">Deny</a>
  </div>"#,
        property_name = property.name,
        address = property.display_address(),
        name = request.requester_display_name(),
        contact = request.requester_contact().unwrap_or("Not provided"),
        request_id = request.id,
    );
    EmailMessage {
        subject: format!("Emergency Access Request - {}", property.name),
        html_body: wrap("#dc2626", "Emergency Access Request", &inner),
    }
}

/// Owner SMS with the same approve/deny links, clamped to a safe length.
pub fn owner_request_sms(
    property: &Property,
    request: &AccessRequest,
    approve_link: &str,
    deny_link: &str,
) -> String {
    let lines = [
        format!(
            "Keyward: emergency access requested for \"{}\".",
            property.name
        ),
        property.display_address(),
        format!("Requester: {}", request.requester_display_name()),
        format!(
            "Contact: {}",
            request.requester_contact().unwrap_or("Not provided")
        ),
        format!("Approve: {approve_link}"),
        format!("Deny: {deny_link}"),
    ];
    let body = lines.join("\n");
    body.chars().take(1000).collect()
}

/// The 6-digit verification code, emailed to the requester.
pub fn requester_verification_code(
    property: &Property,
    request: &AccessRequest,
    verification_code: &str,
) -> EmailMessage {
    let inner = format!(
        r#"<p>Hello {name},</p>
  <p>You have requested emergency access to:</p>
  <div style="background-color: #f0fdf4; padding: 16px; border-radius: 8px; margin: 16px 0;">
    <p><strong>Property:</strong> {property_name}</p>
    <p><strong>Address:</strong> {address}</p>
    <p><strong>Request ID:</strong> {request_id}</p>
  </div>
  <div style="background-color: #fef3c7; padding: 16px; border-radius: 8px; margin: 16px 0; text-align: center;">
    <h3 style="margin-top: 0; color: #92400e;">Your Verification Code</h3>
    <div style="font-size: 24px; font-weight: bold; color: #92400e; font-family: monospace; letter-spacing: 2px;">{verification_code}</div>
    <p style="margin-bottom: 0; color: #92400e; font-size: 14px;">Enter this code to complete your access request. It expires in 10 minutes.</p>
  </div>"#,
        name = request.requester_name.as_deref().unwrap_or("there"),
        property_name = property.name,
        address = property.display_address(),
        request_id = request.id,
    );
    EmailMessage {
        subject: format!("Verification Code for {}", property.name),
        html_body: wrap("#059669", "Verification Code", &inner),
    }
}

fn keysafe_section(keysafe: &KeysafeInfo) -> String {
    let mut rows = String::new();
    if let Some(location) = &keysafe.location {
        rows.push_str(&format!("<p><strong>Keysafe location:</strong> {location}</p>"));
    }
    if let Some(code) = &keysafe.code {
        rows.push_str(&format!(
            "<p><strong>Keysafe code:</strong> <span style=\"font-family: monospace;\">{code}</span></p>"
        ));
    }
    if let Some(what3words) = &keysafe.what3words {
        rows.push_str(&format!("<p><strong>what3words:</strong> {what3words}</p>"));
    }
    if let (Some(lat), Some(lon)) = (keysafe.latitude, keysafe.longitude) {
        rows.push_str(&format!("<p><strong>Coordinates:</strong> {lat}, {lon}</p>"));
    }
    if let Some(notes) = &keysafe.notes {
        rows.push_str(&format!("<p><strong>Notes:</strong> {notes}</p>"));
    }
    format!(
        r#"<div style="background-color: #fef3c7; padding: 16px; border-radius: 8px; margin: 16px 0;">
    <h3 style="margin-top: 0; color: #92400e;">Keysafe Details</h3>
    {rows}
  </div>"#
    )
}

/// Approval email. This is the disclosure moment: only rendered after the
/// approved transition is durable.
pub fn requester_approved(property: &Property, keysafe: Option<&KeysafeInfo>) -> EmailMessage {
    let keysafe_html = match keysafe {
        Some(info) if !info.is_empty() => keysafe_section(info),
        _ => "<p>The owner will share keysafe details with you directly.</p>".to_string(),
    };
    let inner = format!(
        r#"<p>Your emergency access request has been approved.</p>
  <div style="background-color: #f0fdf4; padding: 16px; border-radius: 8px; margin: 16px 0;">
    <p><strong>Property:</strong> {property_name}</p>
    <p><strong>Address:</strong> {address}</p>
  </div>
  {keysafe_html}"#,
        property_name = property.name,
        address = property.display_address(),
    );
    EmailMessage {
        subject: format!("Access Approved - {}", property.name),
        html_body: wrap("#047857", "Access Request Approved", &inner),
    }
}

pub fn requester_denied(property: &Property) -> EmailMessage {
    let inner = format!(
        r#"<p>Your emergency access request for <strong>{property_name}</strong> has been denied by the property owner.</p>
  <p>If you believe this is a mistake, please contact the owner directly.</p>"#,
        property_name = property.name,
    );
    EmailMessage {
        subject: format!("Access Request Update - {}", property.name),
        html_body: wrap("#dc2626", "Access Request Denied", &inner),
    }
}
