//! Entry point of the lifecycle: turn an anonymous inbound request into a
//! pending access request with a verification code in flight.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use kw_core::access::verification::{MAX_VERIFICATION_ATTEMPTS, VERIFICATION_CODE_TTL_MINUTES};
use kw_core::access::{AccessRequest, Channel, RequestMeta, RequestStatus, VerificationCode};
use kw_core::geo::{self, DEFAULT_PROXIMITY_RADIUS_M};
use kw_core::ids::{PropertyId, RequestId, VerificationCodeId};
use kw_core::ports::{
    AccessRequestRepositoryPort, ClockPort, PropertyRepositoryPort,
    VerificationCodeRepositoryPort,
};
use kw_core::{token, LocationData, Property};

use crate::access_logger::AccessLogger;
use crate::error::AccessFlowError;
use crate::notify::NotificationDispatcher;

use super::check_domain::CheckDomain;
use super::ensure_active_code::EnsureActiveCode;

/// Requests expire fifteen minutes after creation.
pub const REQUEST_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone)]
pub struct CreateAccessRequestInput {
    pub property_id: PropertyId,
    pub requester_email: Option<String>,
    pub requester_phone: Option<String>,
    pub requester_name: Option<String>,
    pub location_data: Option<LocationData>,
    pub meta: RequestMeta,
}

#[derive(Debug, Clone)]
pub struct CreatedAccessRequest {
    pub request_id: RequestId,
    pub verification_token: String,
    pub expires_at: DateTime<Utc>,
    pub property_name: String,
    pub property_address: String,
}

pub struct CreateAccessRequest {
    properties: Arc<dyn PropertyRepositoryPort>,
    requests: Arc<dyn AccessRequestRepositoryPort>,
    verifications: Arc<dyn VerificationCodeRepositoryPort>,
    ensure_code: Arc<EnsureActiveCode>,
    check_domain: Arc<CheckDomain>,
    dispatcher: Arc<NotificationDispatcher>,
    logger: AccessLogger,
    clock: Arc<dyn ClockPort>,
}

impl CreateAccessRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        properties: Arc<dyn PropertyRepositoryPort>,
        requests: Arc<dyn AccessRequestRepositoryPort>,
        verifications: Arc<dyn VerificationCodeRepositoryPort>,
        ensure_code: Arc<EnsureActiveCode>,
        check_domain: Arc<CheckDomain>,
        dispatcher: Arc<NotificationDispatcher>,
        logger: AccessLogger,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            properties,
            requests,
            verifications,
            ensure_code,
            check_domain,
            dispatcher,
            logger,
            clock,
        }
    }

    pub async fn execute(
        &self,
        input: CreateAccessRequestInput,
    ) -> Result<CreatedAccessRequest, AccessFlowError> {
        let email = normalize(&input.requester_email);
        let phone = normalize(&input.requester_phone);
        if email.is_none() && phone.is_none() {
            return Err(AccessFlowError::Validation(
                "Missing required fields: property_id and requester contact info".to_string(),
            ));
        }

        let property = self
            .properties
            .get_by_id(&input.property_id)
            .await?
            .ok_or_else(|| AccessFlowError::NotFound("Property not found".to_string()))?;
        if !property.emergency_access_enabled {
            return Err(AccessFlowError::Forbidden(
                "Emergency access is not enabled for this property".to_string(),
            ));
        }

        let access_code = self.ensure_code.execute(&property.id).await?;

        // Advisory domain screening; recorded, not enforced.
        let domain_allowed = match &email {
            Some(email) => {
                let check = self.check_domain.execute(email).await;
                if !check.allowed {
                    info!(request_email = %email, "requester domain not allowed: {}", check.message);
                }
                Some(check.allowed)
            }
            None => None,
        };

        // Anti-spam pre-check; the unique pending index is the real guard.
        let duplicate = self
            .requests
            .has_pending_for_contact(&property.id, phone.as_deref(), email.as_deref())
            .await?;
        if duplicate {
            return Err(AccessFlowError::Conflict(
                "Access request already pending for this contact".to_string(),
            ));
        }

        let now = self.clock.now();
        let (location_verified, distance_m) = proximity(&property, input.location_data.as_ref());
        let request = AccessRequest {
            id: RequestId::generate(),
            property_id: property.id.clone(),
            requester_email: email.clone(),
            requester_phone: phone.clone(),
            requester_name: normalize(&input.requester_name),
            access_code_entered: access_code.code.clone(),
            verification_token: token::generate_verification_token(),
            status: RequestStatus::Pending,
            ip_address: input.meta.ip_address,
            user_agent: input.meta.user_agent,
            location_data: input.location_data,
            location_verified,
            distance_from_property_m: distance_m,
            created_at: now,
            expires_at: now + Duration::minutes(REQUEST_TTL_MINUTES),
            verified_at: None,
            approved_at: None,
        };
        self.requests.insert(&request).await?;

        self.logger.request_created(&request, domain_allowed).await;

        // Verification code issue and all notifications are best-effort:
        // the pending request is already the durable fact.
        let verification_code = self.issue_verification(&request, now).await;
        if let Some(code) = &verification_code {
            self.dispatcher
                .notify_requester_of_code(&request, &property, &code.code)
                .await;
        }
        self.notify_owner(&request, &property).await;

        info!(request_id = %request.id, property_id = %property.id, "access request created");
        Ok(CreatedAccessRequest {
            request_id: request.id,
            verification_token: request.verification_token,
            expires_at: request.expires_at,
            property_name: property.name,
            property_address: property.address,
        })
    }

    async fn issue_verification(
        &self,
        request: &AccessRequest,
        now: DateTime<Utc>,
    ) -> Option<VerificationCode> {
        let channel = if request.requester_phone.is_some() {
            Channel::Sms
        } else {
            Channel::Email
        };
        let code = VerificationCode {
            id: VerificationCodeId::generate(),
            request_id: request.id.clone(),
            code: token::generate_verification_code(),
            channel,
            phone_number: request.requester_phone.clone(),
            email_address: request.requester_email.clone(),
            expires_at: now + Duration::minutes(VERIFICATION_CODE_TTL_MINUTES),
            attempts: 0,
            max_attempts: MAX_VERIFICATION_ATTEMPTS,
            verified_at: None,
            created_at: now,
        };
        match self.verifications.insert(&code).await {
            Ok(()) => Some(code),
            Err(e) => {
                warn!(request_id = %request.id, "failed to store verification code: {e}");
                None
            }
        }
    }

    async fn notify_owner(&self, request: &AccessRequest, property: &Property) {
        let owner = match self.properties.owner_profile(&property.owner_user_id).await {
            Ok(owner) => owner,
            Err(e) => {
                warn!(owner = %property.owner_user_id, "owner profile lookup failed: {e}");
                None
            }
        };
        let contacts = match self
            .properties
            .primary_contacts(&property.owner_user_id)
            .await
        {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!(owner = %property.owner_user_id, "emergency contact lookup failed: {e}");
                Vec::new()
            }
        };
        self.dispatcher
            .notify_owner_of_request(request, property, owner.as_ref(), &contacts)
            .await;
    }
}

fn normalize(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn proximity(property: &Property, location: Option<&LocationData>) -> (bool, Option<f64>) {
    let (Some(location), Some(coords)) = (location, property.coordinates()) else {
        return (false, None);
    };
    let check = geo::check_proximity(
        (location.latitude, location.longitude),
        coords,
        DEFAULT_PROXIMITY_RADIUS_M,
    );
    (check.within_radius, Some(check.distance_m))
}
