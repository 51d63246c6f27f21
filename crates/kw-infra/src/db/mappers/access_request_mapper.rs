use anyhow::Result;

use kw_core::access::RequestStatus;
use kw_core::{AccessRequest, LocationData, PropertyId, RequestId};

use crate::db::models::{AccessRequestRow, NewAccessRequestRow};
use crate::db::ports::{InsertMapper, RowMapper};

use super::{from_millis, opt_from_millis, to_millis};

pub struct AccessRequestRowMapper;

impl InsertMapper<AccessRequest, NewAccessRequestRow> for AccessRequestRowMapper {
    fn to_row(&self, domain: &AccessRequest) -> Result<NewAccessRequestRow> {
        let location_data = domain
            .location_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        Ok(NewAccessRequestRow {
            id: domain.id.to_string(),
            property_id: domain.property_id.to_string(),
            requester_email: domain.requester_email.clone(),
            requester_phone: domain.requester_phone.clone(),
            requester_name: domain.requester_name.clone(),
            access_code_entered: domain.access_code_entered.clone(),
            verification_token: domain.verification_token.clone(),
            status: domain.status.as_str().to_string(),
            ip_address: domain.ip_address.clone(),
            user_agent: domain.user_agent.clone(),
            location_data,
            location_verified: domain.location_verified,
            distance_from_property_m: domain.distance_from_property_m,
            created_at: to_millis(domain.created_at),
            expires_at: to_millis(domain.expires_at),
            verified_at: domain.verified_at.map(to_millis),
            approved_at: domain.approved_at.map(to_millis),
        })
    }
}

impl RowMapper<AccessRequestRow, AccessRequest> for AccessRequestRowMapper {
    fn to_domain(&self, row: &AccessRequestRow) -> Result<AccessRequest> {
        let status = RequestStatus::parse(&row.status)
            .ok_or_else(|| anyhow::anyhow!("unknown request status: {}", row.status))?;
        let location_data: Option<LocationData> = row
            .location_data
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(AccessRequest {
            id: RequestId::from(row.id.clone()),
            property_id: PropertyId::from(row.property_id.clone()),
            requester_email: row.requester_email.clone(),
            requester_phone: row.requester_phone.clone(),
            requester_name: row.requester_name.clone(),
            access_code_entered: row.access_code_entered.clone(),
            verification_token: row.verification_token.clone(),
            status,
            ip_address: row.ip_address.clone(),
            user_agent: row.user_agent.clone(),
            location_data,
            location_verified: row.location_verified,
            distance_from_property_m: row.distance_from_property_m,
            created_at: from_millis(row.created_at)?,
            expires_at: from_millis(row.expires_at)?,
            verified_at: opt_from_millis(row.verified_at)?,
            approved_at: opt_from_millis(row.approved_at)?,
        })
    }
}
