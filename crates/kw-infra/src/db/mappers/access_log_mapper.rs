use anyhow::Result;

use kw_core::access::{AccessLogEntry, AccessMethod};
use kw_core::{AccessCodeId, PropertyId, RequestId};

use crate::db::models::{AccessLogRow, NewAccessLogRow};
use crate::db::ports::{InsertMapper, RowMapper};

use super::{from_millis, to_millis};

pub struct AccessLogRowMapper;

impl InsertMapper<AccessLogEntry, NewAccessLogRow> for AccessLogRowMapper {
    fn to_row(&self, domain: &AccessLogEntry) -> Result<NewAccessLogRow> {
        let location_data = domain
            .location_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let additional_data = domain
            .additional_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        Ok(NewAccessLogRow {
            id: uuid::Uuid::new_v4().to_string(),
            access_code_id: domain.access_code_id.as_ref().map(|c| c.to_string()),
            property_id: domain.property_id.to_string(),
            used_by_name: domain.used_by_name.clone(),
            used_by_contact: domain.used_by_contact.clone(),
            access_method: domain.access_method.as_str().to_string(),
            location_data,
            request_id: domain.request_id.as_ref().map(|r| r.to_string()),
            additional_data,
            used_at: to_millis(domain.used_at),
        })
    }
}

impl RowMapper<AccessLogRow, AccessLogEntry> for AccessLogRowMapper {
    fn to_domain(&self, row: &AccessLogRow) -> Result<AccessLogEntry> {
        let access_method = AccessMethod::parse(&row.access_method)
            .ok_or_else(|| anyhow::anyhow!("unknown access method: {}", row.access_method))?;
        let location_data = row
            .location_data
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let additional_data = row
            .additional_data
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(AccessLogEntry {
            access_code_id: row.access_code_id.clone().map(AccessCodeId::from),
            property_id: PropertyId::from(row.property_id.clone()),
            used_by_name: row.used_by_name.clone(),
            used_by_contact: row.used_by_contact.clone(),
            access_method,
            location_data,
            request_id: row.request_id.clone().map(RequestId::from),
            additional_data,
            used_at: from_millis(row.used_at)?,
        })
    }
}
