//! Best-effort audit logging.
//!
//! Every notable engine event lands in the append-only log; a failed append
//! is logged locally and swallowed, because the audit trail must never undo
//! an already-persisted decision.

use std::sync::Arc;

use tracing::warn;

use kw_core::access::{AccessLogEntry, AccessMethod};
use kw_core::ids::{AccessCodeId, PropertyId};
use kw_core::ports::{AccessLogPort, ClockPort};
use kw_core::AccessRequest;

#[derive(Clone)]
pub struct AccessLogger {
    log: Arc<dyn AccessLogPort>,
    clock: Arc<dyn ClockPort>,
}

impl AccessLogger {
    pub fn new(log: Arc<dyn AccessLogPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { log, clock }
    }

    async fn append(&self, entry: AccessLogEntry) {
        if let Err(e) = self.log.append(&entry).await {
            warn!(
                method = entry.access_method.as_str(),
                property_id = %entry.property_id,
                "failed to append access log entry: {e}"
            );
        }
    }

    fn entry_for_request(&self, request: &AccessRequest, method: AccessMethod) -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(request.property_id.clone(), method, self.clock.now());
        entry.used_by_name = request.requester_name.clone();
        entry.used_by_contact = request.requester_contact().map(str::to_string);
        entry.request_id = Some(request.id.clone());
        entry
    }

    pub async fn request_created(&self, request: &AccessRequest, domain_allowed: Option<bool>) {
        let mut entry = self.entry_for_request(request, AccessMethod::RequestCreated);
        if let Some(allowed) = domain_allowed {
            entry.additional_data = Some(serde_json::json!({ "domain_allowed": allowed }));
        }
        self.append(entry).await;
    }

    pub async fn request_verified(&self, request: &AccessRequest) {
        self.append(self.entry_for_request(request, AccessMethod::RequestVerified))
            .await;
    }

    /// The decision itself, approved or denied, regardless of disclosure.
    pub async fn request_decided(
        &self,
        request: &AccessRequest,
        approved: bool,
        decided_by: Option<&str>,
    ) {
        let method = if approved {
            AccessMethod::RequestApproved
        } else {
            AccessMethod::RequestDenied
        };
        let mut entry = self.entry_for_request(request, method);
        entry.additional_data = decided_by.map(|by| serde_json::json!({ "decided_by": by }));
        self.append(entry).await;
    }

    /// Disclosure marker: the access code was released to the requester.
    pub async fn code_disclosed(&self, request: &AccessRequest, code_id: &AccessCodeId) {
        let mut entry = self.entry_for_request(request, AccessMethod::QrScanVerified);
        entry.access_code_id = Some(code_id.clone());
        entry.location_data = request
            .location_data
            .as_ref()
            .and_then(|l| serde_json::to_value(l).ok());
        self.append(entry).await;
    }

    /// A standalone code validation outside the request flow.
    pub async fn code_validated(
        &self,
        property_id: &PropertyId,
        code_id: &AccessCodeId,
        method: AccessMethod,
        used_by_name: Option<String>,
        used_by_contact: Option<String>,
        location_data: Option<serde_json::Value>,
    ) {
        let mut entry = AccessLogEntry::new(property_id.clone(), method, self.clock.now());
        entry.access_code_id = Some(code_id.clone());
        entry.used_by_name = used_by_name;
        entry.used_by_contact = used_by_contact;
        entry.location_data = location_data;
        self.append(entry).await;
    }

    pub async fn verification_denied(&self, request: &AccessRequest) {
        let mut entry = self.entry_for_request(request, AccessMethod::RequestDenied);
        entry.additional_data =
            Some(serde_json::json!({ "reason": "verification_attempts_exhausted" }));
        self.append(entry).await;
    }
}
