//! Audit service client
//!
//! One method per back-office operation. Unlike the fetch facade, this
//! layer propagates every failure: a non-2xx status becomes
//! [`ServiceError::Status`] and the caller decides what the user sees.
//!
//! Resource families:
//! - engagements, workpapers, findings
//! - risk assessments, schedules, confirmations, sampling
//! - time entries, independence records, documents
//! - supplier reconciliations
//! - the audit dashboard summary

use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::instrument;

use super::transport::{query_pairs, CallContext, Transport, UpstreamRequest};
use crate::domain::{
    AuditDashboardSummary, AuditDocument, AuditSchedule, Confirmation, Engagement,
    EngagementInput, Finding, FindingInput, IndependenceRecord, MatchStatus, Reconciliation,
    ReconciliationInput, RecordId, RiskAssessment, SamplingPlan, TimeEntry, Workpaper,
    WorkpaperInput,
};
use crate::error::ServiceError;

const AUDIT_BASE: &str = "/api/audit";
const RECONCILIATIONS_BASE: &str = "/api/supplier-reconciliations";

/// `id` as one path segment; ids that could escape it are refused.
fn path_segment(id: &RecordId) -> Result<&str, ServiceError> {
    if id.is_path_safe() {
        Ok(id.as_str())
    } else {
        Err(ServiceError::InvalidId(id.to_string()))
    }
}

/// Lists come back either bare or wrapped in `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListPayload<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

/// Client for the audit and reconciliation endpoints of the back office.
#[derive(Clone)]
pub struct AuditService {
    transport: Arc<dyn Transport>,
    context: CallContext,
}

impl AuditService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            context: CallContext::default(),
        }
    }

    /// Same client, carrying the caller's cookie and request id.
    pub fn scoped(&self, context: CallContext) -> Self {
        Self {
            transport: self.transport.clone(),
            context,
        }
    }

    async fn call<R: DeserializeOwned>(&self, request: UpstreamRequest) -> Result<R, ServiceError> {
        self.transport
            .send(request.with_context(&self.context))
            .await?
            .error_for_status()?
            .json()
    }

    async fn call_unit(&self, request: UpstreamRequest) -> Result<(), ServiceError> {
        self.transport
            .send(request.with_context(&self.context))
            .await?
            .error_for_status()?;
        Ok(())
    }

    // =========================================================================
    // Resource collections
    // =========================================================================

    pub fn engagements(&self) -> Collection<'_, Engagement, EngagementInput> {
        Collection::new(self, format!("{AUDIT_BASE}/engagements"))
    }

    pub fn workpapers(&self) -> Collection<'_, Workpaper, WorkpaperInput> {
        Collection::new(self, format!("{AUDIT_BASE}/workpapers"))
    }

    pub fn findings(&self) -> Collection<'_, Finding, FindingInput> {
        Collection::new(self, format!("{AUDIT_BASE}/findings"))
    }

    pub fn risk_assessments(&self) -> Collection<'_, RiskAssessment> {
        Collection::new(self, format!("{AUDIT_BASE}/risk-assessments"))
    }

    pub fn schedules(&self) -> Collection<'_, AuditSchedule> {
        Collection::new(self, format!("{AUDIT_BASE}/schedules"))
    }

    pub fn confirmations(&self) -> Collection<'_, Confirmation> {
        Collection::new(self, format!("{AUDIT_BASE}/confirmations"))
    }

    pub fn sampling(&self) -> Collection<'_, SamplingPlan> {
        Collection::new(self, format!("{AUDIT_BASE}/sampling"))
    }

    pub fn time_entries(&self) -> Collection<'_, TimeEntry> {
        Collection::new(self, format!("{AUDIT_BASE}/time-entries"))
    }

    pub fn independence(&self) -> Collection<'_, IndependenceRecord> {
        Collection::new(self, format!("{AUDIT_BASE}/independence"))
    }

    pub fn documents(&self) -> Collection<'_, AuditDocument> {
        Collection::new(self, format!("{AUDIT_BASE}/documents"))
    }

    pub fn reconciliations(&self) -> Collection<'_, Reconciliation, ReconciliationInput> {
        Collection::new(self, RECONCILIATIONS_BASE.to_string())
    }

    // =========================================================================
    // Single endpoints
    // =========================================================================

    /// Headline numbers for the audit dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self) -> Result<AuditDashboardSummary, ServiceError> {
        self.call(UpstreamRequest::get(format!("{AUDIT_BASE}/dashboard")))
            .await
    }

    /// Persist the match state of one reconciliation line.
    #[instrument(skip(self))]
    pub async fn update_reconciliation_item(
        &self,
        reconciliation_id: &RecordId,
        item_id: &RecordId,
        status: MatchStatus,
        matched_with: Option<&RecordId>,
    ) -> Result<(), ServiceError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Request<'a> {
            status: MatchStatus,
            matched_with: Option<&'a RecordId>,
        }

        let request = UpstreamRequest::new(
            Method::PATCH,
            format!(
                "{RECONCILIATIONS_BASE}/{}/items/{}",
                path_segment(reconciliation_id)?,
                path_segment(item_id)?
            ),
        )
        .with_body(&Request {
            status,
            matched_with,
        })?;

        self.call_unit(request).await
    }
}

/// CRUD endpoints of one resource family.
///
/// `T` is the record the back office returns, `I` the payload it accepts.
pub struct Collection<'a, T, I = T> {
    service: &'a AuditService,
    path: String,
    _types: PhantomData<fn() -> (T, I)>,
}

impl<'a, T, I> Collection<'a, T, I>
where
    T: DeserializeOwned,
    I: Serialize,
{
    fn new(service: &'a AuditService, path: String) -> Self {
        Self {
            service,
            path,
            _types: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn item_path(&self, id: &RecordId) -> Result<String, ServiceError> {
        Ok(format!("{}/{}", self.path, path_segment(id)?))
    }

    /// GET the collection, with `filter` serialized to the query string.
    pub async fn list<F: Serialize>(&self, filter: &F) -> Result<Vec<T>, ServiceError> {
        let request = UpstreamRequest::get(self.path.clone()).with_query(query_pairs(filter)?);
        let payload: ListPayload<T> = self.service.call(request).await?;
        Ok(payload.into_vec())
    }

    pub async fn get(&self, id: &RecordId) -> Result<T, ServiceError> {
        self.service
            .call(UpstreamRequest::get(self.item_path(id)?))
            .await
    }

    pub async fn create(&self, input: &I) -> Result<T, ServiceError> {
        let request = UpstreamRequest::new(Method::POST, self.path.clone()).with_body(input)?;
        self.service.call(request).await
    }

    pub async fn update(&self, id: &RecordId, input: &I) -> Result<T, ServiceError> {
        let request = UpstreamRequest::new(Method::PUT, self.item_path(id)?).with_body(input)?;
        self.service.call(request).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
        self.service
            .call_unit(UpstreamRequest::new(Method::DELETE, self.item_path(id)?))
            .await
    }
}
