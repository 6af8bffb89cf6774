//! Client-side form validation
//!
//! Each form payload is checked synchronously before it is handed to the
//! audit service. Any entry in the resulting [`FieldErrors`] blocks the
//! submission.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{EngagementInput, FindingInput, ReconciliationInput, WorkpaperInput};

/// Field name (wire casing) to message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First message per field wins.
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn require(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        }
    }

    fn require_some<T>(&mut self, field: &str, value: &Option<T>, label: &str) {
        if value.is_none() {
            self.add(field, format!("{label} is required"));
        }
    }

    fn positive_if_present(&mut self, field: &str, value: Option<Decimal>, label: &str) {
        if let Some(v) = value {
            if v <= Decimal::ZERO {
                self.add(field, format!("{label} must be greater than 0"));
            }
        }
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// A form payload that can be checked before submission
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

impl Validate for EngagementInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("name", &self.name, "Engagement name");
        errors.require("clientName", &self.client_name, "Client name");
        errors.require_some("engagementType", &self.engagement_type, "Engagement type");
        errors.require_some("periodStart", &self.period_start, "Period start");
        errors.require_some("periodEnd", &self.period_end, "Period end");

        if let (Some(start), Some(end)) = (self.period_start, self.period_end) {
            if end <= start {
                errors.add("periodEnd", "Period end must be after period start");
            }
        }

        errors.positive_if_present(
            "materialityThreshold",
            self.materiality_threshold,
            "Materiality threshold",
        );
        errors.positive_if_present(
            "tolerableMisstatement",
            self.tolerable_misstatement,
            "Tolerable misstatement",
        );

        if self.progress > 100 {
            errors.add("progress", "Progress must be between 0 and 100");
        }

        errors.into_result()
    }
}

impl Validate for WorkpaperInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("title", &self.title, "Title");
        errors.require("workpaperNumber", &self.workpaper_number, "Workpaper number");
        errors.require("accountCode", &self.account_code, "Account code");
        errors.positive_if_present("materiality", self.materiality, "Materiality");

        if let Some(size) = self.sample_size {
            if size <= 0 {
                errors.add("sampleSize", "Sample size must be greater than 0");
            }
        }

        errors.into_result()
    }
}

impl Validate for FindingInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("title", &self.title, "Title");
        errors.require_some("severity", &self.severity, "Severity");
        errors.require("description", &self.description, "Description");

        errors.into_result()
    }
}

impl Validate for ReconciliationInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("supplierName", &self.supplier_name, "Supplier name");
        errors.require("supplierCode", &self.supplier_code, "Supplier code");
        errors.require("period", &self.period, "Period");

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EngagementType, Severity};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_engagement() -> EngagementInput {
        EngagementInput {
            name: "FY2024 Statutory Audit".into(),
            client_name: "Northwind Traders".into(),
            engagement_type: Some(EngagementType::FinancialAudit),
            period_start: Some(date(2024, 1, 1)),
            period_end: Some(date(2024, 12, 31)),
            materiality_threshold: Some(dec!(250000)),
            tolerable_misstatement: Some(dec!(187500)),
            partner_name: Some("R. Osei".into()),
            progress: 40,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_fully_populated_engagement() {
        assert_eq!(valid_engagement().validate(), Ok(()));
    }

    #[test]
    fn rejects_period_end_equal_to_start() {
        let mut form = valid_engagement();
        form.period_end = form.period_start;
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("periodEnd"),
            Some("Period end must be after period start")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn rejects_period_end_before_start() {
        let mut form = valid_engagement();
        form.period_end = Some(date(2023, 12, 31));
        assert!(form.validate().unwrap_err().contains("periodEnd"));
    }

    #[test]
    fn rejects_non_positive_thresholds() {
        let mut form = valid_engagement();
        form.materiality_threshold = Some(dec!(0));
        form.tolerable_misstatement = Some(dec!(-10));
        let errors = form.validate().unwrap_err();
        assert!(errors.contains("materialityThreshold"));
        assert!(errors.contains("tolerableMisstatement"));
    }

    #[test]
    fn missing_thresholds_are_allowed() {
        let mut form = valid_engagement();
        form.materiality_threshold = None;
        form.tolerable_misstatement = None;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let errors = EngagementInput::default().validate().unwrap_err();
        for field in ["name", "clientName", "engagementType", "periodStart", "periodEnd"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn whitespace_only_name_is_blank() {
        let mut form = valid_engagement();
        form.name = "   ".into();
        assert!(form.validate().unwrap_err().contains("name"));
    }

    #[test]
    fn workpaper_sample_size_must_be_positive() {
        let form = WorkpaperInput {
            title: "Cash confirmation".into(),
            workpaper_number: "A-100".into(),
            account_code: "1010".into(),
            sample_size: Some(0),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("sampleSize"));
    }

    #[test]
    fn finding_requires_severity() {
        let mut form = FindingInput {
            title: "Unrecorded liabilities".into(),
            description: "Invoices received after year end".into(),
            ..Default::default()
        };
        assert!(form.validate().unwrap_err().contains("severity"));
        form.severity = Some(Severity::High);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn reconciliation_requires_supplier_and_period() {
        let errors = ReconciliationInput::default().validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn field_errors_serialize_as_flat_map() {
        let mut errors = FieldErrors::new();
        errors.add("name", "Engagement name is required");
        errors.add("name", "ignored");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Engagement name is required"}));
    }
}
