//! Sample records substituted when the back office cannot be reached
//!
//! Every page takes its fallback from here so the placeholder data is
//! defined once.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single()
}

pub fn pipelines() -> Vec<EtlPipeline> {
    vec![
        EtlPipeline {
            id: RecordId::new("etl-1"),
            name: "General ledger import".into(),
            source: "SAP S/4HANA".into(),
            target: "Audit warehouse".into(),
            status: PipelineStatus::Completed,
            last_run: at(2024, 3, 14, 2, 0),
            records_processed: 184_220,
            records_failed: 12,
            duration_seconds: Some(642),
            schedule: Some("0 2 * * *".into()),
        },
        EtlPipeline {
            id: RecordId::new("etl-2"),
            name: "Accounts payable sync".into(),
            source: "Oracle AP".into(),
            target: "Reconciliation store".into(),
            status: PipelineStatus::Running,
            last_run: at(2024, 3, 14, 9, 30),
            records_processed: 23_410,
            records_failed: 0,
            duration_seconds: None,
            schedule: Some("*/30 * * * *".into()),
        },
        EtlPipeline {
            id: RecordId::new("etl-3"),
            name: "FX rates feed".into(),
            source: "ECB".into(),
            target: "Treasury".into(),
            status: PipelineStatus::Failed,
            last_run: at(2024, 3, 14, 6, 0),
            records_processed: 0,
            records_failed: 31,
            duration_seconds: Some(4),
            schedule: Some("0 6 * * *".into()),
        },
    ]
}

pub fn engagements() -> Vec<Engagement> {
    vec![
        Engagement {
            id: RecordId::new("1"),
            name: "FY2023 Statutory Audit".into(),
            client_name: "Northwind Traders Ltd".into(),
            engagement_type: EngagementType::FinancialAudit,
            period_start: day(2023, 1, 1),
            period_end: day(2023, 12, 31),
            risk_level: RiskLevel::Medium,
            materiality_threshold: Some(dec!(250000)),
            tolerable_misstatement: Some(dec!(187500)),
            partner_name: Some("Amara Osei".into()),
            manager_name: Some("Jonas Lind".into()),
            planning_date: Some(day(2023, 11, 1)),
            fieldwork_date: Some(day(2024, 1, 15)),
            review_date: Some(day(2024, 3, 1)),
            completion_date: None,
            status: EngagementStatus::Fieldwork,
            progress: 65,
        },
        Engagement {
            id: RecordId::new("2"),
            name: "Half-year Review".into(),
            client_name: "Contoso Manufacturing".into(),
            engagement_type: EngagementType::Review,
            period_start: day(2024, 1, 1),
            period_end: day(2024, 6, 30),
            risk_level: RiskLevel::High,
            materiality_threshold: Some(dec!(120000)),
            tolerable_misstatement: None,
            partner_name: Some("Amara Osei".into()),
            manager_name: Some("Priya Nair".into()),
            planning_date: Some(day(2024, 6, 1)),
            fieldwork_date: None,
            review_date: None,
            completion_date: None,
            status: EngagementStatus::Planning,
            progress: 10,
        },
    ]
}

pub fn workpapers() -> Vec<Workpaper> {
    vec![
        Workpaper {
            id: RecordId::new("wp-1"),
            engagement_id: RecordId::new("1"),
            title: "Bank confirmations".into(),
            workpaper_number: "C-100".into(),
            account_code: "1010".into(),
            account_name: Some("Cash at bank".into()),
            assertion: Assertion::Existence,
            risk_level: RiskLevel::Low,
            materiality: Some(dec!(50000)),
            sample_size: None,
            work_performed: Some("Confirmations sent to all six banks".into()),
            findings: None,
            conclusions: None,
            recommendations: None,
            status: WorkpaperStatus::InProgress,
            priority: Priority::High,
            assigned_to: Some("Lena Park".into()),
            reviewer: Some("Jonas Lind".into()),
            start_date: Some(day(2024, 1, 15)),
            due_date: Some(day(2024, 2, 9)),
            completed_date: None,
            reviewed_date: None,
        },
        Workpaper {
            id: RecordId::new("wp-2"),
            engagement_id: RecordId::new("1"),
            title: "Revenue cut-off testing".into(),
            workpaper_number: "R-210".into(),
            account_code: "4000".into(),
            account_name: Some("Revenue".into()),
            assertion: Assertion::Cutoff,
            risk_level: RiskLevel::High,
            materiality: Some(dec!(125000)),
            sample_size: Some(40),
            work_performed: None,
            findings: None,
            conclusions: None,
            recommendations: None,
            status: WorkpaperStatus::NotStarted,
            priority: Priority::Critical,
            assigned_to: Some("Marco Rossi".into()),
            reviewer: None,
            start_date: None,
            due_date: Some(day(2024, 2, 23)),
            completed_date: None,
            reviewed_date: None,
        },
    ]
}

pub fn findings() -> Vec<Finding> {
    vec![Finding {
        id: RecordId::new("f-1"),
        engagement_id: Some(RecordId::new("1")),
        title: "Unrecorded liabilities".into(),
        severity: Severity::High,
        category: Some("Accounts payable".into()),
        description: "Invoices dated December were posted in February.".into(),
        impact: Some("Liabilities understated by approximately $84,000".into()),
        recommendation: Some("Strengthen month-end accrual review".into()),
        status: FindingStatus::Open,
        assigned_to: Some("Jonas Lind".into()),
        due_date: Some(day(2024, 3, 15)),
    }]
}

pub fn dashboard_summary() -> AuditDashboardSummary {
    AuditDashboardSummary {
        total_engagements: 12,
        active_engagements: 7,
        completed_engagements: 5,
        open_findings: 9,
        high_risk_engagements: 2,
        workpapers_pending_review: 14,
        hours_this_month: dec!(436.5),
    }
}

pub fn reconciliations() -> Vec<Reconciliation> {
    vec![
        Reconciliation {
            id: RecordId::new("rec-1"),
            supplier_name: "Acme Components".into(),
            supplier_code: "SUP-001".into(),
            period: "2024-02".into(),
            status: ReconciliationStatus::InProgress,
            supplier_balance: dec!(48250.00),
            internal_balance: dec!(45750.00),
            difference: dec!(2500.00),
            items: vec![
                ReconciliationItem {
                    id: RecordId::new("item-1"),
                    item_type: ItemType::Invoice,
                    reference: "INV-2024-118".into(),
                    date: Some(day(2024, 2, 3)),
                    amount: dec!(12500.00),
                    description: Some("Circuit boards".into()),
                    status: MatchStatus::Matched,
                    matched_with: Some(RecordId::new("item-2")),
                },
                ReconciliationItem {
                    id: RecordId::new("item-2"),
                    item_type: ItemType::Payment,
                    reference: "PAY-7781".into(),
                    date: Some(day(2024, 2, 20)),
                    amount: dec!(-12500.00),
                    description: None,
                    status: MatchStatus::Matched,
                    matched_with: Some(RecordId::new("item-1")),
                },
                ReconciliationItem {
                    id: RecordId::new("item-3"),
                    item_type: ItemType::Invoice,
                    reference: "INV-2024-131".into(),
                    date: Some(day(2024, 2, 27)),
                    amount: dec!(2500.00),
                    description: Some("Expedited freight".into()),
                    status: MatchStatus::Unmatched,
                    matched_with: None,
                },
            ],
            attachments: vec![Attachment {
                filename: "acme-statement-feb.pdf".into(),
                size: 184_320,
                content_type: "application/pdf".into(),
            }],
        },
        Reconciliation {
            id: RecordId::new("rec-2"),
            supplier_name: "Globex Logistics".into(),
            supplier_code: "SUP-014".into(),
            period: "2024-02".into(),
            status: ReconciliationStatus::Disputed,
            supplier_balance: dec!(9800.00),
            internal_balance: dec!(10400.00),
            difference: dec!(-600.00),
            items: vec![ReconciliationItem {
                id: RecordId::new("item-1"),
                item_type: ItemType::CreditNote,
                reference: "CN-552".into(),
                date: Some(day(2024, 2, 12)),
                amount: dec!(-600.00),
                description: Some("Damaged pallet credit".into()),
                status: MatchStatus::Disputed,
                matched_with: None,
            }],
            attachments: Vec::new(),
        },
    ]
}

pub fn forex_rates() -> Vec<ForexRate> {
    vec![
        ForexRate {
            pair: "EUR/USD".into(),
            rate: dec!(1.0852),
            previous_rate: dec!(1.0831),
            change: dec!(0.0021),
            change_percent: dec!(0.19),
            updated_at: at(2024, 3, 14, 16, 0),
        },
        ForexRate {
            pair: "GBP/USD".into(),
            rate: dec!(1.2718),
            previous_rate: dec!(1.2745),
            change: dec!(-0.0027),
            change_percent: dec!(-0.21),
            updated_at: at(2024, 3, 14, 16, 0),
        },
        ForexRate {
            pair: "USD/JPY".into(),
            rate: dec!(148.12),
            previous_rate: dec!(147.86),
            change: dec!(0.26),
            change_percent: dec!(0.18),
            updated_at: at(2024, 3, 14, 16, 0),
        },
    ]
}

pub fn integrations() -> Vec<Integration> {
    vec![
        Integration {
            id: RecordId::new("int-1"),
            name: "QuickBooks Online".into(),
            provider: "Intuit".into(),
            category: Some("Accounting".into()),
            status: IntegrationStatus::Connected,
            last_sync: at(2024, 3, 14, 8, 45),
            records_synced: 12_884,
        },
        Integration {
            id: RecordId::new("int-2"),
            name: "Plaid bank feeds".into(),
            provider: "Plaid".into(),
            category: Some("Banking".into()),
            status: IntegrationStatus::Error,
            last_sync: at(2024, 3, 13, 23, 10),
            records_synced: 3_201,
        },
        Integration {
            id: RecordId::new("int-3"),
            name: "DocuSign".into(),
            provider: "DocuSign".into(),
            category: Some("Documents".into()),
            status: IntegrationStatus::Disconnected,
            last_sync: None,
            records_synced: 0,
        },
    ]
}

pub fn entities() -> Vec<SystemEntity> {
    vec![
        SystemEntity {
            id: RecordId::new("ent-1"),
            name: "Northwind Holdings Inc".into(),
            code: "NWH".into(),
            currency: Some("USD".into()),
            country: Some("US".into()),
            is_active: true,
        },
        SystemEntity {
            id: RecordId::new("ent-2"),
            name: "Northwind Europe GmbH".into(),
            code: "NWE".into(),
            currency: Some("EUR".into()),
            country: Some("DE".into()),
            is_active: true,
        },
    ]
}

pub fn service_statuses() -> Vec<ServiceStatus> {
    ["api", "etl-scheduler", "document-store"]
        .into_iter()
        .map(|name| ServiceStatus {
            name: name.to_string(),
            status: "unknown".to_string(),
            latency_ms: None,
        })
        .collect()
}

pub fn financial_figures() -> FinancialFigures {
    FinancialFigures {
        entity_name: "Northwind Holdings Inc".into(),
        period_end: Some(day(2023, 12, 31)),
        cash: dec!(1250000),
        current_assets: dec!(4800000),
        inventory: dec!(1600000),
        total_assets: dec!(12400000),
        current_liabilities: dec!(2400000),
        total_liabilities: dec!(6200000),
        total_equity: dec!(6200000),
        revenue: dec!(18500000),
        cost_of_sales: dec!(11100000),
        net_income: dec!(1480000),
    }
}

pub fn materiality_benchmarks() -> Vec<MaterialityBenchmark> {
    vec![
        MaterialityBenchmark {
            basis: MaterialityBasis::Revenue,
            amount: dec!(18500000),
            percentage: dec!(1),
        },
        MaterialityBenchmark {
            basis: MaterialityBasis::TotalAssets,
            amount: dec!(12400000),
            percentage: dec!(2),
        },
        MaterialityBenchmark {
            basis: MaterialityBasis::PreTaxIncome,
            amount: dec!(1970000),
            percentage: dec!(5),
        },
    ]
}

pub fn quantum_portfolio() -> QuantumPortfolio {
    let allocation = |symbol: &str, weight: Decimal, ret: Decimal, risk: Decimal| QuantumAllocation {
        symbol: symbol.to_string(),
        weight,
        expected_return: ret,
        risk,
    };

    QuantumPortfolio {
        allocations: vec![
            allocation("AAPL", dec!(0.30), dec!(0.12), dec!(0.22)),
            allocation("MSFT", dec!(0.25), dec!(0.11), dec!(0.20)),
            allocation("TLT", dec!(0.25), dec!(0.04), dec!(0.09)),
            allocation("GLD", dec!(0.20), dec!(0.06), dec!(0.14)),
        ],
        expected_return: dec!(0.0855),
        volatility: dec!(0.121),
        qubits: 8,
        iterations: 512,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_reconciliations_are_internally_consistent() {
        for rec in reconciliations() {
            assert!(!rec.difference_is_inconsistent(), "{}", rec.id);
        }
    }

    #[test]
    fn sample_quantum_weights_sum_to_one() {
        let total: Decimal = quantum_portfolio().allocations.iter().map(|a| a.weight).sum();
        assert_eq!(total, Decimal::ONE);
    }
}
