//! Sales aggregation.
//!
//! Summaries over a calendar date range, the dashboard's time buckets, and
//! the per-staff sales breakdown. All aggregation walks non-archived invoices
//! and computes totals from the snapshotted line items, so a report never
//! changes when the catalog does.

use crate::{
    entities::{Invoice, InvoiceItem, Patient, User, invoice, invoice_item, user},
    errors::Result,
};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// Inclusive calendar date range for reports.
///
/// Both ends are optional; an open end means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// First day included
    pub start: Option<NaiveDate>,
    /// Last day included
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Parses `YYYY-MM-DD` query parameters. Unparseable values are ignored
    /// rather than erroring, leaving that end of the range open.
    #[must_use]
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Self {
        let parse = |s: Option<&str>| {
            s.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        };
        Self {
            start: parse(start),
            end: parse(end),
        }
    }

    /// Whether a calendar day falls inside the range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start.is_none_or(|s| day >= s) && self.end.is_none_or(|e| day <= e)
    }
}

/// One invoice row in a sales summary.
#[derive(Debug, Clone, Serialize)]
pub struct SalesRow {
    /// Invoice id
    pub invoice_id: i64,
    /// Calendar day the invoice was created
    pub date: NaiveDate,
    /// Patient name, or `Walk-in` when the invoice has none
    pub patient_name: String,
    /// Name of the staff member who created the invoice, or `-`
    pub cashier: String,
    /// `name xQty` per line, comma separated
    pub services: String,
    /// Invoice total from the snapshots
    pub total: f64,
    /// Payment state
    pub is_paid: bool,
}

/// A rendered sales summary: rows plus totals.
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    /// Range the summary covers
    #[serde(skip)]
    pub range: DateRange,
    /// One row per invoice, oldest first
    pub rows: Vec<SalesRow>,
    /// Number of invoices in range
    pub total_invoices: usize,
    /// Sum of invoice totals in range
    pub total_sales: f64,
}

/// Dashboard sales buckets: invoice count and sales sum per window.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DashboardStats {
    /// Sales with today's date
    pub today_sales: f64,
    /// Invoices with today's date
    pub today_invoices: usize,
    /// Sales in the last seven calendar days, today included
    pub week_sales: f64,
    /// Invoices in the last seven calendar days
    pub week_invoices: usize,
    /// Sales in the current calendar month
    pub month_sales: f64,
    /// Invoices in the current calendar month
    pub month_invoices: usize,
    /// Sales in the current calendar year
    pub year_sales: f64,
    /// Invoices in the current calendar year
    pub year_invoices: usize,
}

/// Per-staff sales figures for the analytics screen.
#[derive(Debug, Clone, Serialize)]
pub struct StaffSales {
    /// Account id
    pub user_id: i64,
    /// Display name
    pub name: String,
    /// Invoices created by this staff member, all time
    pub invoices: usize,
    /// Sales with today's date
    pub daily: f64,
    /// Sales in the last seven calendar days
    pub weekly: f64,
    /// Sales in the current calendar month
    pub monthly: f64,
    /// Sales in the current calendar year
    pub yearly: f64,
    /// Share of this year's clinic sales, in percent
    pub percentage: f64,
    /// Day of the staff member's most recent invoice
    pub last_activity: Option<NaiveDate>,
}

struct InvoiceFigures {
    id: i64,
    day: NaiveDate,
    patient_id: Option<i64>,
    created_by: Option<i64>,
    is_paid: bool,
    services: String,
    total: f64,
}

/// Loads every non-archived invoice with its total, oldest first.
async fn load_figures(db: &DatabaseConnection) -> Result<Vec<InvoiceFigures>> {
    let headers = Invoice::find()
        .filter(invoice::Column::IsArchived.eq(false))
        .order_by_asc(invoice::Column::DateCreated)
        .all(db)
        .await?;

    let items = InvoiceItem::find()
        .order_by_asc(invoice_item::Column::Id)
        .all(db)
        .await?;
    let mut by_invoice: HashMap<i64, Vec<invoice_item::Model>> = HashMap::new();
    for item in items {
        by_invoice.entry(item.invoice_id).or_default().push(item);
    }

    Ok(headers
        .into_iter()
        .map(|header| {
            let items = by_invoice.remove(&header.id).unwrap_or_default();
            let services = items
                .iter()
                .map(|i| format!("{} x{}", i.service_name_at_time, i.quantity))
                .collect::<Vec<_>>()
                .join(", ");
            let total = items.iter().map(invoice_item::Model::total_price).sum();
            InvoiceFigures {
                id: header.id,
                day: header.date_created.date_naive(),
                patient_id: header.patient_id,
                created_by: header.created_by,
                is_paid: header.is_paid,
                services,
                total,
            }
        })
        .collect())
}

async fn patient_names(db: &DatabaseConnection) -> Result<HashMap<i64, String>> {
    Ok(Patient::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.full_name()))
        .collect())
}

async fn staff_names(db: &DatabaseConnection) -> Result<HashMap<i64, String>> {
    Ok(User::find()
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name()))
        .collect())
}

/// Builds the sales summary for an inclusive date range.
pub async fn sales_summary(db: &DatabaseConnection, range: DateRange) -> Result<SalesSummary> {
    let names = patient_names(db).await?;
    let cashiers = staff_names(db).await?;
    let rows: Vec<SalesRow> = load_figures(db)
        .await?
        .into_iter()
        .filter(|f| range.contains(f.day))
        .map(|f| SalesRow {
            invoice_id: f.id,
            date: f.day,
            patient_name: f
                .patient_id
                .and_then(|pid| names.get(&pid).cloned())
                .unwrap_or_else(|| "Walk-in".to_string()),
            cashier: f
                .created_by
                .and_then(|uid| cashiers.get(&uid).cloned())
                .unwrap_or_else(|| "-".to_string()),
            services: f.services,
            total: f.total,
            is_paid: f.is_paid,
        })
        .collect();

    let total_invoices = rows.len();
    let total_sales = rows.iter().map(|r| r.total).sum();
    Ok(SalesSummary {
        range,
        rows,
        total_invoices,
        total_sales,
    })
}

fn bucket_edges(today: NaiveDate) -> (NaiveDate, u32, i32) {
    let week_start = today - chrono::Days::new(6);
    (week_start, today.month(), today.year())
}

/// Computes the dashboard's time-bucket totals as of today.
pub async fn dashboard_stats(db: &DatabaseConnection) -> Result<DashboardStats> {
    let today = Utc::now().date_naive();
    let (week_start, month, year) = bucket_edges(today);

    let mut stats = DashboardStats::default();
    for f in load_figures(db).await? {
        if f.day == today {
            stats.today_sales += f.total;
            stats.today_invoices += 1;
        }
        if f.day >= week_start && f.day <= today {
            stats.week_sales += f.total;
            stats.week_invoices += 1;
        }
        if f.day.year() == year && f.day.month() == month {
            stats.month_sales += f.total;
            stats.month_invoices += 1;
        }
        if f.day.year() == year {
            stats.year_sales += f.total;
            stats.year_invoices += 1;
        }
    }
    Ok(stats)
}

/// Computes per-staff sales figures, sorted by yearly sales descending.
///
/// Walk-in invoices with no recorded creator are excluded from the breakdown
/// but still count toward the clinic total used for the percentage.
pub async fn staff_breakdown(db: &DatabaseConnection) -> Result<Vec<StaffSales>> {
    let today = Utc::now().date_naive();
    let (week_start, month, year) = bucket_edges(today);

    let accounts: HashMap<i64, user::Model> = User::find()
        .filter(user::Column::IsStaff.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut clinic_yearly = 0.0;
    let mut per_staff: HashMap<i64, StaffSales> = HashMap::new();
    for f in load_figures(db).await? {
        if f.day.year() == year {
            clinic_yearly += f.total;
        }
        let Some(uid) = f.created_by else { continue };
        let Some(account) = accounts.get(&uid) else { continue };

        let entry = per_staff.entry(uid).or_insert_with(|| StaffSales {
            user_id: uid,
            name: account.full_name(),
            invoices: 0,
            daily: 0.0,
            weekly: 0.0,
            monthly: 0.0,
            yearly: 0.0,
            percentage: 0.0,
            last_activity: None,
        });
        entry.invoices += 1;
        if f.day == today {
            entry.daily += f.total;
        }
        if f.day >= week_start && f.day <= today {
            entry.weekly += f.total;
        }
        if f.day.year() == year && f.day.month() == month {
            entry.monthly += f.total;
        }
        if f.day.year() == year {
            entry.yearly += f.total;
        }
        entry.last_activity = Some(entry.last_activity.map_or(f.day, |d| d.max(f.day)));
    }

    let mut breakdown: Vec<StaffSales> = per_staff.into_values().collect();
    for staff in &mut breakdown {
        staff.percentage = if clinic_yearly > 0.0 {
            staff.yearly / clinic_yearly * 100.0
        } else {
            0.0
        };
    }
    breakdown.sort_by(|a, b| b.yearly.total_cmp(&a.yearly));
    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_date_range_parse_ignores_invalid() {
        let range = DateRange::parse(Some("2026-01-01"), Some("garbage"));
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(range.end, None);

        assert_eq!(DateRange::parse(None, None), DateRange::default());
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = DateRange::parse(Some("2026-01-01"), Some("2026-01-31"));
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
    }

    #[tokio::test]
    async fn test_sales_summary_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let patient = create_test_patient(&db, "Jane", "Doe").await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;
        let cleaning = create_test_service(&db, "Cleaning", 800.0).await?;

        create_test_invoice(&db, Some(patient.id), &[(checkup.id, 2)]).await?;
        create_test_invoice(&db, None, &[(cleaning.id, 1)]).await?;

        let summary = sales_summary(&db, DateRange::default()).await?;
        assert_eq!(summary.total_invoices, 2);
        assert_eq!(summary.total_sales, 1800.0);
        assert_eq!(summary.rows[0].patient_name, "Jane Doe");
        assert_eq!(summary.rows[0].services, "Check-up x2");
        assert_eq!(summary.rows[0].cashier, "-");
        assert_eq!(summary.rows[1].patient_name, "Walk-in");
        Ok(())
    }

    #[tokio::test]
    async fn test_sales_summary_excludes_archived_and_out_of_range() -> Result<()> {
        let db = setup_test_db().await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;

        let kept = create_test_invoice(&db, None, &[(checkup.id, 1)]).await?;
        let archived = create_test_invoice(&db, None, &[(checkup.id, 1)]).await?;
        crate::core::invoice::archive_invoice(&db, archived.id).await?;

        let summary = sales_summary(&db, DateRange::default()).await?;
        assert_eq!(summary.total_invoices, 1);
        assert_eq!(summary.rows[0].invoice_id, kept.id);

        // A past January window excludes today's invoices entirely
        let january = DateRange::parse(Some("2020-01-01"), Some("2020-01-31"));
        let summary = sales_summary(&db, january).await?;
        assert_eq!(summary.total_invoices, 0);
        assert_eq!(summary.total_sales, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_buckets_count_todays_invoice_everywhere() -> Result<()> {
        let db = setup_test_db().await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;
        create_test_invoice(&db, None, &[(checkup.id, 3)]).await?;

        let stats = dashboard_stats(&db).await?;
        assert_eq!(stats.today_sales, 1500.0);
        assert_eq!(stats.today_invoices, 1);
        assert_eq!(stats.week_sales, 1500.0);
        assert_eq!(stats.week_invoices, 1);
        assert_eq!(stats.month_sales, 1500.0);
        assert_eq!(stats.month_invoices, 1);
        assert_eq!(stats.year_sales, 1500.0);
        assert_eq!(stats.year_invoices, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_staff_breakdown_percentage() -> Result<()> {
        let db = setup_test_db().await?;
        let (alice, _) = create_test_staff(&db, "alice", true).await?;
        let (carol, _) = create_test_staff(&db, "carol", true).await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;

        crate::core::invoice::create_invoice(
            &db,
            None,
            &[crate::core::invoice::LineRequest { service_id: checkup.id, quantity: 3 }],
            Some(alice.id),
        )
        .await?;
        crate::core::invoice::create_invoice(
            &db,
            None,
            &[crate::core::invoice::LineRequest { service_id: checkup.id, quantity: 1 }],
            Some(carol.id),
        )
        .await?;

        let breakdown = staff_breakdown(&db).await?;
        assert_eq!(breakdown.len(), 2);
        // Sorted by yearly sales descending
        assert_eq!(breakdown[0].user_id, alice.id);
        assert_eq!(breakdown[0].invoices, 1);
        assert_eq!(breakdown[0].yearly, 1500.0);
        assert_eq!(breakdown[0].percentage, 75.0);
        assert_eq!(breakdown[1].percentage, 25.0);
        assert_eq!(breakdown[0].last_activity, Some(Utc::now().date_naive()));
        Ok(())
    }
}
