use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Attendance status accepted by the attendance endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// A seller's verdict on a pending milk receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptDecision {
    Received,
    NotReceived,
}

pub mod staff {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ManagerNew {
        pub username: String,
        pub password: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ManagerView {
        pub manager_id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmployeeNew {
        pub username: String,
        pub password: String,
        pub name: String,
        pub base_salary: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmployeeView {
        pub employee_id: String,
        pub name: String,
        pub base_salary: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationNew {
        pub name: String,
        pub address: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationView {
        pub location_id: String,
        pub name: String,
        pub address: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationStatsView {
        pub location_id: String,
        pub location_name: String,
        pub address: String,
        pub seller_count: u64,
        pub milk_received_today: Decimal,
        pub farm_milk_today: Decimal,
        pub inter_seller_milk_today: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SellerNew {
        pub location_id: String,
        pub username: String,
        pub password: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SellerView {
        pub seller_id: String,
        pub name: String,
        pub location_id: String,
    }
}

pub mod attendance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttendanceMark {
        pub employee_id: String,
        /// Defaults to today.
        pub date: Option<NaiveDate>,
        pub status: AttendanceStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AttendanceResult {
        /// False when the same status was already on file (no-op).
        pub changed: bool,
        pub date: NaiveDate,
        pub status: AttendanceStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeductionNew {
        pub employee_id: String,
        pub amount: Decimal,
        pub reason: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeductionView {
        pub deduction_id: String,
        pub amount: Decimal,
        pub reason: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalaryView {
        pub month: String,
        pub base_salary: Decimal,
        pub total_deductions: Decimal,
        pub final_salary: Decimal,
        pub days_worked: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmployeeDashboardView {
        pub employee_id: String,
        pub name: String,
        pub base_salary: Decimal,
        pub days_worked: i64,
        pub total_days: i64,
        pub attendance_percentage: Decimal,
        pub salary_balance: Decimal,
        pub total_deductions: Decimal,
        pub final_salary: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummaryView {
        pub total_days: i64,
        pub present: i64,
        pub absent: i64,
        pub unmarked: i64,
    }
}

pub mod operations {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FeedNew {
        pub date: Option<NaiveDate>,
        /// Update this record instead of creating a new one.
        pub record_id: Option<String>,
        pub feed_type: String,
        pub quantity: Decimal,
        pub cost: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FeedView {
        pub feed_id: String,
        pub date: NaiveDate,
        pub feed_type: String,
        pub quantity: Decimal,
        pub cost: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub date: Option<NaiveDate>,
        pub record_id: Option<String>,
        pub category: String,
        pub amount: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub expense_id: String,
        pub date: NaiveDate,
        pub category: String,
        pub amount: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MedicineNew {
        pub date: Option<NaiveDate>,
        pub record_id: Option<String>,
        pub medicine_name: String,
        pub cost: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MedicineView {
        pub medicine_id: String,
        pub date: NaiveDate,
        pub medicine_name: String,
        pub cost: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeftoverUpdate {
        pub date: Option<NaiveDate>,
        pub leftover_milk: Option<Decimal>,
        pub leftover_sales: Option<Decimal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DistributionSummaryView {
        pub date: NaiveDate,
        pub total_milk: Decimal,
        pub leftover_milk: Decimal,
        pub leftover_sales: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyReportView {
        pub date: NaiveDate,
        pub feed_records: Vec<FeedView>,
        pub expense_records: Vec<ExpenseView>,
        pub medicine_records: Vec<MedicineView>,
        pub milk_distribution: Option<DistributionSummaryView>,
    }
}

pub mod milk {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DistributeNew {
        pub location_id: String,
        pub date: Option<NaiveDate>,
        pub quantity: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DistributeResult {
        pub date: NaiveDate,
        pub seller_count: usize,
        pub quantity_per_seller: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptView {
        pub receipt_id: String,
        pub quantity: Decimal,
        pub date: NaiveDate,
        pub source: String,
        pub status: String,
        pub manager_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptConfirm {
        pub decision: ReceiptDecision,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleNew {
        pub date: Option<NaiveDate>,
        pub quantity: Decimal,
        pub customer_name: String,
        pub total_amount: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleView {
        pub sale_id: String,
        pub date: NaiveDate,
        pub quantity: Decimal,
        pub customer_name: String,
        pub total_amount: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyTotalsNew {
        pub date: Option<NaiveDate>,
        pub cash_sales: Decimal,
        pub online_sales: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyTotalsView {
        pub date: NaiveDate,
        pub revenue: Decimal,
        pub cash_sales: Decimal,
        pub online_sales: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SellerSummaryView {
        pub date: NaiveDate,
        pub total_received: Decimal,
        pub farm_milk: Decimal,
        pub inter_seller_milk: Decimal,
        pub total_sold: Decimal,
        pub total_lent: Decimal,
        pub remaining_milk: Decimal,
        pub revenue: Decimal,
        pub cash_sales: Decimal,
        pub online_sales: Decimal,
        pub sales: Vec<SaleView>,
    }
}

pub mod request {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestNew {
        pub quantity: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestView {
        pub request_id: String,
        pub from_seller_id: String,
        pub to_seller_id: Option<String>,
        pub quantity: Decimal,
        pub status: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BorrowLendView {
        pub date: NaiveDate,
        /// "borrowed" or "lent", from the caller's point of view.
        pub direction: String,
        pub counterparty: String,
        pub quantity: Decimal,
        pub settled: bool,
    }
}

pub mod notification {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationView {
        pub notification_id: String,
        pub message: String,
        pub read: bool,
        pub created_at: DateTime<Utc>,
    }
}
