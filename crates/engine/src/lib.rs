pub use attendance::{Attendance, AttendanceStatus};
pub use borrow_lend::BorrowLendRecord;
pub use error::EngineError;
pub use milk_received::{MilkReceipt, MilkSource, ReceiptStatus};
pub use milk_requests::{MilkRequest, RequestStatus};
pub use ops::{
    AttendanceOutcome, BorrowDirection, BorrowLendEntry, DailyReport, DistributionOutcome,
    EmployeeDashboard, Engine, EngineBuilder, LocationStats, MonthlyAttendanceSummary,
    ReceiptDecision, SellerDailySummary,
};
pub use users::Role;

pub mod attendance;
pub mod borrow_lend;
pub mod daily_operations;
pub mod daily_totals;
pub mod deductions;
pub mod employees;
pub mod expense_records;
pub mod feed_records;
pub mod id_sequences;
pub mod locations;
pub mod managers;
pub mod medicine_records;
pub mod milk_distribution;
pub mod milk_received;
pub mod milk_requests;
pub mod notifications;
pub mod salaries;
pub mod sales;
pub mod sellers;
pub mod users;

mod error;
mod ops;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
