mod report;
mod report_category;
mod report_stats;
mod report_status;

pub use report::{CreateReport, Report};
pub use report_category::ReportCategory;
pub use report_stats::ReportStats;
pub use report_status::ReportStatus;
