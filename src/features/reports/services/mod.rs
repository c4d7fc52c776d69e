pub mod lifecycle;
mod report_service;

pub use lifecycle::ReportLifecycle;
pub use report_service::ReportService;
