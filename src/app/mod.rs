pub mod dashboard;
pub mod ports;

pub use dashboard::{PageView, Refresh, SessionScope, TenderDashboard};
pub use ports::TenderServicePort;
