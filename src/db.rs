pub mod billing_repo;
pub mod dashboard_repo;
pub mod lead_repo;
pub mod user_repo;

pub use billing_repo::BillingRepository;
pub use dashboard_repo::DashboardRepository;
pub use lead_repo::LeadRepository;
pub use user_repo::UserRepository;
