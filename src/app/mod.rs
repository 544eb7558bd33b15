pub mod bootstrap;
pub mod controller;
pub mod headless;
pub mod session;
pub mod state;

pub use bootstrap::{run_dashboard, DashboardPreset};
pub use controller::{DashboardController, KeyOutcome};
pub use headless::run_fetch;
pub use session::{FetchOutcome, FetchSession, FetchTicket};
pub use state::DashboardState;
