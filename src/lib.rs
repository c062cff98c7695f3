//! # stayrunner
//!
//! Config-based hotel booking automation. Describe a search in YAML, point it
//! at a booking site, and let the convergence core reconcile the form with
//! what the page actually renders.
//!
//! Booking UIs update asynchronously: a click on a guest stepper or a
//! next-month arrow takes effect some time later, or occasionally not at all.
//! Everything in [`converge`] is built around that: bounded polling, per-step
//! verification, capped navigation, and best-effort fallbacks that keep a run
//! going instead of crashing it on a transient mismatch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stayrunner::{flow, Plan};
//! use stayrunner::surface::LiveSurface;
//!
//! # #[tokio::main]
//! # async fn main() -> stayrunner::Result<()> {
//! let plan = Plan::load("configs/booking.yaml")?;
//! let browser = eoka::Browser::launch().await?;
//! let page = browser.new_page(&plan.site.url).await?;
//!
//! let surface = LiveSurface::new(&page, plan.selectors.clone());
//! let report = flow::run_search(&surface, &plan).await;
//! println!("success: {}", report.success);
//!
//! browser.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod converge;
pub mod dateutil;
pub mod flow;
pub mod plan;
pub mod surface;

pub use converge::calendar::{self, MonthInfo};
pub use converge::counter::{self, Counter};
pub use converge::dates::{self, Outcome};
pub use converge::poll::{self, PollPolicy};
pub use flow::{run_search, SearchReport};
pub use plan::{ParamDef, Params, Plan};
pub use surface::{BookingSurface, GuestField, LiveSurface, Selectors};

/// Result type for stayrunner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during plan loading or page interaction.
///
/// Nothing in the convergence core propagates these out of a running flow;
/// they surface either before a flow starts (plan loading) or as logged,
/// degraded outcomes inside one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("plan error: {0}")]
    Plan(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("timeout: {0}")]
    Timeout(String),
}
