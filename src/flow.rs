//! The search flow: plan in, report out.
//!
//! Every step is best-effort. A stepper that refuses to budge or a date that
//! never renders gets logged and recorded, and the flow moves on. The report
//! says what actually happened, and only [`SearchReport::success`] decides
//! whether the run counts.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::converge::counter;
use crate::converge::dates::{self, Outcome};
use crate::converge::poll::{self, PollPolicy};
use crate::plan::Plan;
use crate::surface::{BookingSurface, GuestCounter, GuestField};

/// What one search run actually achieved.
#[derive(Debug)]
pub struct SearchReport {
    /// How the check-in date resolved.
    pub check_in: Outcome,
    /// How the check-out date resolved.
    pub check_out: Outcome,
    /// Stepper values confirmed on screen at the end of convergence.
    pub adults: i64,
    pub children: i64,
    pub rooms: i64,
    /// Whether the search form was submitted.
    pub submitted: bool,
    /// Whether the results panel rendered inside the plan's window.
    pub results_loaded: bool,
    /// Human-readable notes on everything that fell short.
    pub issues: Vec<String>,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// True only for a fully clean run: both dates selected, all steppers on
    /// target, search submitted, results rendered.
    pub success: bool,
}

/// Run the plan's search against a surface.
///
/// Never aborts the caller; every failure mode lands in the report. The plan
/// is assumed validated (loading does that).
pub async fn run_search<S: BookingSurface>(surface: &S, plan: &Plan) -> SearchReport {
    let start = Instant::now();
    let mut issues = Vec::new();

    info!("search '{}': {}", plan.name, plan.search.destination);
    if let Err(e) = surface.fill_destination(&plan.search.destination).await {
        warn!("destination fill failed: {e}");
        issues.push(format!("destination: {e}"));
    }

    if let Err(e) = surface.open_calendar().await {
        warn!("calendar open failed: {e}");
        issues.push(format!("calendar: {e}"));
    }

    let check_in = dates::select_date(surface, &plan.search.check_in).await;
    if !check_in.selected() {
        issues.push(format!("check_in {} not selectable", plan.search.check_in));
    }
    let check_out = dates::select_date(surface, &plan.search.check_out).await;
    if !check_out.selected() {
        issues.push(format!("check_out {} not selectable", plan.search.check_out));
    }

    let guests = plan.search.guests;
    let adults = settle_counter(surface, GuestField::Adults, guests.adults, &mut issues).await;
    let children =
        settle_counter(surface, GuestField::Children, guests.children, &mut issues).await;
    let rooms = settle_counter(surface, GuestField::Rooms, guests.rooms, &mut issues).await;

    let submitted = match surface.submit_search().await {
        Ok(()) => true,
        Err(e) => {
            warn!("submit failed: {e}");
            issues.push(format!("submit: {e}"));
            false
        }
    };

    let mut results_loaded = false;
    if submitted {
        let window = PollPolicy::new(Duration::from_secs(plan.results_timeout_secs));
        match poll::ensure(window, || surface.results_ready(), "search results").await {
            Ok(()) => results_loaded = true,
            Err(e) => {
                // Soft failure: the run is reported as incomplete, not torn down.
                warn!("{e}");
                issues.push(e.to_string());
            }
        }
    }

    let success = check_in.selected()
        && check_out.selected()
        && adults == i64::from(guests.adults)
        && children == i64::from(guests.children)
        && rooms == i64::from(guests.rooms)
        && submitted
        && results_loaded;

    let report = SearchReport {
        check_in,
        check_out,
        adults,
        children,
        rooms,
        submitted,
        results_loaded,
        issues,
        duration_ms: start.elapsed().as_millis() as u64,
        success,
    };
    debug!("search '{}' finished: {report:?}", plan.name);
    report
}

/// Read one stepper and converge it to its target. A stepper that cannot be
/// read at all is reported and left as-is.
async fn settle_counter<S: BookingSurface>(
    surface: &S,
    field: GuestField,
    target: u32,
    issues: &mut Vec<String>,
) -> i64 {
    let current = match surface.guest_count(field).await {
        Ok(v) => v,
        Err(e) => {
            warn!("{field}: unreadable, leaving untouched: {e}");
            issues.push(format!("{field}: {e}"));
            return -1;
        }
    };

    let reached = counter::converge(
        &GuestCounter::new(surface, field),
        current,
        i64::from(target),
        field.label(),
    )
    .await;
    if reached != i64::from(target) {
        issues.push(format!("{field}: stopped at {reached}, wanted {target}"));
    }
    reached
}
