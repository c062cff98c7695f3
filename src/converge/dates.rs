//! Date selection with navigation and same-month fallback.
//!
//! A requested date may already be rendered, may live in a month the
//! calendar is not showing, or may never become clickable at all. Selection
//! works through those cases in order and reports which strategy landed via
//! [`Outcome`], so "picked the exact day" and "kept the run alive with a
//! substitute" stay distinguishable in the log and the report.

use tracing::{debug, info, warn};

use crate::converge::calendar::{self, Calendar};
use crate::dateutil;

/// How a date selection resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The requested day was rendered and clicked directly.
    Matched,
    /// The requested day was clicked after navigating to its month.
    Navigated,
    /// A different day in the same month was clicked instead.
    FallbackUsed,
    /// Nothing clickable, not even a substitute.
    NotFound,
}

impl Outcome {
    /// Whether any day ended up selected.
    pub fn selected(self) -> bool {
        !matches!(self, Outcome::NotFound)
    }
}

/// A calendar whose rendered day cells can be inspected and clicked by
/// day token.
#[allow(async_fn_in_trait)]
pub trait DayGrid: Calendar {
    /// Whether a cell for this token is currently rendered.
    async fn day_visible(&self, token: &str) -> crate::Result<bool>;
    /// Click the cell for this token.
    async fn click_day(&self, token: &str) -> crate::Result<()>;
    /// All day tokens currently rendered.
    async fn visible_days(&self) -> crate::Result<Vec<String>>;
}

/// Select the day `token` on the grid, degrading rather than failing.
///
/// Strategy order: click the rendered cell directly; otherwise navigate the
/// calendar to the token's month and retry the direct click exactly once;
/// otherwise click any rendered day sharing the token's year-month prefix.
/// A missing date is an [`Outcome::NotFound`], never an error; transient
/// surface failures along the way degrade the same way.
pub async fn select_date<G: DayGrid>(grid: &G, token: &str) -> Outcome {
    if try_click(grid, token).await {
        info!("date {token}: selected directly");
        return Outcome::Matched;
    }

    match dateutil::token_month(token) {
        Some((year, month)) => {
            if calendar::navigate_to_month(grid, year, month).await {
                if try_click(grid, token).await {
                    info!("date {token}: selected after navigation");
                    return Outcome::Navigated;
                }
                debug!("date {token}: month reached but cell still absent");
            } else {
                debug!("date {token}: month navigation did not converge");
            }
        }
        None => warn!("date token {token:?} is not a yyyy-mm-dd day, skipping navigation"),
    }

    match same_month_substitute(grid, token).await {
        Some(substitute) => {
            warn!("date {token}: settled for {substitute}");
            Outcome::FallbackUsed
        }
        None => {
            warn!("date {token}: nothing selectable in the rendered range");
            Outcome::NotFound
        }
    }
}

/// Click the cell if it is rendered. Any hiccup reads as "not clicked".
async fn try_click<G: DayGrid>(grid: &G, token: &str) -> bool {
    match grid.day_visible(token).await {
        Ok(true) => match grid.click_day(token).await {
            Ok(()) => true,
            Err(e) => {
                debug!("date {token}: click failed: {e}");
                false
            }
        },
        Ok(false) => false,
        Err(e) => {
            debug!("date {token}: visibility check failed: {e}");
            false
        }
    }
}

/// First clickable rendered day sharing the token's year-month prefix.
async fn same_month_substitute<G: DayGrid>(grid: &G, token: &str) -> Option<String> {
    let prefix = dateutil::month_prefix(token)?;
    let days = match grid.visible_days().await {
        Ok(days) => days,
        Err(e) => {
            debug!("date {token}: could not enumerate rendered days: {e}");
            return None;
        }
    };
    for day in days {
        if day.starts_with(&prefix) && grid.click_day(&day).await.is_ok() {
            return Some(day);
        }
    }
    None
}
