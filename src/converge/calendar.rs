//! Month navigation against a rendered calendar widget.
//!
//! The widget exposes three things: a caption naming the shown month, and a
//! pair of flip controls. Navigation is computed once from the parsed caption
//! and then stepped under a hard budget, so a misread caption can waste at
//! most [`MAX_NAV_STEPS`] flips and never loops forever.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::Result;

/// Hard cap on month flips in one navigation.
pub const MAX_NAV_STEPS: u32 = 24;

/// Pause after each flip for the caption to re-render.
const FLIP_SETTLE: Duration = Duration::from_millis(250);

/// Captions bookable sites render for Vietnamese locales: "Tháng 10 2025",
/// also seen with a comma or slash before the year.
static VI_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*tháng\s+(\d{1,2})\s*[,/]?\s*(\d{4})\s*$").unwrap());

/// English captions: "October 2025", "OCT 2025", optionally "October, 2025".
static EN_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z]+)\.?,?\s+(\d{4})\s*$").unwrap());

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A parsed calendar caption. Never constructed from anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthInfo {
    /// 1..=12.
    pub month: u32,
    pub year: i32,
}

impl MonthInfo {
    fn checked(month: u32, year: i32) -> Option<Self> {
        if (1..=12).contains(&month) && (1970..=2100).contains(&year) {
            Some(Self { month, year })
        } else {
            None
        }
    }
}

impl fmt::Display for MonthInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parse a caption into a [`MonthInfo`].
///
/// Tries the Vietnamese numeric form first, then English month names (full
/// names and the standard 3-letter abbreviations, case-insensitive). `None`
/// for anything else, including in-range-looking text with an implausible
/// month or year.
pub fn parse_caption(caption: &str) -> Option<MonthInfo> {
    if let Some(c) = VI_CAPTION.captures(caption) {
        let month = c[1].parse().ok()?;
        let year = c[2].parse().ok()?;
        return MonthInfo::checked(month, year);
    }
    if let Some(c) = EN_CAPTION.captures(caption) {
        let month = month_from_name(&c[1])?;
        let year = c[2].parse().ok()?;
        return MonthInfo::checked(month, year);
    }
    None
}

/// Full month name or exact 3-letter abbreviation, case-insensitive.
fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == lower || (lower.len() == 3 && m.starts_with(&lower)))
        .map(|i| i as u32 + 1)
}

/// Signed month count from `current` to the target position. Zero means the
/// target month is already shown; positive flips forward, negative backward.
pub fn month_offset(current: MonthInfo, target_year: i32, target_month: u32) -> i32 {
    (target_year - current.year) * 12 + (target_month as i32 - current.month as i32)
}

/// A calendar widget: readable caption, flippable month.
#[allow(async_fn_in_trait)]
pub trait Calendar {
    /// Read the caption naming the currently shown month.
    async fn caption(&self) -> Result<String>;
    /// Flip one month forward.
    async fn flip_forward(&self) -> Result<()>;
    /// Flip one month backward.
    async fn flip_back(&self) -> Result<()>;
}

/// Flip the calendar until it shows `target_year`/`target_month`.
///
/// Returns `true` only when the re-read caption exactly names the target.
/// Unparseable captions, failed flips, and exhausted budget all come back as
/// `false`; the caller decides whether that is fatal.
pub async fn navigate_to_month<C: Calendar>(cal: &C, target_year: i32, target_month: u32) -> bool {
    navigate_to_month_with(cal, target_year, target_month, FLIP_SETTLE).await
}

/// [`navigate_to_month`] with an explicit settle delay between flips.
pub async fn navigate_to_month_with<C: Calendar>(
    cal: &C,
    target_year: i32,
    target_month: u32,
    settle: Duration,
) -> bool {
    let caption = match cal.caption().await {
        Ok(c) => c,
        Err(e) => {
            warn!("calendar: caption unreadable: {e}");
            return false;
        }
    };
    let Some(start) = parse_caption(&caption) else {
        warn!("calendar: unrecognized caption {caption:?}");
        return false;
    };

    let offset = month_offset(start, target_year, target_month);
    if offset == 0 {
        debug!("calendar: already on {start}");
        return true;
    }

    let steps = offset.unsigned_abs().min(MAX_NAV_STEPS);
    let arrow = if offset > 0 { "forward" } else { "back" };
    debug!("calendar: {steps} flip(s) {arrow} from {start} toward {target_year:04}-{target_month:02}");

    for _ in 0..steps {
        let flipped = if offset > 0 {
            cal.flip_forward().await
        } else {
            cal.flip_back().await
        };
        if let Err(e) = flipped {
            warn!("calendar: flip {arrow} failed: {e}");
            return false;
        }
        tokio::time::sleep(settle).await;
    }

    match cal.caption().await.ok().and_then(|c| parse_caption(&c)) {
        Some(shown) if shown.year == target_year && shown.month == target_month => true,
        Some(shown) => {
            warn!("calendar: landed on {shown}, wanted {target_year:04}-{target_month:02}");
            false
        }
        None => {
            warn!("calendar: caption unreadable after navigation");
            false
        }
    }
}
