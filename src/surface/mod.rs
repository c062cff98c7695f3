//! The seam between the convergence core and an actual page.
//!
//! The core never touches locators or a browser session; it sees a booking
//! form only through these traits. [`live::LiveSurface`] implements them over
//! an [`eoka::Page`]; tests implement them over scripted state.

pub mod live;

pub use live::{CounterSelectors, LiveSurface, Selectors};

use std::fmt;

use crate::converge::counter::Counter;
use crate::converge::dates::DayGrid;
use crate::Result;

/// The three steppers on a booking search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestField {
    Adults,
    Children,
    Rooms,
}

impl GuestField {
    /// Log label for this field.
    pub fn label(self) -> &'static str {
        match self {
            Self::Adults => "adults",
            Self::Children => "children",
            Self::Rooms => "rooms",
        }
    }
}

impl fmt::Display for GuestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the search flow needs from a booking page.
///
/// One driving task per surface; nothing else is assumed to mutate the same
/// form while a flow runs.
#[allow(async_fn_in_trait)]
pub trait BookingSurface: DayGrid {
    /// Type the destination into the search box.
    async fn fill_destination(&self, destination: &str) -> Result<()>;
    /// Open the check-in/check-out calendar widget.
    async fn open_calendar(&self) -> Result<()>;
    /// Read the rendered count for one occupancy stepper.
    async fn guest_count(&self, field: GuestField) -> Result<i64>;
    /// Click the stepper's plus (`up`) or minus button once.
    async fn adjust_guests(&self, field: GuestField, up: bool) -> Result<()>;
    /// Submit the search form.
    async fn submit_search(&self) -> Result<()>;
    /// Whether the results panel has rendered.
    async fn results_ready(&self) -> Result<bool>;
}

/// Binds one [`GuestField`] of a surface to the [`Counter`] seam.
pub struct GuestCounter<'a, S: BookingSurface> {
    surface: &'a S,
    field: GuestField,
}

impl<'a, S: BookingSurface> GuestCounter<'a, S> {
    pub fn new(surface: &'a S, field: GuestField) -> Self {
        Self { surface, field }
    }
}

impl<S: BookingSurface> Counter for GuestCounter<'_, S> {
    async fn displayed(&self) -> Result<i64> {
        self.surface.guest_count(self.field).await
    }

    async fn increment(&self) -> Result<()> {
        self.surface.adjust_guests(self.field, true).await
    }

    async fn decrement(&self) -> Result<()> {
        self.surface.adjust_guests(self.field, false).await
    }
}
