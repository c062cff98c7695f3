//! [`BookingSurface`] over a live [`eoka::Page`].
//!
//! All reads go through small JavaScript templates with JSON-escaped selector
//! literals; all actions go through the page's own click/fill methods. Which
//! elements those selectors point at is entirely a plan concern: the
//! [`Selectors`] block ships defaults and every field can be overridden per
//! site from YAML.

use eoka::Page;
use serde::Deserialize;
use tracing::debug;

use super::{BookingSurface, GuestField};
use crate::converge::calendar::Calendar;
use crate::converge::dates::DayGrid;
use crate::{Error, Result};

/// Value/plus/minus selectors for one occupancy stepper.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CounterSelectors {
    pub value: String,
    pub plus: String,
    pub minus: String,
}

impl Default for CounterSelectors {
    fn default() -> Self {
        Self {
            value: ".count".into(),
            plus: ".plus".into(),
            minus: ".minus".into(),
        }
    }
}

impl CounterSelectors {
    fn scoped(root: &str) -> Self {
        Self {
            value: format!("{root} .count"),
            plus: format!("{root} .plus"),
            minus: format!("{root} .minus"),
        }
    }
}

/// Where the search form lives on a particular site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Destination text input.
    pub destination: String,
    /// Control that opens the date picker.
    pub calendar_open: String,
    /// Label naming the currently shown month.
    pub calendar_caption: String,
    /// Next-month arrow.
    pub calendar_next: String,
    /// Previous-month arrow.
    pub calendar_prev: String,
    /// Attribute on day cells holding the yyyy-mm-dd token.
    pub day_attribute: String,
    pub adults: CounterSelectors,
    pub children: CounterSelectors,
    pub rooms: CounterSelectors,
    /// Search submit button.
    pub search: String,
    /// Element that only exists once results have rendered.
    pub results: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            destination: "#destination".into(),
            calendar_open: "#dates".into(),
            calendar_caption: ".calendar-caption".into(),
            calendar_next: ".calendar-next".into(),
            calendar_prev: ".calendar-prev".into(),
            day_attribute: "data-date".into(),
            adults: CounterSelectors::scoped("#adults"),
            children: CounterSelectors::scoped("#children"),
            rooms: CounterSelectors::scoped("#rooms"),
            search: "#search".into(),
            results: "#results".into(),
        }
    }
}

impl Selectors {
    fn counter(&self, field: GuestField) -> &CounterSelectors {
        match field {
            GuestField::Adults => &self.adults,
            GuestField::Children => &self.children,
            GuestField::Rooms => &self.rooms,
        }
    }

    fn day_cell(&self, token: &str) -> String {
        format!("[{}=\"{}\"]", self.day_attribute, token)
    }
}

/// Booking surface bound to a page that already shows the search form.
pub struct LiveSurface<'a> {
    page: &'a Page,
    selectors: Selectors,
}

impl<'a> LiveSurface<'a> {
    pub fn new(page: &'a Page, selectors: Selectors) -> Self {
        Self { page, selectors }
    }

    /// Read an element's trimmed text, erroring if it is absent.
    async fn element_text(&self, selector: &str, what: &str) -> Result<String> {
        let js = format!(
            "document.querySelector({})?.textContent ?? null",
            serde_json::to_string(selector).unwrap()
        );
        let text: Option<String> = self.page.evaluate(&js).await?;
        text.map(|t| t.trim().to_string())
            .ok_or_else(|| Error::Surface(format!("{what} not found at '{selector}'")))
    }

    async fn element_exists(&self, selector: &str) -> Result<bool> {
        let js = format!(
            "!!document.querySelector({})",
            serde_json::to_string(selector).unwrap()
        );
        Ok(self.page.evaluate(&js).await?)
    }
}

impl Calendar for LiveSurface<'_> {
    async fn caption(&self) -> Result<String> {
        self.element_text(&self.selectors.calendar_caption, "calendar caption")
            .await
    }

    async fn flip_forward(&self) -> Result<()> {
        self.page.click(&self.selectors.calendar_next).await?;
        Ok(())
    }

    async fn flip_back(&self) -> Result<()> {
        self.page.click(&self.selectors.calendar_prev).await?;
        Ok(())
    }
}

impl DayGrid for LiveSurface<'_> {
    async fn day_visible(&self, token: &str) -> Result<bool> {
        self.element_exists(&self.selectors.day_cell(token)).await
    }

    async fn click_day(&self, token: &str) -> Result<()> {
        self.page.click(&self.selectors.day_cell(token)).await?;
        Ok(())
    }

    async fn visible_days(&self) -> Result<Vec<String>> {
        let js = format!(
            r#"JSON.stringify(Array.from(document.querySelectorAll({}))
                .map(el => el.getAttribute({})))"#,
            serde_json::to_string(&format!("[{}]", self.selectors.day_attribute)).unwrap(),
            serde_json::to_string(&self.selectors.day_attribute).unwrap()
        );
        let json: String = self.page.evaluate(&js).await?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Surface(format!("day cell enumeration: {e}")))
    }
}

impl BookingSurface for LiveSurface<'_> {
    async fn fill_destination(&self, destination: &str) -> Result<()> {
        debug!("destination: '{destination}'");
        self.page
            .fill(&self.selectors.destination, destination)
            .await?;
        Ok(())
    }

    async fn open_calendar(&self) -> Result<()> {
        self.page.click(&self.selectors.calendar_open).await?;
        Ok(())
    }

    async fn guest_count(&self, field: GuestField) -> Result<i64> {
        let text = self
            .element_text(&self.selectors.counter(field).value, field.label())
            .await?;
        text.parse()
            .map_err(|_| Error::Surface(format!("{field} shows '{text}', not a number")))
    }

    async fn adjust_guests(&self, field: GuestField, up: bool) -> Result<()> {
        let sel = self.selectors.counter(field);
        let button = if up { &sel.plus } else { &sel.minus };
        self.page.click(button).await?;
        Ok(())
    }

    async fn submit_search(&self) -> Result<()> {
        self.page.click(&self.selectors.search).await?;
        Ok(())
    }

    async fn results_ready(&self) -> Result<bool> {
        self.element_exists(&self.selectors.results).await
    }
}
