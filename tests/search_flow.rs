//! End-to-end search flow against a scripted in-memory site.
//!
//! The fake renders one month of day cells at a time, steppers that may be
//! wired to do nothing, and a results panel that shows up a few polls after
//! submit: enough misbehavior to exercise every degradation path without a
//! browser.

use std::sync::Mutex;

use chrono::NaiveDate;
use stayrunner::calendar::Calendar;
use stayrunner::dates::DayGrid;
use stayrunner::{BookingSurface, GuestField, Outcome, Plan};

struct State {
    destination: String,
    calendar_open: bool,
    month: (i32, u32),
    counts: [i64; 3],
    submitted: bool,
    result_polls: u32,
    clicked_days: Vec<String>,
}

struct FakeSite {
    state: Mutex<State>,
    stuck: Option<GuestField>,
    dead_arrows: bool,
    missing_days: Vec<String>,
}

impl FakeSite {
    fn showing(year: i32, month: u32) -> Self {
        Self {
            state: Mutex::new(State {
                destination: String::new(),
                calendar_open: false,
                month: (year, month),
                counts: [1, 0, 1],
                submitted: false,
                result_polls: 0,
                clicked_days: Vec::new(),
            }),
            stuck: None,
            dead_arrows: false,
            missing_days: Vec::new(),
        }
    }

    fn with_stuck(mut self, field: GuestField) -> Self {
        self.stuck = Some(field);
        self
    }

    fn with_dead_arrows(mut self) -> Self {
        self.dead_arrows = true;
        self
    }

    fn without_day(mut self, token: &str) -> Self {
        self.missing_days.push(token.to_string());
        self
    }

    fn days_shown(&self) -> Vec<String> {
        let (year, month) = self.state.lock().unwrap().month;
        (1..=28)
            .map(|d| format!("{year:04}-{month:02}-{d:02}"))
            .filter(|t| !self.missing_days.contains(t))
            .collect()
    }

    fn field_index(field: GuestField) -> usize {
        match field {
            GuestField::Adults => 0,
            GuestField::Children => 1,
            GuestField::Rooms => 2,
        }
    }
}

impl Calendar for FakeSite {
    async fn caption(&self) -> stayrunner::Result<String> {
        let (year, month) = self.state.lock().unwrap().month;
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        Ok(first.format("%B %Y").to_string())
    }

    async fn flip_forward(&self) -> stayrunner::Result<()> {
        if !self.dead_arrows {
            let mut state = self.state.lock().unwrap();
            state.month = if state.month.1 == 12 {
                (state.month.0 + 1, 1)
            } else {
                (state.month.0, state.month.1 + 1)
            };
        }
        Ok(())
    }

    async fn flip_back(&self) -> stayrunner::Result<()> {
        if !self.dead_arrows {
            let mut state = self.state.lock().unwrap();
            state.month = if state.month.1 == 1 {
                (state.month.0 - 1, 12)
            } else {
                (state.month.0, state.month.1 - 1)
            };
        }
        Ok(())
    }
}

impl DayGrid for FakeSite {
    async fn day_visible(&self, token: &str) -> stayrunner::Result<bool> {
        Ok(self.days_shown().contains(&token.to_string()))
    }

    async fn click_day(&self, token: &str) -> stayrunner::Result<()> {
        if self.days_shown().contains(&token.to_string()) {
            self.state.lock().unwrap().clicked_days.push(token.to_string());
            Ok(())
        } else {
            Err(stayrunner::Error::Surface(format!("no cell for {token}")))
        }
    }

    async fn visible_days(&self) -> stayrunner::Result<Vec<String>> {
        Ok(self.days_shown())
    }
}

impl BookingSurface for FakeSite {
    async fn fill_destination(&self, destination: &str) -> stayrunner::Result<()> {
        self.state.lock().unwrap().destination = destination.to_string();
        Ok(())
    }

    async fn open_calendar(&self) -> stayrunner::Result<()> {
        self.state.lock().unwrap().calendar_open = true;
        Ok(())
    }

    async fn guest_count(&self, field: GuestField) -> stayrunner::Result<i64> {
        Ok(self.state.lock().unwrap().counts[Self::field_index(field)])
    }

    async fn adjust_guests(&self, field: GuestField, up: bool) -> stayrunner::Result<()> {
        if self.stuck == Some(field) {
            return Ok(()); // button clicks, display never moves
        }
        let mut state = self.state.lock().unwrap();
        state.counts[Self::field_index(field)] += if up { 1 } else { -1 };
        Ok(())
    }

    async fn submit_search(&self) -> stayrunner::Result<()> {
        self.state.lock().unwrap().submitted = true;
        Ok(())
    }

    async fn results_ready(&self) -> stayrunner::Result<bool> {
        let mut state = self.state.lock().unwrap();
        if !state.submitted {
            return Ok(false);
        }
        // Results render on the third poll after submit.
        state.result_polls += 1;
        Ok(state.result_polls >= 3)
    }
}

fn plan(check_in: &str, check_out: &str, adults: u32, children: u32, rooms: u32) -> Plan {
    Plan::parse(&format!(
        r#"
name: "Test"
site:
  url: "https://hotels.example.com"
search:
  destination: "Da Nang"
  check_in: "{check_in}"
  check_out: "{check_out}"
  guests:
    adults: {adults}
    children: {children}
    rooms: {rooms}
results_timeout_secs: 5
"#
    ))
    .unwrap()
}

#[tokio::test]
async fn clean_run_converges_everything() {
    let site = FakeSite::showing(2025, 10);
    let plan = plan("2025-11-05", "2025-11-08", 2, 1, 1);

    let report = stayrunner::run_search(&site, &plan).await;

    assert!(report.success, "issues: {:?}", report.issues);
    assert_eq!(report.check_in, Outcome::Navigated);
    assert_eq!(report.check_out, Outcome::Matched); // same month once navigated
    assert_eq!((report.adults, report.children, report.rooms), (2, 1, 1));
    assert!(report.submitted);
    assert!(report.results_loaded);

    let state = site.state.lock().unwrap();
    assert_eq!(state.destination, "Da Nang");
    assert!(state.calendar_open);
    assert_eq!(state.clicked_days, vec!["2025-11-05", "2025-11-08"]);
}

#[tokio::test]
async fn stuck_stepper_reports_partial_convergence() {
    let site = FakeSite::showing(2025, 10).with_stuck(GuestField::Children);
    let plan = plan("2025-10-14", "2025-10-17", 2, 2, 1);

    let report = stayrunner::run_search(&site, &plan).await;

    assert!(!report.success);
    assert_eq!(report.children, 0, "no step was ever verified");
    assert_eq!(report.adults, 2, "other steppers still converge");
    assert!(report.issues.iter().any(|i| i.contains("children")));
    // The flow still carried on past the stepper.
    assert!(report.submitted);
    assert!(report.results_loaded);
}

#[tokio::test]
async fn missing_day_uses_a_same_month_substitute() {
    let site = FakeSite::showing(2025, 10).without_day("2025-10-14");
    let plan = plan("2025-10-14", "2025-10-17", 1, 0, 1);

    let report = stayrunner::run_search(&site, &plan).await;

    assert_eq!(report.check_in, Outcome::FallbackUsed);
    assert_eq!(report.check_out, Outcome::Matched);
    assert!(report.success, "a substitute still counts as selected");

    let clicked = site.state.lock().unwrap().clicked_days.clone();
    assert!(clicked[0].starts_with("2025-10-"));
    assert_ne!(clicked[0], "2025-10-14");
}

#[tokio::test]
async fn frozen_calendar_ends_in_not_found() {
    let site = FakeSite::showing(2025, 10).with_dead_arrows();
    let plan = plan("2026-02-10", "2026-02-12", 1, 0, 1);

    let report = stayrunner::run_search(&site, &plan).await;

    assert_eq!(report.check_in, Outcome::NotFound);
    assert_eq!(report.check_out, Outcome::NotFound);
    assert!(!report.success);
    assert!(report.issues.iter().any(|i| i.contains("check_in")));
    assert!(site.state.lock().unwrap().clicked_days.is_empty());
}
