//! Booking plans: what to search for, where, and with which selectors.
//!
//! A plan is a YAML file describing one search (destination, stay dates,
//! occupancy) plus browser options and optional selector overrides. Values
//! may reference `${params}` resolved at load time from the CLI.

pub mod params;
pub mod schema;

pub use params::{ParamDef, Params};
pub use schema::{BrowserOptions, GuestSpec, Plan, SearchSpec, Site, Viewport};
