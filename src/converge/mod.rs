//! State convergence against an asynchronously updating page.
//!
//! The page owns its own timing: a click lands now, the DOM catches up later.
//! These modules reconcile the two. Poll until an observation holds, step a
//! counter one verified unit at a time, flip a calendar a bounded number of
//! months, and degrade to a substitute when the exact target never shows up.

pub mod calendar;
pub mod counter;
pub mod dates;
pub mod poll;
