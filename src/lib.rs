//! logdeck
//!
//! State engine for an interactive log explorer: a stream's fetched rows are
//! filtered, sorted and paginated in memory, the time window rolls or is
//! pinned, and a per-minute event-rate series is built for the overview graph.
//!
//! The library follows a Pure Core / Impure Shell architecture:
//! - [`state`], [`pipeline`], [`timeseries`] and [`widget`] are pure and
//!   testable without I/O
//! - [`session`] sequences calls to the [`source`] collaborators and feeds
//!   the results through the store

pub mod config;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod session;
pub mod source;
pub mod state;
pub mod timeseries;
pub mod widget;

#[cfg(test)]
mod test_harness;
