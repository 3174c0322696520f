//! # Domain Module
//!
//! Client-side logic shared by the dashboard, bill and balance screens.
//!
//! ## Module Organization
//!
//! - **numeric_formatter**: plain, grouped, compact (K/M/B/T) and currency amounts
//! - **date_formatter**: epoch millis / ISO-8601 / display string conversions
//! - **axis_scaler**: rounded value-axis bounds for charts
//! - **chart_geometry**: pixel geometry and decoration for line charts
//! - **alarm_scheduler**: persisted one-shot reminder alarms
//!
//! Formatting and chart code is pure. Only the scheduler touches storage,
//! and only through the traits in `crate::storage`.

pub mod alarm_scheduler;
pub mod axis_scaler;
pub mod chart_geometry;
pub mod date_formatter;
pub mod numeric_formatter;

pub use alarm_scheduler::{AlarmScheduler, RestoreSummary};
pub use chart_geometry::{ChartConfig, LineChart, LineStyle, RenderedChart};
pub use numeric_formatter::{day_ordinal, FormattingConfig, NumericFormatter};
