//! Revenue & fulfillment analytics engine
//!
//! Pure, in-memory aggregation over a request-scoped snapshot of a
//! business's catalog and orders. The backend fetches both collections
//! once, builds an [`IdentityIndex`], and runs the aggregators; nothing in
//! this module performs I/O or mutates its inputs.
//!
//! Data flows one direction:
//! catalog -> identity -> { classifier, revenue, fulfillment } -> kpi.

pub mod classifier;
pub mod fulfillment;
pub mod identity;
pub mod kpi;
pub mod revenue;
pub mod series;

pub use fulfillment::FulfillmentBreakdown;
pub use identity::IdentityIndex;
pub use kpi::KpiSnapshot;
pub use revenue::{AnalyticsWindow, ProductSales, RevenueAggregate, TrendBucket};
pub use series::SeriesPoint;
