mod summary;
pub mod views;

pub use summary::{price_per_buildable_area, round_area};
pub use views::{PlotBreakdownRow, PortfolioSummary, ZoneBreakdownRow};
