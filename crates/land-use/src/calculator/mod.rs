//! Land-use calculation engine.
//!
//! Turns validated plot records into net buildable land, per-zone buildable
//! floor area, and portfolio-wide commercial/residential totals. Every call is
//! a pure function of its inputs; nothing is cached between calls.

mod allocation;
mod deduction;
pub mod domain;
mod engine;
mod envelope;
pub mod error;
mod green;
mod zoning;

pub use allocation::{allocate_portfolio_green, GreenAllocationMethod, PortfolioGreen};
pub use deduction::{net_area, NetArea};
pub use domain::{BuildingEnvelope, DensityClass, Plot, Zone};
pub use engine::{
    aggregate, CalculationOptions, EnvelopeTotals, GreenDeductionPolicy, LandUseCalculator,
    LandUseResults, PlotAssessment, PortfolioTotals, RoundingMode, EFFICIENCY_INCENTIVE_RATE,
};
pub use envelope::{coverage_area, extra_floors_cost, max_floors, EnvelopeOutcome};
pub use error::{CalculationError, ConfigurationError, InvalidPlotError};
pub use green::green_area_rate;
