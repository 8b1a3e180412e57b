use super::deduction::{road_deduction, validate_plot_size, validate_road_deduction};
use super::domain::Plot;
use super::error::{CalculationError, ConfigurationError};
use super::green::green_area_rate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a portfolio-wide green deduction is split across plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreenAllocationMethod {
    /// Weighted by each plot's size.
    #[default]
    Proportional,
    /// Weighted by caller-supplied weights, one per plot.
    Custom,
}

/// Green deduction computed once on the combined area and spread over plots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioGreen {
    /// Combined size of the plots subject to deduction.
    pub deductible_area: f64,
    pub rate: f64,
    pub green_total: f64,
    /// Per-plot share in input order; parceled plots always receive 0.
    pub allocations: Vec<f64>,
    /// Green area that could not be placed because plots hit their cap.
    pub unallocated: f64,
}

/// Looks the green rate up on the summed size of all non-parceled plots and
/// distributes the resulting deduction by `method`.
///
/// A plot's share is capped at its area left after the road deduction, so
/// no plot is ever allocated more green than it owns.
pub fn allocate_portfolio_green(
    plots: &[Plot],
    method: GreenAllocationMethod,
    custom_weights: &[f64],
) -> Result<PortfolioGreen, CalculationError> {
    for plot in plots {
        validate_plot_size(&plot.serial_number, plot.plot_size)?;
        if !plot.is_parceled {
            validate_road_deduction(&plot.serial_number, plot.road_deduction_percent)?;
        }
    }
    if method == GreenAllocationMethod::Custom {
        validate_custom_weights(plots.len(), custom_weights)?;
    }
    allocate_validated(plots, method, custom_weights)
}

/// Allocation for plots and weights that have already passed validation.
pub(crate) fn allocate_validated(
    plots: &[Plot],
    method: GreenAllocationMethod,
    custom_weights: &[f64],
) -> Result<PortfolioGreen, CalculationError> {
    let deductible_area: f64 = plots
        .iter()
        .filter(|plot| !plot.is_parceled)
        .map(|plot| plot.plot_size)
        .sum();
    let rate = green_area_rate(deductible_area);
    let green_total = deductible_area * rate / 100.0;

    let weights: Vec<f64> = plots
        .iter()
        .enumerate()
        .map(|(index, plot)| match (plot.is_parceled, method) {
            (true, _) => 0.0,
            (false, GreenAllocationMethod::Proportional) => plot.plot_size,
            (false, GreenAllocationMethod::Custom) => custom_weights[index],
        })
        .collect();
    let weight_sum: f64 = weights.iter().sum();

    if green_total == 0.0 {
        return Ok(PortfolioGreen {
            deductible_area,
            rate,
            green_total,
            allocations: vec![0.0; plots.len()],
            unallocated: 0.0,
        });
    }
    if weight_sum <= 0.0 {
        return Err(ConfigurationError::ZeroAllocationWeights { green_total }.into());
    }

    let allocations: Vec<f64> = plots
        .iter()
        .zip(&weights)
        .map(|(plot, weight)| {
            let share = green_total * weight / weight_sum;
            let cap = plot.plot_size - road_deduction(plot.plot_size, plot.road_deduction_percent);
            if share > cap {
                warn!(
                    plot = %plot.serial_number,
                    share,
                    cap,
                    "green allocation capped at remaining plot area"
                );
                cap
            } else {
                share
            }
        })
        .collect();
    let unallocated = (green_total - allocations.iter().sum::<f64>()).max(0.0);

    Ok(PortfolioGreen {
        deductible_area,
        rate,
        green_total,
        allocations,
        unallocated,
    })
}

pub(crate) fn validate_custom_weights(
    plot_count: usize,
    weights: &[f64],
) -> Result<(), ConfigurationError> {
    if weights.len() != plot_count {
        return Err(ConfigurationError::AllocationCountMismatch {
            expected: plot_count,
            actual: weights.len(),
        });
    }
    if let Some((index, value)) = weights
        .iter()
        .copied()
        .enumerate()
        .find(|(_, weight)| !weight.is_finite() || *weight < 0.0)
    {
        return Err(ConfigurationError::InvalidAllocationWeight { index, value });
    }
    Ok(())
}
