use super::allocation::{
    allocate_validated, validate_custom_weights, GreenAllocationMethod, PortfolioGreen,
};
use super::deduction::{
    net_area, road_deduction, validate_plot_size, validate_road_deduction, NetArea,
};
use super::domain::{DensityClass, Plot};
use super::envelope::{evaluate_envelope, validate_envelope, EnvelopeOutcome};
use super::error::CalculationError;
use super::zoning::{validate_zones, zone_yield, DensityLedger};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Bonus share of commercial plus residential buildable area.
pub const EFFICIENCY_INCENTIVE_RATE: f64 = 0.05;

/// Where the public green-space deduction is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreenDeductionPolicy {
    /// Rate looked up on each plot's own area after road deduction.
    #[default]
    PerPlot,
    /// Rate looked up once on the combined plot area, then allocated.
    Portfolio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Keep full precision; round only in report views.
    #[default]
    AtOutput,
    /// Round deductions, net area and zone buildable areas as they are assigned.
    PerField,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculationOptions {
    pub apply_efficiency_incentive: bool,
    pub green_policy: GreenDeductionPolicy,
    pub green_allocation_method: GreenAllocationMethod,
    pub custom_green_allocations: Vec<f64>,
    pub rounding: RoundingMode,
}

/// A caller's plot with every figure the engine derived for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotAssessment {
    #[serde(flatten)]
    pub plot: Plot,
    pub net_plot_size: f64,
    pub road_deduction: f64,
    pub green_deduction: f64,
    /// One entry per zone, in zone order.
    pub zone_buildable_areas: Vec<f64>,
    #[serde(flatten)]
    pub envelope: Option<EnvelopeOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PortfolioTotals {
    pub total_net_area: f64,
    pub total_road_deduction: f64,
    pub total_green_deduction: f64,
    pub commercial_avg_density: f64,
    pub residential_avg_density: f64,
    pub commercial_buildable_area: f64,
    pub residential_buildable_area: f64,
    pub incentive_area: f64,
    pub total_buildable_area: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EnvelopeTotals {
    pub total_coverage_area: f64,
    /// Summed across plots; wider than a single plot's `u32` floor count.
    pub total_max_floors: u64,
    pub total_extra_floors_cost: f64,
}

/// Output of one calculation pass. Built fresh for every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandUseResults {
    pub totals: PortfolioTotals,
    pub envelope: EnvelopeTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_green: Option<PortfolioGreen>,
    pub plots: Vec<PlotAssessment>,
}

/// Stateless calculator bound to one set of options.
#[derive(Debug, Clone, Default)]
pub struct LandUseCalculator {
    options: CalculationOptions,
}

impl LandUseCalculator {
    pub fn new(options: CalculationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    pub fn aggregate(&self, plots: &[Plot]) -> Result<LandUseResults, CalculationError> {
        aggregate(plots, &self.options)
    }
}

/// Computes per-plot deductions, zone buildable areas and portfolio totals.
///
/// Input plots are never modified; the returned assessments are deep copies.
/// Any invalid plot or option aborts the call before anything is computed.
pub fn aggregate(
    plots: &[Plot],
    options: &CalculationOptions,
) -> Result<LandUseResults, CalculationError> {
    validate(plots, options)?;

    let portfolio_green = match options.green_policy {
        GreenDeductionPolicy::PerPlot => None,
        GreenDeductionPolicy::Portfolio => Some(allocate_validated(
            plots,
            options.green_allocation_method,
            &options.custom_green_allocations,
        )?),
    };

    let mut totals = PortfolioTotals::default();
    let mut envelope_totals = EnvelopeTotals::default();
    let mut ledger = DensityLedger::default();
    let mut assessments = Vec::with_capacity(plots.len());

    for (index, plot) in plots.iter().enumerate() {
        let deductions = match &portfolio_green {
            None => net_area(plot.plot_size, plot.is_parceled, plot.road_deduction_percent)?,
            Some(green) => allocated_net_area(plot, green.allocations[index]),
        };
        let deductions = match options.rounding {
            RoundingMode::AtOutput => deductions,
            RoundingMode::PerField => deductions.rounded(),
        };

        if plot.is_over_allocated() {
            warn!(
                plot = %plot.serial_number,
                zone_percentage_total = plot.zone_percentage_total(),
                "zone percentages exceed 100% of net area"
            );
        }

        let mut zone_buildable_areas = Vec::with_capacity(plot.zones.len());
        for zone in &plot.zones {
            let yielded =
                zone_yield(deductions.net_plot_size, zone.percentage, zone.density_factor);
            let class = zone.classification();
            if class == DensityClass::Unclassified {
                debug!(
                    plot = %plot.serial_number,
                    density_type = %zone.density_type,
                    "zone type excluded from density totals"
                );
            }
            ledger.record(class, yielded.zone_area, zone.density_factor);
            zone_buildable_areas.push(match options.rounding {
                RoundingMode::AtOutput => yielded.buildable_area,
                RoundingMode::PerField => yielded.buildable_area.round(),
            });
        }

        let envelope = plot
            .envelope
            .as_ref()
            .map(|envelope| {
                evaluate_envelope(&plot.serial_number, deductions.net_plot_size, envelope)
            })
            .transpose()?;
        if let Some(outcome) = &envelope {
            envelope_totals.total_coverage_area += outcome.coverage_area;
            envelope_totals.total_max_floors += u64::from(outcome.max_floors);
            envelope_totals.total_extra_floors_cost += outcome.extra_floors_cost;
        }

        totals.total_net_area += deductions.net_plot_size;
        if !plot.is_parceled {
            totals.total_road_deduction += deductions.road_deduction;
            totals.total_green_deduction += deductions.green_deduction;
        }

        debug!(
            plot = %plot.serial_number,
            net_plot_size = deductions.net_plot_size,
            road_deduction = deductions.road_deduction,
            green_deduction = deductions.green_deduction,
            zones = plot.zones.len(),
            "plot assessed"
        );

        assessments.push(PlotAssessment {
            plot: plot.clone(),
            net_plot_size: deductions.net_plot_size,
            road_deduction: deductions.road_deduction,
            green_deduction: deductions.green_deduction,
            zone_buildable_areas,
            envelope,
        });
    }

    totals.commercial_avg_density = ledger.commercial.average_density();
    totals.residential_avg_density = ledger.residential.average_density();
    totals.commercial_buildable_area = ledger.commercial.buildable_area();
    totals.residential_buildable_area = ledger.residential.buildable_area();
    totals.incentive_area = if options.apply_efficiency_incentive {
        EFFICIENCY_INCENTIVE_RATE
            * (totals.commercial_buildable_area + totals.residential_buildable_area)
    } else {
        0.0
    };
    totals.total_buildable_area = totals.commercial_buildable_area
        + totals.residential_buildable_area
        + totals.incentive_area;

    debug!(
        plots = plots.len(),
        total_net_area = totals.total_net_area,
        total_buildable_area = totals.total_buildable_area,
        "portfolio aggregated"
    );

    Ok(LandUseResults {
        totals,
        envelope: envelope_totals,
        portfolio_green,
        plots: assessments,
    })
}

fn validate(plots: &[Plot], options: &CalculationOptions) -> Result<(), CalculationError> {
    for plot in plots {
        validate_plot_size(&plot.serial_number, plot.plot_size)?;
        if !plot.is_parceled {
            validate_road_deduction(&plot.serial_number, plot.road_deduction_percent)?;
        }
        validate_zones(plot)?;
        if let Some(envelope) = &plot.envelope {
            validate_envelope(&plot.serial_number, envelope)?;
        }
    }
    if options.green_allocation_method == GreenAllocationMethod::Custom {
        validate_custom_weights(plots.len(), &options.custom_green_allocations)?;
    }
    Ok(())
}

fn allocated_net_area(plot: &Plot, allocated_green: f64) -> NetArea {
    if plot.is_parceled {
        return NetArea::exempt(plot.plot_size);
    }
    let road_deduction = road_deduction(plot.plot_size, plot.road_deduction_percent);
    NetArea {
        net_plot_size: plot.plot_size - road_deduction - allocated_green,
        road_deduction,
        green_deduction: allocated_green,
    }
}
