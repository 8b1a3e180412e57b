use super::views::{PlotBreakdownRow, PortfolioSummary, ZoneBreakdownRow};
use crate::calculator::{LandUseResults, PlotAssessment};

/// Nearest whole m², halves rounded away from zero.
pub fn round_area(value: f64) -> i64 {
    value.round() as i64
}

/// Caller-side price per m² of buildable area; 0 when nothing is buildable.
pub fn price_per_buildable_area(total_price: f64, total_buildable_area: f64) -> f64 {
    if total_buildable_area > 0.0 {
        total_price / total_buildable_area
    } else {
        0.0
    }
}

impl LandUseResults {
    pub fn summary(&self) -> PortfolioSummary {
        let totals = &self.totals;
        let plots = self.plots.iter().map(PlotAssessment::breakdown_row).collect();
        let zones = self
            .plots
            .iter()
            .flat_map(PlotAssessment::zone_rows)
            .collect();

        PortfolioSummary {
            total_net_area: round_area(totals.total_net_area),
            total_road_deduction: round_area(totals.total_road_deduction),
            total_green_deduction: round_area(totals.total_green_deduction),
            total_deductions: round_area(totals.total_road_deduction + totals.total_green_deduction),
            commercial_avg_density: round_area(totals.commercial_avg_density),
            residential_avg_density: round_area(totals.residential_avg_density),
            commercial_buildable_area: round_area(totals.commercial_buildable_area),
            residential_buildable_area: round_area(totals.residential_buildable_area),
            incentive_area: round_area(totals.incentive_area),
            total_buildable_area: round_area(totals.total_buildable_area),
            total_coverage_area: round_area(self.envelope.total_coverage_area),
            total_max_floors: self.envelope.total_max_floors,
            total_extra_floors_cost: round_area(self.envelope.total_extra_floors_cost),
            plots,
            zones,
        }
    }
}

impl PlotAssessment {
    pub fn breakdown_row(&self) -> PlotBreakdownRow {
        PlotBreakdownRow {
            serial_number: self.plot.serial_number.clone(),
            is_parceled: self.plot.is_parceled,
            plot_size: round_area(self.plot.plot_size),
            road_deduction: round_area(self.road_deduction),
            green_deduction: round_area(self.green_deduction),
            net_plot_size: round_area(self.net_plot_size),
            coverage_area: self.envelope.map(|outcome| round_area(outcome.coverage_area)),
            max_floors: self.envelope.map(|outcome| outcome.max_floors),
            extra_floors_cost: self
                .envelope
                .map(|outcome| round_area(outcome.extra_floors_cost)),
            max_buildable_area: self
                .envelope
                .map(|outcome| round_area(outcome.max_buildable_area)),
        }
    }

    pub fn zone_rows(&self) -> Vec<ZoneBreakdownRow> {
        self.plot
            .zones
            .iter()
            .zip(&self.zone_buildable_areas)
            .enumerate()
            .map(|(index, (zone, buildable))| {
                let classification = zone.classification();
                ZoneBreakdownRow {
                    serial_number: self.plot.serial_number.clone(),
                    zone_label: format!("Zone {}", index + 1),
                    percentage: zone.percentage,
                    density_factor: zone.density_factor,
                    density_type: zone.density_type.clone(),
                    classification,
                    classification_label: classification.label(),
                    buildable_area: round_area(*buildable),
                }
            })
            .collect()
    }
}
