use crate::calculator::DensityClass;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotBreakdownRow {
    pub serial_number: String,
    pub is_parceled: bool,
    pub plot_size: i64,
    pub road_deduction: i64,
    pub green_deduction: i64,
    pub net_plot_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_area: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_floors: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_floors_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_buildable_area: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneBreakdownRow {
    pub serial_number: String,
    pub zone_label: String,
    pub percentage: f64,
    pub density_factor: f64,
    pub density_type: String,
    pub classification: DensityClass,
    pub classification_label: &'static str,
    pub buildable_area: i64,
}

/// Whole-unit view of a calculation, ready for rendering or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_net_area: i64,
    pub total_road_deduction: i64,
    pub total_green_deduction: i64,
    pub total_deductions: i64,
    pub commercial_avg_density: i64,
    pub residential_avg_density: i64,
    pub commercial_buildable_area: i64,
    pub residential_buildable_area: i64,
    pub incentive_area: i64,
    pub total_buildable_area: i64,
    pub total_coverage_area: i64,
    pub total_max_floors: u64,
    pub total_extra_floors_cost: i64,
    pub plots: Vec<PlotBreakdownRow>,
    pub zones: Vec<ZoneBreakdownRow>,
}
