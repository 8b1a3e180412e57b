use crate::routes::{build_response, CalculationRequest, CalculationResponse};
use chrono::NaiveDate;
use clap::Args;
use land_use::config::AppConfig;
use land_use::error::AppError;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// JSON request document with a `plots` list and optional option overrides
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Apply the 5% efficiency incentive regardless of the document
    #[arg(long)]
    pub(crate) incentive: bool,
    /// Total land price, used to report price per buildable m²
    #[arg(long)]
    pub(crate) total_price: Option<f64>,
    /// Project name printed in the report header
    #[arg(long)]
    pub(crate) project_name: Option<String>,
    /// Report date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) prepared_on: Option<NaiveDate>,
    /// Include the per-zone breakdown
    #[arg(long)]
    pub(crate) list_zones: bool,
}

pub(crate) fn run_calculation(args: CalculateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let reader = BufReader::new(File::open(&args.input)?);
    let request: CalculationRequest = serde_json::from_reader(reader)?;
    let request = apply_overrides(request, &args);

    let response = build_response(request, &config.calculator)?;
    print!("{}", render_report(&response, args.list_zones));
    Ok(())
}

fn apply_overrides(mut request: CalculationRequest, args: &CalculateArgs) -> CalculationRequest {
    if args.incentive {
        request.apply_efficiency_incentive = Some(true);
    }
    if args.total_price.is_some() {
        request.total_price = args.total_price;
    }
    if args.project_name.is_some() {
        request.project_name = args.project_name.clone();
    }
    if args.prepared_on.is_some() {
        request.prepared_on = args.prepared_on;
    }
    request
}

pub(crate) fn render_report(response: &CalculationResponse, list_zones: bool) -> String {
    let summary = &response.summary;
    let mut out = String::new();

    out.push_str("Density analysis report\n");
    if let Some(name) = &response.project_name {
        out.push_str(&format!("Project: {name}\n"));
    }
    out.push_str(&format!("Prepared on {}\n", response.prepared_on));

    out.push_str("\nSummary\n");
    out.push_str(&format!(
        "- Total net land area: {} m²\n",
        summary.total_net_area
    ));
    out.push_str(&format!(
        "- Total deductions: {} m² (road {} m², public green {} m²)\n",
        summary.total_deductions, summary.total_road_deduction, summary.total_green_deduction
    ));
    out.push_str(&format!(
        "- Weighted density: commercial {}%, residential {}%\n",
        summary.commercial_avg_density, summary.residential_avg_density
    ));
    out.push_str(&format!(
        "- Buildable area: commercial {} m², residential {} m², incentive {} m²\n",
        summary.commercial_buildable_area,
        summary.residential_buildable_area,
        summary.incentive_area
    ));
    out.push_str(&format!(
        "- Total buildable area: {} m²\n",
        summary.total_buildable_area
    ));
    if let Some(price) = response.price_per_buildable_area {
        out.push_str(&format!("- Price per buildable area: {price:.2}\n"));
    }
    if summary.plots.iter().any(|row| row.max_floors.is_some()) {
        out.push_str(&format!(
            "- Coverage: {} m² over {} floors, extra floor cost {}\n",
            summary.total_coverage_area, summary.total_max_floors, summary.total_extra_floors_cost
        ));
    }

    out.push_str("\nPlot breakdown\n");
    for row in &summary.plots {
        let parceled_note = if row.is_parceled { " (parceled)" } else { "" };
        out.push_str(&format!(
            "- {}{}: size {} | road {} | green {} | net {}\n",
            row.serial_number,
            parceled_note,
            row.plot_size,
            row.road_deduction,
            row.green_deduction,
            row.net_plot_size
        ));
    }

    if list_zones {
        out.push_str("\nZone breakdown\n");
        for row in &summary.zones {
            out.push_str(&format!(
                "- {} {} | {}% | density {}% | {} ({}) | buildable {} m²\n",
                row.serial_number,
                row.zone_label,
                row.percentage,
                row.density_factor,
                row.density_type,
                row.classification_label,
                row.buildable_area
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use land_use::calculator::{Plot, Zone};
    use land_use::config::CalculatorDefaults;

    fn args() -> CalculateArgs {
        CalculateArgs {
            input: PathBuf::from("plots.json"),
            incentive: true,
            total_price: Some(1_000_000.0),
            project_name: None,
            prepared_on: NaiveDate::from_ymd_opt(2025, 3, 14),
            list_zones: true,
        }
    }

    fn request() -> CalculationRequest {
        CalculationRequest {
            plots: vec![
                Plot::new("Plot-1", 1000.0)
                    .with_road_deduction(10.0)
                    .with_zone(Zone::residential(100.0, 50.0)),
                Plot::new("Plot-2", 600.0)
                    .parceled()
                    .with_zone(Zone::new(100.0, 40.0, "Mixed")),
            ],
            project_name: Some("Harbour Quarter".to_string()),
            apply_efficiency_incentive: Some(false),
            ..CalculationRequest::default()
        }
    }

    #[test]
    fn cli_flags_override_document_values() {
        let request = apply_overrides(request(), &args());
        assert_eq!(request.apply_efficiency_incentive, Some(true));
        assert_eq!(request.total_price, Some(1_000_000.0));
        assert_eq!(request.project_name.as_deref(), Some("Harbour Quarter"));
    }

    #[test]
    fn report_lists_plots_and_zones() {
        let request = apply_overrides(request(), &args());
        let response =
            build_response(request, &CalculatorDefaults::default()).expect("report builds");
        let report = render_report(&response, true);

        assert!(report.contains("Project: Harbour Quarter"));
        assert!(report.contains("Prepared on 2025-03-14"));
        assert!(report.contains("- Plot-1: size 1000 | road 100 | green 45 | net 855"));
        assert!(report.contains("- Plot-2 (parceled): size 600"));
        assert!(report.contains("Plot-2 Zone 1 | 100% | density 40% | Mixed (Unclassified)"));
        assert!(report.contains("- Total buildable area: 449 m²"));
        assert!(!report.contains("Coverage:"));
    }
}
