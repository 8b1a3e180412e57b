use super::error::InvalidPlotError;
use super::green::green_area_rate;
use serde::Serialize;

pub(crate) const UNNAMED_PLOT: &str = "unnamed";

/// Road and green deductions for a single plot and the net land left after them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetArea {
    pub net_plot_size: f64,
    pub road_deduction: f64,
    pub green_deduction: f64,
}

impl NetArea {
    pub(crate) fn exempt(plot_size: f64) -> Self {
        Self {
            net_plot_size: plot_size,
            road_deduction: 0.0,
            green_deduction: 0.0,
        }
    }

    pub fn rounded(self) -> Self {
        Self {
            net_plot_size: self.net_plot_size.round(),
            road_deduction: self.road_deduction.round(),
            green_deduction: self.green_deduction.round(),
        }
    }
}

/// Net buildable land for one plot, with the green rate looked up on the
/// area left after the road deduction.
///
/// Parceled plots are exempt from both deductions. Values are unrounded;
/// call [`NetArea::rounded`] for display.
pub fn net_area(
    plot_size: f64,
    is_parceled: bool,
    road_deduction_percent: f64,
) -> Result<NetArea, InvalidPlotError> {
    validate_plot_size(UNNAMED_PLOT, plot_size)?;
    if is_parceled {
        return Ok(NetArea::exempt(plot_size));
    }
    validate_road_deduction(UNNAMED_PLOT, road_deduction_percent)?;

    let road_deduction = road_deduction(plot_size, road_deduction_percent);
    let area_after_road = plot_size - road_deduction;
    let green_deduction = area_after_road * green_area_rate(area_after_road) / 100.0;

    Ok(NetArea {
        net_plot_size: area_after_road - green_deduction,
        road_deduction,
        green_deduction,
    })
}

pub(crate) fn road_deduction(plot_size: f64, road_deduction_percent: f64) -> f64 {
    plot_size * road_deduction_percent / 100.0
}

pub(crate) fn validate_plot_size(serial: &str, value: f64) -> Result<(), InvalidPlotError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InvalidPlotError::PlotSize {
            serial: serial.to_string(),
            value,
        })
    }
}

pub(crate) fn validate_road_deduction(serial: &str, value: f64) -> Result<(), InvalidPlotError> {
    if is_percentage(value) {
        Ok(())
    } else {
        Err(InvalidPlotError::RoadDeductionPercent {
            serial: serial.to_string(),
            value,
        })
    }
}

pub(crate) fn is_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deducts_road_then_green_on_remaining_area() {
        let area = net_area(1000.0, false, 10.0).expect("valid plot");
        assert_eq!(area.road_deduction, 100.0);
        assert_eq!(area.green_deduction, 45.0);
        assert_eq!(area.net_plot_size, 855.0);
    }

    #[test]
    fn green_band_follows_post_road_area() {
        // 1600 m² before road, 1440 m² after: 5% band rather than 10%.
        let area = net_area(1600.0, false, 10.0).expect("valid plot");
        assert_eq!(area.road_deduction, 160.0);
        assert!((area.green_deduction - 72.0).abs() < 1e-9);
        assert!((area.net_plot_size - 1368.0).abs() < 1e-9);
    }

    #[test]
    fn parceled_plots_skip_deductions_regardless_of_road_percent() {
        for percent in [0.0, 10.0, 100.0, 250.0] {
            let area = net_area(3200.0, true, percent).expect("parceled plot");
            assert_eq!(area, NetArea::exempt(3200.0));
        }
    }

    #[test]
    fn small_plots_have_no_green_deduction() {
        let area = net_area(700.0, false, 0.0).expect("valid plot");
        assert_eq!(area.green_deduction, 0.0);
        assert_eq!(area.net_plot_size, 700.0);
    }

    #[test]
    fn rounding_is_applied_per_field() {
        let area = net_area(1234.0, false, 7.0).expect("valid plot");
        let rounded = area.rounded();
        assert_eq!(rounded.road_deduction, 86.0);
        assert_eq!(rounded.green_deduction, 57.0);
        assert_eq!(rounded.net_plot_size, 1090.0);
    }

    #[test]
    fn rejects_negative_size_and_out_of_range_percent() {
        assert!(matches!(
            net_area(-1.0, false, 10.0),
            Err(InvalidPlotError::PlotSize { .. })
        ));
        assert!(matches!(
            net_area(f64::NAN, true, 10.0),
            Err(InvalidPlotError::PlotSize { .. })
        ));
        assert!(matches!(
            net_area(1000.0, false, 100.5),
            Err(InvalidPlotError::RoadDeductionPercent { .. })
        ));
        assert!(matches!(
            net_area(1000.0, false, -0.1),
            Err(InvalidPlotError::RoadDeductionPercent { .. })
        ));
    }
}
