use super::deduction::is_percentage;
use super::domain::{DensityClass, Plot};
use super::error::InvalidPlotError;

/// Area-weighted density accumulator for one classification.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct DensityBucket {
    pub(crate) area: f64,
    pub(crate) density_sum: f64,
}

impl DensityBucket {
    pub(crate) fn add(&mut self, zone_area: f64, density_factor: f64) {
        self.area += zone_area;
        self.density_sum += zone_area * density_factor;
    }

    /// Weighted by zone area, not a plain mean of the zone factors.
    pub(crate) fn average_density(&self) -> f64 {
        if self.area > 0.0 {
            self.density_sum / self.area
        } else {
            0.0
        }
    }

    pub(crate) fn buildable_area(&self) -> f64 {
        self.area * self.average_density() / 100.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DensityLedger {
    pub(crate) commercial: DensityBucket,
    pub(crate) residential: DensityBucket,
}

impl DensityLedger {
    pub(crate) fn record(&mut self, class: DensityClass, zone_area: f64, density_factor: f64) {
        match class {
            DensityClass::Commercial => self.commercial.add(zone_area, density_factor),
            DensityClass::Residential => self.residential.add(zone_area, density_factor),
            DensityClass::Unclassified => {}
        }
    }
}

/// Share of the plot's net area assigned to a zone and the floor area it permits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ZoneYield {
    pub(crate) zone_area: f64,
    pub(crate) buildable_area: f64,
}

pub(crate) fn zone_yield(net_plot_size: f64, percentage: f64, density_factor: f64) -> ZoneYield {
    let zone_area = net_plot_size * percentage / 100.0;
    ZoneYield {
        zone_area,
        buildable_area: zone_area * density_factor / 100.0,
    }
}

pub(crate) fn validate_zones(plot: &Plot) -> Result<(), InvalidPlotError> {
    for (index, zone) in plot.zones.iter().enumerate() {
        if !is_percentage(zone.percentage) {
            return Err(InvalidPlotError::ZonePercentage {
                serial: plot.serial_number.clone(),
                zone: index + 1,
                value: zone.percentage,
            });
        }
        if !zone.density_factor.is_finite() || zone.density_factor < 0.0 {
            return Err(InvalidPlotError::DensityFactor {
                serial: plot.serial_number.clone(),
                zone: index + 1,
                value: zone.density_factor,
            });
        }
    }
    Ok(())
}
