use super::deduction::{is_percentage, UNNAMED_PLOT};
use super::domain::BuildingEnvelope;
use super::error::InvalidPlotError;
use serde::Serialize;

/// Coverage and floor limits derived for one plot. Independent of zoning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvelopeOutcome {
    pub coverage_area: f64,
    pub max_floors: u32,
    pub extra_floors_cost: f64,
    pub max_buildable_area: f64,
}

pub fn coverage_area(net_plot_size: f64, coverage_percent: f64) -> Result<f64, InvalidPlotError> {
    if !is_percentage(coverage_percent) {
        return Err(InvalidPlotError::CoveragePercent {
            serial: UNNAMED_PLOT.to_string(),
            value: coverage_percent,
        });
    }
    Ok(net_plot_size * coverage_percent / 100.0)
}

/// Whole floors that fit under `max_height`.
pub fn max_floors(max_height: f64, floor_height: f64) -> Result<u32, InvalidPlotError> {
    validate_heights(UNNAMED_PLOT, max_height, floor_height)?;
    base_floors(UNNAMED_PLOT, max_height, floor_height)
}

pub fn extra_floors_cost(extra_floors: u32, cost_per_extra_floor: f64) -> f64 {
    f64::from(extra_floors) * cost_per_extra_floor
}

fn validate_heights(
    serial: &str,
    max_height: f64,
    floor_height: f64,
) -> Result<(), InvalidPlotError> {
    if floor_height.is_nan() || floor_height <= 0.0 {
        return Err(InvalidPlotError::FloorHeight {
            serial: serial.to_string(),
            value: floor_height,
        });
    }
    if !max_height.is_finite() || max_height < 0.0 {
        return Err(InvalidPlotError::MaxHeight {
            serial: serial.to_string(),
            value: max_height,
        });
    }
    Ok(())
}

fn base_floors(serial: &str, max_height: f64, floor_height: f64) -> Result<u32, InvalidPlotError> {
    let floors = (max_height / floor_height).floor();
    if floors > f64::from(u32::MAX) {
        return Err(InvalidPlotError::FloorCount {
            serial: serial.to_string(),
            value: floors,
            max: u32::MAX,
        });
    }
    Ok(floors as u32)
}

/// Base floors plus any permitted extra floors. Heights must already be valid.
fn floor_count(serial: &str, envelope: &BuildingEnvelope) -> Result<u32, InvalidPlotError> {
    let base = base_floors(serial, envelope.max_height, envelope.floor_height)?;
    if !grants_extra_floors(envelope) {
        return Ok(base);
    }
    base.checked_add(envelope.extra_floors)
        .ok_or_else(|| InvalidPlotError::FloorCount {
            serial: serial.to_string(),
            value: f64::from(base) + f64::from(envelope.extra_floors),
            max: u32::MAX,
        })
}

fn grants_extra_floors(envelope: &BuildingEnvelope) -> bool {
    envelope.allow_extra_floors && envelope.extra_floors > 0
}

pub(crate) fn validate_envelope(
    serial: &str,
    envelope: &BuildingEnvelope,
) -> Result<(), InvalidPlotError> {
    if !is_percentage(envelope.coverage_percent) {
        return Err(InvalidPlotError::CoveragePercent {
            serial: serial.to_string(),
            value: envelope.coverage_percent,
        });
    }
    validate_heights(serial, envelope.max_height, envelope.floor_height)?;
    if envelope.cost_per_extra_floor.is_nan() || envelope.cost_per_extra_floor < 0.0 {
        return Err(InvalidPlotError::ExtraFloorCost {
            serial: serial.to_string(),
            value: envelope.cost_per_extra_floor,
        });
    }
    floor_count(serial, envelope).map(|_| ())
}

pub(crate) fn evaluate_envelope(
    serial: &str,
    net_plot_size: f64,
    envelope: &BuildingEnvelope,
) -> Result<EnvelopeOutcome, InvalidPlotError> {
    validate_envelope(serial, envelope)?;
    let coverage_area = net_plot_size * envelope.coverage_percent / 100.0;
    let max_floors = floor_count(serial, envelope)?;
    let extra_floors_cost = if grants_extra_floors(envelope) {
        extra_floors_cost(envelope.extra_floors, envelope.cost_per_extra_floor)
    } else {
        0.0
    };

    Ok(EnvelopeOutcome {
        coverage_area,
        max_floors,
        extra_floors_cost,
        max_buildable_area: coverage_area * f64::from(max_floors),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_is_share_of_net_area() {
        assert_eq!(coverage_area(855.0, 40.0).expect("valid coverage"), 342.0);
        assert!(matches!(
            coverage_area(855.0, 101.0),
            Err(InvalidPlotError::CoveragePercent { .. })
        ));
    }

    #[test]
    fn floors_round_down_to_whole_storeys() {
        assert_eq!(max_floors(10.0, 3.0).expect("valid heights"), 3);
        assert_eq!(max_floors(9.0, 3.0).expect("valid heights"), 3);
        assert_eq!(max_floors(2.9, 3.0).expect("valid heights"), 0);
        assert!(matches!(
            max_floors(10.0, 0.0),
            Err(InvalidPlotError::FloorHeight { .. })
        ));
    }

    #[test]
    fn extra_floors_apply_only_when_allowed() {
        let envelope = BuildingEnvelope::new(50.0, 12.0, 3.0);
        let outcome = evaluate_envelope("P-1", 1000.0, &envelope).expect("valid envelope");
        assert_eq!(outcome.max_floors, 4);
        assert_eq!(outcome.extra_floors_cost, 0.0);
        assert_eq!(outcome.max_buildable_area, 2000.0);

        let mut disabled = envelope.clone().with_extra_floors(2, 15_000.0);
        disabled.allow_extra_floors = false;
        let outcome = evaluate_envelope("P-1", 1000.0, &disabled).expect("valid envelope");
        assert_eq!(outcome.max_floors, 4);

        let enabled = envelope.with_extra_floors(2, 15_000.0);
        let outcome = evaluate_envelope("P-1", 1000.0, &enabled).expect("valid envelope");
        assert_eq!(outcome.max_floors, 6);
        assert_eq!(outcome.extra_floors_cost, 30_000.0);
        assert_eq!(outcome.max_buildable_area, 3000.0);
    }

    #[test]
    fn errors_name_the_plot() {
        let envelope = BuildingEnvelope::new(50.0, 12.0, -1.0);
        let error = evaluate_envelope("P-7", 1000.0, &envelope).expect_err("bad floor height");
        assert_eq!(
            error,
            InvalidPlotError::FloorHeight {
                serial: "P-7".to_string(),
                value: -1.0,
            }
        );
        assert!(error.to_string().contains("P-7"));
    }

    #[test]
    fn unbounded_heights_are_rejected() {
        assert!(matches!(
            max_floors(f64::INFINITY, 3.0),
            Err(InvalidPlotError::MaxHeight { .. })
        ));
        assert!(matches!(
            max_floors(5.0e9, 1.0),
            Err(InvalidPlotError::FloorCount { .. })
        ));
        assert_eq!(max_floors(4.0e9, 1.0).expect("fits in u32"), 4_000_000_000);
    }

    #[test]
    fn extra_floors_past_the_limit_are_an_error() {
        let at_limit = BuildingEnvelope::new(50.0, f64::from(u32::MAX), 1.0);
        let outcome = evaluate_envelope("P-9", 10.0, &at_limit).expect("base floors fit");
        assert_eq!(outcome.max_floors, u32::MAX);

        let over = at_limit.with_extra_floors(1, 10.0);
        let error = evaluate_envelope("P-9", 10.0, &over).expect_err("floor count overflows");
        assert!(matches!(
            error,
            InvalidPlotError::FloorCount { ref serial, .. } if serial == "P-9"
        ));

        let tall = BuildingEnvelope::new(50.0, 5.0e9, 1.0).with_extra_floors(1, 10.0);
        assert!(matches!(
            validate_envelope("P-10", &tall),
            Err(InvalidPlotError::FloorCount { .. })
        ));
    }
}
