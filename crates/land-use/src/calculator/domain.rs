use serde::{Deserialize, Serialize};

/// One parcel of land under analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plot {
    pub serial_number: String,
    pub plot_size: f64,
    #[serde(default)]
    pub is_parceled: bool,
    #[serde(default)]
    pub road_deduction_percent: f64,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<BuildingEnvelope>,
}

impl Plot {
    pub fn new(serial_number: impl Into<String>, plot_size: f64) -> Self {
        Self {
            serial_number: serial_number.into(),
            plot_size,
            is_parceled: false,
            road_deduction_percent: 0.0,
            zones: Vec::new(),
            envelope: None,
        }
    }

    pub fn parceled(mut self) -> Self {
        self.is_parceled = true;
        self
    }

    pub fn with_road_deduction(mut self, percent: f64) -> Self {
        self.road_deduction_percent = percent;
        self
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    pub fn with_envelope(mut self, envelope: BuildingEnvelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn zone_percentage_total(&self) -> f64 {
        self.zones.iter().map(|zone| zone.percentage).sum()
    }

    /// Zones claiming more than the whole net area. Still computed, only reported.
    pub fn is_over_allocated(&self) -> bool {
        self.zone_percentage_total() > 100.0
    }
}

/// Percentage sub-allocation of a plot's net area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Zone {
    pub percentage: f64,
    pub density_factor: f64,
    pub density_type: String,
}

impl Zone {
    pub fn new(percentage: f64, density_factor: f64, density_type: impl Into<String>) -> Self {
        Self {
            percentage,
            density_factor,
            density_type: density_type.into(),
        }
    }

    pub fn commercial(percentage: f64, density_factor: f64) -> Self {
        Self::new(percentage, density_factor, "Commercial")
    }

    pub fn residential(percentage: f64, density_factor: f64) -> Self {
        Self::new(percentage, density_factor, "Residential")
    }

    pub fn classification(&self) -> DensityClass {
        DensityClass::from_label(&self.density_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityClass {
    Commercial,
    Residential,
    /// Free-text types outside the two buckets; excluded from portfolio density totals.
    Unclassified,
}

impl DensityClass {
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "commercial" => Self::Commercial,
            "residential" => Self::Residential,
            _ => Self::Unclassified,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Commercial => "Commercial",
            Self::Residential => "Residential",
            Self::Unclassified => "Unclassified",
        }
    }
}

/// Optional coverage and height limits used for the floor-count extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildingEnvelope {
    pub coverage_percent: f64,
    pub max_height: f64,
    pub floor_height: f64,
    #[serde(default)]
    pub allow_extra_floors: bool,
    #[serde(default)]
    pub extra_floors: u32,
    #[serde(default)]
    pub cost_per_extra_floor: f64,
}

impl BuildingEnvelope {
    pub fn new(coverage_percent: f64, max_height: f64, floor_height: f64) -> Self {
        Self {
            coverage_percent,
            max_height,
            floor_height,
            allow_extra_floors: false,
            extra_floors: 0,
            cost_per_extra_floor: 0.0,
        }
    }

    pub fn with_extra_floors(mut self, extra_floors: u32, cost_per_extra_floor: f64) -> Self {
        self.allow_extra_floors = true;
        self.extra_floors = extra_floors;
        self.cost_per_extra_floor = cost_per_extra_floor;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_class_is_case_insensitive() {
        assert_eq!(DensityClass::from_label("Commercial"), DensityClass::Commercial);
        assert_eq!(DensityClass::from_label("RESIDENTIAL"), DensityClass::Residential);
        assert_eq!(DensityClass::from_label(" residential "), DensityClass::Residential);
        assert_eq!(DensityClass::from_label("Mixed"), DensityClass::Unclassified);
        assert_eq!(DensityClass::from_label(""), DensityClass::Unclassified);
    }

    #[test]
    fn over_allocation_is_detected_above_one_hundred_percent() {
        let plot = Plot::new("P-1", 1000.0)
            .with_zone(Zone::residential(60.0, 50.0))
            .with_zone(Zone::commercial(40.0, 80.0));
        assert_eq!(plot.zone_percentage_total(), 100.0);
        assert!(!plot.is_over_allocated());

        let plot = plot.with_zone(Zone::commercial(5.0, 80.0));
        assert!(plot.is_over_allocated());
    }

    #[test]
    fn plot_deserializes_with_defaults_for_optional_fields() {
        let plot: Plot = serde_json::from_str(
            r#"{"serial_number":"Plot-1","plot_size":1000.0,"zones":[{"percentage":100,"density_factor":50,"density_type":"Residential"}]}"#,
        )
        .expect("plot parses");

        assert!(!plot.is_parceled);
        assert_eq!(plot.road_deduction_percent, 0.0);
        assert!(plot.envelope.is_none());
        assert_eq!(plot.zones[0].classification(), DensityClass::Residential);
    }

    #[test]
    fn plot_rejects_unknown_shape() {
        let error = serde_json::from_str::<Plot>(r#"{"serial_number":"Plot-1"}"#)
            .expect_err("plot_size is required");
        assert!(error.to_string().contains("plot_size"));

        let error = serde_json::from_str::<Plot>(
            r#"{"serial_number":"P","plot_size":1000.0,"road_deduction_pct":10.0,"parceled":true}"#,
        )
        .expect_err("misspelled fields are not silently defaulted");
        assert!(error.to_string().contains("road_deduction_pct"));
    }

    #[test]
    fn nested_records_reject_extra_keys() {
        let zone = serde_json::from_str::<Zone>(
            r#"{"percentage":100,"density_factor":50,"density_type":"Residential","density":60}"#,
        );
        assert!(zone.is_err());

        let envelope = serde_json::from_str::<BuildingEnvelope>(
            r#"{"coverage_percent":40,"max_height":12,"floor_height":3,"extra_floor":2}"#,
        );
        assert!(envelope.is_err());
    }
}
