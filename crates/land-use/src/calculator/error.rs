/// Plot data the engine refuses to compute. Aborts the whole calculation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidPlotError {
    #[error("plot {serial}: plot size must be a non-negative number, got {value}")]
    PlotSize { serial: String, value: f64 },
    #[error("plot {serial}: road deduction must be between 0 and 100 percent, got {value}")]
    RoadDeductionPercent { serial: String, value: f64 },
    #[error("plot {serial}, zone {zone}: zone percentage must be between 0 and 100, got {value}")]
    ZonePercentage {
        serial: String,
        zone: usize,
        value: f64,
    },
    #[error("plot {serial}, zone {zone}: density factor must be non-negative, got {value}")]
    DensityFactor {
        serial: String,
        zone: usize,
        value: f64,
    },
    #[error("plot {serial}: coverage percent must be between 0 and 100, got {value}")]
    CoveragePercent { serial: String, value: f64 },
    #[error("plot {serial}: floor height must be greater than 0, got {value}")]
    FloorHeight { serial: String, value: f64 },
    #[error("plot {serial}: maximum height must be a finite non-negative number, got {value}")]
    MaxHeight { serial: String, value: f64 },
    #[error("plot {serial}: floor count {value} exceeds the supported maximum of {max}")]
    FloorCount { serial: String, value: f64, max: u32 },
    #[error("plot {serial}: cost per extra floor must be non-negative, got {value}")]
    ExtraFloorCost { serial: String, value: f64 },
}

/// Inconsistent calculation options.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("custom green allocation expects {expected} weights (one per plot), got {actual}")]
    AllocationCountMismatch { expected: usize, actual: usize },
    #[error("custom green allocation weight {index} must be a non-negative number, got {value}")]
    InvalidAllocationWeight { index: usize, value: f64 },
    #[error("custom green allocation weights sum to zero while {green_total} m² must be allocated")]
    ZeroAllocationWeights { green_total: f64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("invalid plot: {0}")]
    InvalidPlot(#[from] InvalidPlotError),
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}
