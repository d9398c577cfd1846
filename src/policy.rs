//! Business constants for scheduling and travel estimation.
//!
//! Defaults reflect the inspection planning rules; every value can be
//! overridden by constructing the struct directly.

use crate::model::ClockTime;

/// Earliest clock time any worker is scheduled from (09:00).
pub const DAY_START_MINUTES: u32 = 9 * 60;

/// End of the working day used to close the last free interval (17:00).
pub const DAY_END_MINUTES: u32 = 17 * 60;

/// Appointment start times are rounded up to this step.
pub const ROUNDING_STEP_MINUTES: u32 = 5;

/// Free intervals between locked stops of this length or shorter are unusable.
pub const MIN_GAP_MINUTES: u32 = 15;

/// Buffer added after a worker's latest existing shift.
pub const SHIFT_BUFFER_MINUTES: u32 = 15;

/// Largest stop count solved by exhaustive search.
pub const BRUTE_FORCE_LIMIT: usize = 7;

/// Service duration used when the task directory has none.
pub const DEFAULT_TASK_MINUTES: u32 = 45;

/// Straight-line to road distance factor.
pub const ROAD_FACTOR: f64 = 1.3;

/// Travel between distinct points never takes less than this.
pub const MIN_TRAVEL_MINUTES: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingPolicy {
    pub day_start: ClockTime,
    pub day_end: ClockTime,
    pub rounding_step_minutes: u32,
    /// Gaps between locked stops must be strictly longer than this.
    pub min_gap_minutes: u32,
    pub shift_buffer_minutes: u32,
    pub brute_force_limit: usize,
    pub default_task_minutes: u32,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            day_start: ClockTime::from_minutes(DAY_START_MINUTES),
            day_end: ClockTime::from_minutes(DAY_END_MINUTES),
            rounding_step_minutes: ROUNDING_STEP_MINUTES,
            min_gap_minutes: MIN_GAP_MINUTES,
            shift_buffer_minutes: SHIFT_BUFFER_MINUTES,
            brute_force_limit: BRUTE_FORCE_LIMIT,
            default_task_minutes: DEFAULT_TASK_MINUTES,
        }
    }
}

/// Upper distance bound (great-circle km) of a speed tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedTier {
    pub up_to_km: f64,
    pub speed_kmh: f64,
}

/// Parameters of the straight-line travel estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatePolicy {
    pub road_factor: f64,
    pub min_travel_minutes: f64,
    /// Checked in order; the first tier whose bound covers the distance wins.
    pub speed_tiers: Vec<SpeedTier>,
    /// Speed beyond the last tier.
    pub open_road_kmh: f64,
}

impl Default for EstimatePolicy {
    fn default() -> Self {
        Self {
            road_factor: ROAD_FACTOR,
            min_travel_minutes: MIN_TRAVEL_MINUTES,
            speed_tiers: vec![
                SpeedTier { up_to_km: 8.0, speed_kmh: 25.0 },
                SpeedTier { up_to_km: 20.0, speed_kmh: 35.0 },
            ],
            open_road_kmh: 65.0,
        }
    }
}

impl EstimatePolicy {
    pub fn speed_for(&self, km: f64) -> f64 {
        self.speed_tiers
            .iter()
            .find(|tier| km <= tier.up_to_km)
            .map(|tier| tier.speed_kmh)
            .unwrap_or(self.open_road_kmh)
    }
}
