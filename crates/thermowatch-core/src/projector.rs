//! Pure projections from a record snapshot to display data.
//!
//! Nothing here reads storage or holds state: every function takes the
//! current snapshot and returns the same answer for the same input.

use std::fmt;

use chrono::{Local, TimeZone};

use crate::generator::OperatingBand;
use crate::record::TemperatureRecord;

/// Value shown when there are no records yet.
pub const EMPTY_GAUGE_VALUE: f64 = 0.0;

/// Angle where the gauge arc starts (left end of the half circle).
pub const ARC_START_DEG: f64 = 180.0;

/// Label format for chart points: local time of day.
pub const CHART_LABEL_FORMAT: &str = "%H:%M:%S";

// ---------------------------------------------------------------------------
// Gauge
// ---------------------------------------------------------------------------

/// Clamped current value and its position in the gauge band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeState {
    /// Latest value, clamped into the band.
    pub value: f64,
    /// Position of `value` in the band, in `[0, 1]`.
    pub fill: f64,
}

impl GaugeState {
    pub fn arc(&self) -> ArcGeometry {
        ArcGeometry::from_fill(self.fill)
    }
}

/// Gauge reading for the latest record, or for `0` when there is none.
pub fn gauge_state(records: &[TemperatureRecord], band: &OperatingBand) -> GaugeState {
    let latest = records.last().map_or(EMPTY_GAUGE_VALUE, |r| r.value);
    let value = band.clamp(latest);
    GaugeState {
        value,
        fill: band.fraction(value),
    }
}

/// Half-circle arc for a fill fraction. Angles are in degrees, counter
/// clockwise from the positive x axis; the empty gauge points left (180°) and
/// the full gauge points right (0°).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub start_deg: f64,
    pub end_deg: f64,
    /// Always equal to `end_deg`.
    pub needle_deg: f64,
}

impl ArcGeometry {
    pub fn from_fill(fill: f64) -> Self {
        let fill = if fill.is_nan() { 0.0 } else { fill.clamp(0.0, 1.0) };
        let end_deg = ARC_START_DEG - fill * 180.0;
        Self {
            start_deg: ARC_START_DEG,
            end_deg,
            needle_deg: end_deg,
        }
    }

    /// Point at `angle_deg` on a circle of `radius` centred on the origin,
    /// with y pointing up.
    pub fn point_at(angle_deg: f64, radius: f64) -> (f64, f64) {
        let rad = angle_deg.to_radians();
        (radius * rad.cos(), radius * rad.sin())
    }

    /// Tip of the needle for a needle of length `radius`.
    pub fn needle_tip(&self, radius: f64) -> (f64, f64) {
        Self::point_at(self.needle_deg, radius)
    }

    /// `steps + 1` evenly spaced points along the active arc.
    pub fn active_arc_points(&self, radius: f64, steps: usize) -> Vec<(f64, f64)> {
        let steps = steps.max(1);
        let sweep = self.end_deg - self.start_deg;
        (0..=steps)
            .map(|i| {
                let angle = self.start_deg + sweep * (i as f64 / steps as f64);
                Self::point_at(angle, radius)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Chart dataset. An empty history is its own variant so renderers show a
/// placeholder instead of plotting nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSeries {
    Empty,
    Points(Vec<ChartPoint>),
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn points(&self) -> &[ChartPoint] {
        match self {
            Self::Empty => &[],
            Self::Points(points) => points,
        }
    }

    pub fn len(&self) -> usize {
        self.points().len()
    }

    /// Smallest and largest plotted value.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut values = self.points().iter().map(|p| p.value);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Chart dataset labelled in the machine's local time zone.
pub fn chart_series(records: &[TemperatureRecord]) -> ChartSeries {
    chart_series_in(records, &Local)
}

/// Chart dataset labelled in `tz`.
pub fn chart_series_in<Tz>(records: &[TemperatureRecord], tz: &Tz) -> ChartSeries
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if records.is_empty() {
        return ChartSeries::Empty;
    }
    ChartSeries::Points(
        records
            .iter()
            .map(|r| ChartPoint {
                label: r
                    .date
                    .with_timezone(tz)
                    .format(CHART_LABEL_FORMAT)
                    .to_string(),
                value: r.value,
            })
            .collect(),
    )
}
