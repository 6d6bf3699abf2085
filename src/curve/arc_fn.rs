use crate::error::{ArcTextError, Result};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Interpolation shape between two story components.
///
/// Closed set: an unrecognized name from the analysis collaborator is a fatal
/// `UnsupportedArcType` for the whole story, never a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcType {
    /// Instantaneous jump: constant `y2` over the whole domain
    StraightDrop,
    /// Staircase with `max(1, round(x2 - x1))` equal steps
    Step,
    Linear,
    /// Vertex at the start point, opens upward (slow start, fast finish)
    ConcaveUpIncreasing,
    /// Vertex at the end point, opens upward (fast drop, then flattens)
    ConcaveUpDecreasing,
    /// Vertex at the end point, opens downward (fast start, slow finish)
    ConcaveDownIncreasing,
    /// Vertex at the start point, opens downward (slow start, fast drop)
    ConcaveDownDecreasing,
    /// Two quadratic halves joined at the midpoint
    SCurve,
}

impl ArcType {
    /// Resolve an arc-type name as emitted by the story analysis step.
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        let arc_type = match normalized.as_str() {
            "straight_drop" | "drop" | "straight" => ArcType::StraightDrop,
            "step_by_step_increase" | "step_by_step_decrease" | "step" => ArcType::Step,
            "linear_increase" | "linear_decrease" | "linear" => ArcType::Linear,
            "concave_up_increasing" => ArcType::ConcaveUpIncreasing,
            "concave_up_decreasing" => ArcType::ConcaveUpDecreasing,
            "concave_down_increasing" => ArcType::ConcaveDownIncreasing,
            "concave_down_decreasing" => ArcType::ConcaveDownDecreasing,
            "s_curve_increase" | "s_curve_decrease" | "s_curve" => ArcType::SCurve,
            _ => return Err(ArcTextError::UnsupportedArcType(name.to_string())),
        };
        Ok(arc_type)
    }
}

/// One resolved piece of the emotional curve, spanning two consecutive
/// story components in the time/score domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub arc_type: ArcType,
}

impl ArcSegment {
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64, arc_type: ArcType) -> Self {
        Self {
            x1,
            x2,
            y1,
            y2,
            arc_type,
        }
    }

    pub fn domain_width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.x1 && x <= self.x2
    }

    /// Evaluate inside the segment domain; `None` outside it.
    pub fn eval(&self, x: f64) -> Option<f64> {
        if self.contains(x) {
            Some(self.eval_extrapolated(x))
        } else {
            None
        }
    }

    /// Evaluate the interpolation formula at any x, including beyond `x2`
    /// (used when a segment has to be lengthened to carry its text).
    pub fn eval_extrapolated(&self, x: f64) -> f64 {
        let w = self.domain_width();
        match self.arc_type {
            ArcType::StraightDrop => self.y2,
            ArcType::Step => {
                if w.abs() < f64::EPSILON {
                    return self.y2;
                }
                let num_steps = (w.round().abs().max(1.0)) as usize;
                let step_width = w / num_steps as f64;
                let step_height = (self.y2 - self.y1) / num_steps as f64;
                // tiny forward bias so x2 lands on the final tread, not one below
                let k = ((x - self.x1) / step_width + 1e-9).floor();
                self.y1 + k * step_height
            }
            ArcType::Linear => {
                if w.abs() < f64::EPSILON {
                    return self.y2;
                }
                self.y1 + (self.y2 - self.y1) / w * (x - self.x1)
            }
            ArcType::ConcaveUpIncreasing | ArcType::ConcaveDownDecreasing => {
                // vertex at (x1, y1)
                if w.abs() < f64::EPSILON {
                    return self.y2;
                }
                let t = (x - self.x1) / w;
                self.y1 + (self.y2 - self.y1) * t * t
            }
            ArcType::ConcaveUpDecreasing | ArcType::ConcaveDownIncreasing => {
                // vertex at (x2, y2)
                if w.abs() < f64::EPSILON {
                    return self.y2;
                }
                let t = (x - self.x2) / w;
                self.y2 + (self.y1 - self.y2) * t * t
            }
            ArcType::SCurve => {
                if w.abs() < f64::EPSILON {
                    return self.y2;
                }
                let xm = (self.x1 + self.x2) * 0.5;
                let ym = (self.y1 + self.y2) * 0.5;
                if x < xm {
                    // first half: vertex at (x1, y1)
                    let t = (x - self.x1) / (xm - self.x1);
                    self.y1 + (ym - self.y1) * t * t
                } else {
                    // second half: vertex at (x2, y2)
                    let t = (x - self.x2) / (xm - self.x2);
                    self.y2 + (ym - self.y2) * t * t
                }
            }
        }
    }
}
