use crate::{
    constants::{SCORE_MAX, SCORE_MIN, TIME_MAX, TIME_MIN},
    curve::{ArcSegment, ArcType},
    error::{ArcTextError, Result},
};
use serde::{Deserialize, Serialize};

/// One story component as produced by the external analysis step.
///
/// The first component of a story carries only the starting point
/// (`end_time == 0`, no arc type or descriptor). `arc_x_values` /
/// `arc_y_values` are the persisted geometry cache: written back after a
/// committed placement pass so later pipeline stages reuse the exact same
/// curve instead of recomputing it with possibly different nudge outcomes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoryComponent {
    pub end_time: f64,
    pub end_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_x_values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_y_values: Option<Vec<f64>>,
}

/// An arc segment together with the text assigned to it.
#[derive(Debug, Clone)]
pub struct ResolvedSegment {
    pub segment: ArcSegment,
    pub descriptor: Option<String>,
    /// Index of the component that ends this segment
    pub component_index: usize,
}

fn invalid(message: String) -> ArcTextError {
    ArcTextError::InvalidStory { message }
}

/// Validate a component sequence and resolve each consecutive pair into an
/// arc segment. `UnsupportedArcType` aborts the whole story; there is no
/// per-segment fallback shape.
pub fn resolve_segments(components: &[StoryComponent]) -> Result<Vec<ResolvedSegment>> {
    if components.len() < 2 {
        return Err(invalid(format!(
            "a story needs at least 2 components, got {}",
            components.len()
        )));
    }

    let first = &components[0];
    if first.end_time.abs() > 1e-9 {
        return Err(invalid(format!(
            "first component must start the timeline at {TIME_MIN}, got {}",
            first.end_time
        )));
    }

    for (i, c) in components.iter().enumerate() {
        if !(TIME_MIN..=TIME_MAX).contains(&c.end_time) {
            return Err(invalid(format!(
                "component {i}: end_time {} outside [{TIME_MIN}, {TIME_MAX}]",
                c.end_time
            )));
        }
        if !(SCORE_MIN..=SCORE_MAX).contains(&c.end_score) {
            return Err(invalid(format!(
                "component {i}: end_score {} outside [{SCORE_MIN}, {SCORE_MAX}]",
                c.end_score
            )));
        }
        if i > 0 && c.end_time < components[i - 1].end_time {
            return Err(invalid(format!(
                "component {i}: end_time {} goes backward from {}",
                c.end_time,
                components[i - 1].end_time
            )));
        }
    }

    let mut segments = Vec::with_capacity(components.len() - 1);
    for (i, pair) in components.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let name = cur.arc_type.as_deref().ok_or_else(|| {
            invalid(format!("component {}: missing arc_type", i + 1))
        })?;
        let arc_type = ArcType::parse(name)?;

        segments.push(ResolvedSegment {
            segment: ArcSegment::new(
                prev.end_time,
                cur.end_time,
                prev.end_score,
                cur.end_score,
                arc_type,
            ),
            descriptor: cur
                .descriptor_text
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            component_index: i + 1,
        });
    }
    Ok(segments)
}
