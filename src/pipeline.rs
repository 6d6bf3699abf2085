use crate::{
    config::EngineConfig,
    curve::{
        FitStatus, Point, ScreenTransform, SegmentCurve, domain_to_screen, fit_to_length,
        propagate_from, sample_composite,
    },
    error::Result,
    layout::{GlyphIndex, GlyphMetrics, PlacementResult, place_along_curve},
    shaping::TextShaper,
    story::{StoryComponent, resolve_segments},
};
use log::{debug, info, warn};
use serde::Serialize;

/// Final geometry and glyph layout for one segment
#[derive(Debug, Clone, Serialize)]
pub struct SegmentOutput {
    /// Index of the story component that ends this segment
    pub component_index: usize,
    /// Fitted (or raw, for gap segments) screen polyline for stroking
    pub polyline: Vec<Point>,
    /// None for segments with no descriptor text
    pub placement: Option<PlacementResult>,
}

/// Durable output of one full engine pass
#[derive(Debug, Clone, Serialize)]
pub struct StoryLayout {
    pub segments: Vec<SegmentOutput>,
}

/// Run the whole engine: resolve components into segments, synthesize the
/// composite curve, fit every segment's length to its text, cascade the
/// adjustments downstream, then place glyphs with collision avoidance.
///
/// Strictly sequential in time order; segment i+1's domain is not known
/// until segment i's fitted endpoint is final.
pub fn layout_story(
    components: &[StoryComponent],
    shaper: &dyn TextShaper,
    cfg: &EngineConfig,
) -> Result<StoryLayout> {
    cfg.validate()?;
    let resolved = resolve_segments(components)?;
    let arcs: Vec<_> = resolved.iter().map(|r| r.segment).collect();

    let composite = sample_composite(&arcs, cfg.curve.sample_count);
    if composite.is_empty() {
        warn!("degenerate story domain; emitting empty layout");
        return Ok(StoryLayout {
            segments: resolved
                .iter()
                .map(|r| SegmentOutput {
                    component_index: r.component_index,
                    polyline: Vec::new(),
                    placement: None,
                })
                .collect(),
        });
    }

    let screen = ScreenTransform::fit(
        (arcs[0].x1, arcs[arcs.len() - 1].x2),
        (cfg.curve.display_min, cfg.curve.display_max),
        cfg.curve.canvas_width_px,
        cfg.curve.canvas_height_px,
        cfg.curve.margin_px,
    );
    let to_screen = domain_to_screen(
        &composite,
        cfg.curve.display_min,
        cfg.curve.display_max,
        &screen,
    );

    let raw_polylines = partition_by_segment(&composite, &arcs, &to_screen);

    // gap segments (no descriptor) carry no fitted curve data: they are never
    // fitted and they stop the cascade, leaving later segments stale
    let mut curves: Vec<SegmentCurve> = resolved
        .iter()
        .zip(&raw_polylines)
        .map(|(r, raw)| SegmentCurve {
            segment: r.segment,
            points: r.descriptor.as_ref().map(|_| raw.clone()),
        })
        .collect();

    // fit + cascade pass, strictly in time order
    for (i, r) in resolved.iter().enumerate() {
        let Some(descriptor) = r.descriptor.as_ref() else {
            debug!("segment {i} has no descriptor; leaving its curve untouched");
            continue;
        };
        let required = shaper.measure_text(descriptor).width;
        let points = curves[i].points.clone().unwrap_or_default();
        let outcome = fit_to_length(&points, &curves[i].segment, &to_screen, required, &cfg.fit);
        let changed = matches!(
            outcome.status,
            FitStatus::Truncated | FitStatus::Extended | FitStatus::CapReached
        );
        debug!(
            "segment {i}: required {required:.1}px, fit status {:?}",
            outcome.status
        );
        curves[i].points = Some(outcome.points);
        if changed {
            let rebuilt = propagate_from(&mut curves, i, &to_screen);
            debug!("segment {i}: cascade rebuilt {rebuilt} downstream segment(s)");
        }
    }

    // placement pass over the final polylines, one shared collision index
    let mut index = GlyphIndex::new(cfg.placement.grid_cell_px);
    let mut outputs = Vec::with_capacity(resolved.len());
    for (i, r) in resolved.iter().enumerate() {
        let polyline = curves[i]
            .points
            .clone()
            .unwrap_or_else(|| raw_polylines[i].clone());
        let placement = r.descriptor.as_ref().map(|descriptor| {
            let glyphs = measure_glyphs(descriptor, shaper);
            place_along_curve(&polyline, &glyphs, &mut index, &cfg.placement)
        });
        if let Some(p) = &placement {
            info!(
                "segment {i}: {} glyph(s) placed, status {:?}",
                p.glyphs.len(),
                p.status
            );
        }
        outputs.push(SegmentOutput {
            component_index: r.component_index,
            polyline,
            placement,
        });
    }

    Ok(StoryLayout { segments: outputs })
}

/// Persist the committed geometry back onto the component records so later
/// pipeline stages reuse it instead of recomputing (and possibly landing on
/// different nudge outcomes).
pub fn write_back_cache(components: &mut [StoryComponent], layout: &StoryLayout) {
    for segment in &layout.segments {
        let Some(component) = components.get_mut(segment.component_index) else {
            continue;
        };
        component.arc_x_values = Some(segment.polyline.iter().map(|p| p.x).collect());
        component.arc_y_values = Some(segment.polyline.iter().map(|p| p.y).collect());
    }
}

fn measure_glyphs(descriptor: &str, shaper: &dyn TextShaper) -> Vec<GlyphMetrics> {
    descriptor
        .chars()
        .map(|ch| {
            let m = shaper.measure_char(ch);
            GlyphMetrics {
                ch,
                width: m.width,
                height: m.height,
            }
        })
        .collect()
}

/// Split the composite samples into per-segment screen polylines. Boundary
/// samples belong to the earlier segment and are duplicated as the next
/// segment's first point so the stroked curve stays connected.
fn partition_by_segment(
    composite: &[Point],
    arcs: &[crate::curve::ArcSegment],
    to_screen: &ScreenTransform,
) -> Vec<Vec<Point>> {
    let mut partitions: Vec<Vec<Point>> = vec![Vec::new(); arcs.len()];
    let mut j = 0usize;
    for p in composite {
        while j + 1 < arcs.len() && p.x > arcs[j].x2 {
            j += 1;
        }
        partitions[j].push(to_screen.apply(*p));
    }
    for i in 1..partitions.len() {
        if let Some(&last) = partitions[i - 1].last() {
            partitions[i].insert(0, last);
        }
    }
    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{curve::ArcLengthTable, shaping::FixedShaper};

    fn component(
        end_time: f64,
        end_score: f64,
        arc_type: Option<&str>,
        descriptor: Option<&str>,
    ) -> StoryComponent {
        StoryComponent {
            end_time,
            end_score,
            arc_type: arc_type.map(str::to_owned),
            descriptor_text: descriptor.map(str::to_owned),
            arc_x_values: None,
            arc_y_values: None,
        }
    }

    fn story() -> Vec<StoryComponent> {
        vec![
            component(0.0, -5.0, None, None),
            component(30.0, 0.0, Some("linear_increase"), Some("hope stirs")),
            component(65.0, -8.0, Some("step_by_step_decrease"), Some("ruin")),
            component(100.0, 6.0, Some("s_curve_increase"), Some("rebirth")),
        ]
    }

    #[test]
    fn test_full_pipeline_produces_layout_for_every_segment() {
        let shaper = FixedShaper::new(12.0, 14.0);
        let layout = layout_story(&story(), &shaper, &EngineConfig::default()).unwrap();

        assert_eq!(layout.segments.len(), 3);
        for segment in &layout.segments {
            assert!(segment.polyline.len() >= 2);
            let placement = segment.placement.as_ref().unwrap();
            assert!(!placement.glyphs.is_empty());
        }
    }

    #[test]
    fn test_segment_length_tracks_text_width() {
        let shaper = FixedShaper::new(12.0, 14.0);
        let layout = layout_story(&story(), &shaper, &EngineConfig::default()).unwrap();

        // "hope stirs" = 10 chars x 12px
        let fitted = ArcLengthTable::build(&layout.segments[0].polyline).total();
        assert!(
            (fitted - 120.0).abs() < 2.0,
            "expected ~120px of curve, got {fitted}"
        );
    }

    #[test]
    fn test_gap_segment_keeps_raw_curve_and_no_placement() {
        let mut components = story();
        components[2].descriptor_text = None;
        let shaper = FixedShaper::new(12.0, 14.0);
        let layout = layout_story(&components, &shaper, &EngineConfig::default()).unwrap();

        let gap = &layout.segments[1];
        assert!(gap.placement.is_none());
        assert!(!gap.polyline.is_empty());
    }

    #[test]
    fn test_cache_write_back() {
        let mut components = story();
        let shaper = FixedShaper::new(12.0, 14.0);
        let layout = layout_story(&components, &shaper, &EngineConfig::default()).unwrap();
        write_back_cache(&mut components, &layout);

        assert!(components[0].arc_x_values.is_none());
        for c in &components[1..] {
            let xs = c.arc_x_values.as_ref().unwrap();
            let ys = c.arc_y_values.as_ref().unwrap();
            assert_eq!(xs.len(), ys.len());
            assert!(xs.len() >= 2);
        }
    }

    #[test]
    fn test_determinism_end_to_end() {
        let shaper = FixedShaper::new(12.0, 14.0);
        let a = layout_story(&story(), &shaper, &EngineConfig::default()).unwrap();
        let b = layout_story(&story(), &shaper, &EngineConfig::default()).unwrap();
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}
