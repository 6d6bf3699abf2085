use crate::layout::glyph::GlyphBox;
use std::collections::HashMap;

/// Spatial hash over every glyph box committed so far, across all segments.
///
/// Owned by the caller and threaded through each placement call; candidate
/// queries return insertion-ordered indices so collision testing stays
/// deterministic regardless of hash-map internals.
#[derive(Debug)]
pub struct GlyphIndex {
    cell_size: f64,
    boxes: Vec<GlyphBox>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl GlyphIndex {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            boxes: Vec::new(),
            cells: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[GlyphBox] {
        &self.boxes
    }

    fn cell_range(&self, aabb: (f64, f64, f64, f64)) -> (i64, i64, i64, i64) {
        let (min_x, min_y, max_x, max_y) = aabb;
        (
            (min_x / self.cell_size).floor() as i64,
            (min_y / self.cell_size).floor() as i64,
            (max_x / self.cell_size).floor() as i64,
            (max_y / self.cell_size).floor() as i64,
        )
    }

    /// Commit a glyph box; returns its stable index.
    pub fn insert(&mut self, glyph: GlyphBox) -> usize {
        let idx = self.boxes.len();
        let (cx0, cy0, cx1, cy1) = self.cell_range(glyph.aabb());
        for cx in cx0..=cx1 {
            for cy in cy0..=cy1 {
                self.cells.entry((cx, cy)).or_default().push(idx);
            }
        }
        self.boxes.push(glyph);
        idx
    }

    /// Indices of committed boxes whose grid cells intersect the query AABB,
    /// sorted by insertion order and deduplicated.
    pub fn candidates(&self, aabb: (f64, f64, f64, f64)) -> Vec<usize> {
        let (cx0, cy0, cx1, cy1) = self.cell_range(aabb);
        let mut found = Vec::new();
        for cx in cx0..=cx1 {
            for cy in cy0..=cy1 {
                if let Some(indices) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(indices);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Drop every box committed at or after `mark` (segment rollback).
    pub fn truncate(&mut self, mark: usize) {
        if mark >= self.boxes.len() {
            return;
        }
        self.boxes.truncate(mark);
        for indices in self.cells.values_mut() {
            indices.retain(|&i| i < mark);
        }
        self.cells.retain(|_, indices| !indices.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Point;

    fn glyph_at(x: f64, y: f64) -> GlyphBox {
        GlyphBox::new(Point::new(x, y), 0.0, 10.0, 12.0)
    }

    #[test]
    fn test_candidates_find_nearby_boxes_only() {
        let mut index = GlyphIndex::new(64.0);
        let near = index.insert(glyph_at(10.0, 10.0));
        let far = index.insert(glyph_at(1000.0, 1000.0));

        let hits = index.candidates(glyph_at(15.0, 12.0).aabb());
        assert!(hits.contains(&near));
        assert!(!hits.contains(&far));
    }

    #[test]
    fn test_candidates_are_sorted_and_unique() {
        let mut index = GlyphIndex::new(4.0);
        // large box spans many cells; it must still appear once
        let big = index.insert(GlyphBox::new(Point::new(0.0, 0.0), 0.0, 100.0, 100.0));
        let hits = index.candidates((-50.0, -50.0, 50.0, 50.0));
        assert_eq!(hits, vec![big]);
    }

    #[test]
    fn test_truncate_rolls_back_recent_boxes() {
        let mut index = GlyphIndex::new(64.0);
        index.insert(glyph_at(0.0, 0.0));
        let mark = index.len();
        index.insert(glyph_at(5.0, 0.0));
        index.insert(glyph_at(10.0, 0.0));

        index.truncate(mark);
        assert_eq!(index.len(), 1);
        let hits = index.candidates((-20.0, -20.0, 20.0, 20.0));
        assert_eq!(hits, vec![0]);
    }
}
