//! Squarified treemap layout over category groups.
//!
//! Two fixed levels: categories are tiled into the drawing surface, then
//! each category's leaves are tiled into its cell. Tiling follows Bruls
//! et al.: grow the current strip while the worst aspect ratio improves,
//! then freeze the strip along the shorter side of the remaining region.
//! Padding is applied afterwards as insets, so the pre-padding tiling
//! preserves area exactly and adjacent siblings end up separated by the
//! full padding distance.

use crate::model::CategoryGroup;

/// An axis-aligned rectangle in drawing-surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn area(&self) -> f64 {
        self.w.max(0.0) * self.h.max(0.0)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    /// Shrink by `d` on every side; width/height clamp at zero.
    fn inset(&self, d: f64) -> Rect {
        Rect {
            x: self.x + d,
            y: self.y + d,
            w: (self.w - 2.0 * d).max(0.0),
            h: (self.h - 2.0 * d).max(0.0),
        }
    }
}

/// A laid-out leaf: one rectangle per (category, subcategory) row.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafBox {
    pub category: String,
    pub subcategory: String,
    pub value: f64,
    pub palette_index: usize,
    pub rect: Rect,
}

/// Lay out every leaf of `groups` inside a `width` x `height` surface.
/// Rectangle areas are proportional to row values; siblings at both
/// hierarchy levels are separated by `padding` drawing units. Zero-valued
/// rows still produce a (zero-area) rectangle, so the output always has
/// one entry per input row.
pub fn layout_groups(groups: &[CategoryGroup], width: f64, height: f64, padding: f64) -> Vec<LeafBox> {
    let mut out = Vec::new();
    let grand_total: f64 = groups.iter().map(|g| g.total).sum();
    if groups.is_empty() || width <= 0.0 || height <= 0.0 {
        return out;
    }
    let surface = Rect { x: 0.0, y: 0.0, w: width, h: height }.inset(padding);
    let cat_areas: Vec<f64> = if grand_total > 0.0 {
        groups.iter().map(|g| g.total / grand_total * surface.area()).collect()
    } else {
        vec![0.0; groups.len()]
    };
    for (group, cell) in groups.iter().zip(squarify(&cat_areas, surface)) {
        // half-padding per sibling makes the gap between adjacent cells
        // exactly `padding`; the extra inset is the category's own border.
        let body = cell.inset(padding * 0.5).inset(padding);
        let leaf_areas: Vec<f64> = if group.total > 0.0 {
            group
                .leaves
                .iter()
                .map(|r| r.value / group.total * body.area())
                .collect()
        } else {
            vec![0.0; group.leaves.len()]
        };
        for (row, leaf_cell) in group.leaves.iter().zip(squarify(&leaf_areas, body)) {
            out.push(LeafBox {
                category: row.category.clone(),
                subcategory: row.subcategory.clone(),
                value: row.value,
                palette_index: group.palette_index,
                rect: leaf_cell.inset(padding * 0.5),
            });
        }
    }
    out
}

/// Topmost leaf whose rectangle contains the point, if any. Rectangles
/// do not overlap, so the first hit is the only one.
pub fn leaf_at(leaves: &[LeafBox], x: f64, y: f64) -> Option<&LeafBox> {
    leaves.iter().find(|l| l.rect.contains(x, y))
}

/// Squarified tiling of `areas` into `region`. Always returns one
/// rectangle per area; items that cannot be placed (zero value, region
/// exhausted) come back zero-sized.
fn squarify(areas: &[f64], region: Rect) -> Vec<Rect> {
    let mut out = Vec::with_capacity(areas.len());
    let total: f64 = areas.iter().sum();
    if total <= 0.0 || region.w <= 0.0 || region.h <= 0.0 {
        out.resize(areas.len(), Rect { x: region.x, y: region.y, w: 0.0, h: 0.0 });
        return out;
    }

    let (mut x, mut y, mut w, mut h) = (region.x, region.y, region.w, region.h);
    let mut idx = 0usize;
    let mut row_start = 0usize;
    let mut row_sum = 0.0_f64;
    let mut row_min = f64::INFINITY;
    let mut row_max = 0.0_f64;

    while idx < areas.len() {
        if w <= 1e-9 || h <= 1e-9 {
            break;
        }
        let a = areas[idx];
        let side = w.min(h);
        let current = if row_sum > 0.0 {
            worst_aspect(row_min, row_max, row_sum, side)
        } else {
            f64::INFINITY
        };
        let next_sum = row_sum + a;
        let next_min = row_min.min(a);
        let next_max = row_max.max(a);
        let next = worst_aspect(next_min, next_max, next_sum, side);

        // Grow the strip while the aspect ratio improves (or it is empty).
        if row_sum <= 0.0 || next <= current {
            row_sum = next_sum;
            row_min = next_min;
            row_max = next_max;
            idx += 1;
            continue;
        }

        lay_strip(&areas[row_start..idx], row_sum, &mut x, &mut y, &mut w, &mut h, &mut out);
        row_start = idx;
        row_sum = 0.0;
        row_min = f64::INFINITY;
        row_max = 0.0;
    }

    if row_start < idx {
        lay_strip(&areas[row_start..idx], row_sum, &mut x, &mut y, &mut w, &mut h, &mut out);
    }
    // region exhausted before every item was placed
    while out.len() < areas.len() {
        out.push(Rect { x, y, w: 0.0, h: 0.0 });
    }
    out
}

/// Freeze one strip along the shorter side of the remaining region and
/// shrink the region accordingly.
fn lay_strip(
    strip: &[f64],
    strip_sum: f64,
    x: &mut f64,
    y: &mut f64,
    w: &mut f64,
    h: &mut f64,
    out: &mut Vec<Rect>,
) {
    if strip.is_empty() {
        return;
    }
    if strip_sum <= 0.0 || *w <= 0.0 || *h <= 0.0 {
        for _ in strip {
            out.push(Rect { x: *x, y: *y, w: 0.0, h: 0.0 });
        }
        return;
    }
    let horizontal = *w <= *h;
    let short = if horizontal { *w } else { *h };
    let thickness = strip_sum / short;
    let mut offset = 0.0;
    for (i, &area) in strip.iter().enumerate() {
        let mut length = area / thickness;
        // Absorb floating point drift into the strip's final rectangle.
        if i == strip.len() - 1 {
            let remaining = if horizontal { (*w - offset).max(0.0) } else { (*h - offset).max(0.0) };
            if remaining.is_finite() {
                length = remaining;
            }
        }
        out.push(if horizontal {
            Rect { x: *x + offset, y: *y, w: length, h: thickness }
        } else {
            Rect { x: *x, y: *y + offset, w: thickness, h: length }
        });
        offset += length;
    }
    if horizontal {
        *y += thickness;
        *h = (*h - thickness).max(0.0);
    } else {
        *x += thickness;
        *w = (*w - thickness).max(0.0);
    }
}

fn worst_aspect(min_a: f64, max_a: f64, sum: f64, side: f64) -> f64 {
    if sum <= 0.0 || side <= 0.0 || min_a <= 0.0 || max_a <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    ((side_sq * max_a) / sum_sq).max(sum_sq / (side_sq * min_a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Row, build_groups};

    fn rows(input: &[(&str, &str, f64)]) -> Vec<Row> {
        input
            .iter()
            .map(|(c, s, v)| Row {
                category: c.to_string(),
                subcategory: s.to_string(),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn single_leaf_fills_region_without_padding() {
        let groups = build_groups(rows(&[("A", "a", 10.0)]));
        let leaves = layout_groups(&groups, 580.0, 380.0, 0.0);
        assert_eq!(leaves.len(), 1);
        let r = leaves[0].rect;
        assert!((r.x).abs() < 1e-6 && (r.y).abs() < 1e-6);
        assert!((r.w - 580.0).abs() < 1e-6);
        assert!((r.h - 380.0).abs() < 1e-6);
    }

    #[test]
    fn layout_preserves_total_area_without_padding() {
        let groups = build_groups(rows(&[
            ("A", "a", 400.0),
            ("A", "b", 300.0),
            ("B", "c", 200.0),
            ("B", "d", 100.0),
        ]));
        let leaves = layout_groups(&groups, 100.0, 100.0, 0.0);
        let total: f64 = leaves.iter().map(|l| l.rect.area()).sum();
        assert!((total - 10_000.0).abs() < 1e-6, "total area was {total}");
    }

    #[test]
    fn leaves_stay_in_bounds_and_do_not_overlap() {
        let groups = build_groups(rows(&[
            ("Income", "Salary", 2500.0),
            ("Income", "Interest", 120.5),
            ("Income", "Dividends", 340.0),
            ("Expenses", "Rent", 900.0),
            ("Expenses", "Food", 450.0),
            ("Savings", "ISA", 200.0),
        ]));
        let leaves = layout_groups(&groups, 580.0, 380.0, 2.0);
        assert_eq!(leaves.len(), 6);
        for l in &leaves {
            if l.rect.area() == 0.0 {
                continue;
            }
            assert!(l.rect.x >= 0.0 && l.rect.y >= 0.0, "{:?}", l.rect);
            assert!(l.rect.x + l.rect.w <= 580.0 + 1e-6, "{:?}", l.rect);
            assert!(l.rect.y + l.rect.h <= 380.0 + 1e-6, "{:?}", l.rect);
        }
        for (i, a) in leaves.iter().enumerate() {
            for b in leaves.iter().skip(i + 1) {
                let overlap_x =
                    (a.rect.x + a.rect.w).min(b.rect.x + b.rect.w) - a.rect.x.max(b.rect.x);
                let overlap_y =
                    (a.rect.y + a.rect.h).min(b.rect.y + b.rect.h) - a.rect.y.max(b.rect.y);
                assert!(
                    overlap_x <= 1e-9 || overlap_y <= 1e-9,
                    "{} overlaps {}",
                    a.subcategory,
                    b.subcategory
                );
            }
        }
    }

    #[test]
    fn sibling_leaves_are_separated_by_padding() {
        let groups = build_groups(rows(&[("A", "a", 100.0), ("A", "b", 100.0)]));
        let leaves = layout_groups(&groups, 200.0, 200.0, 2.0);
        let (a, b) = (&leaves[0].rect, &leaves[1].rect);
        let gap_x = (b.x - (a.x + a.w)).max(a.x - (b.x + b.w));
        let gap_y = (b.y - (a.y + a.h)).max(a.y - (b.y + b.h));
        let gap = gap_x.max(gap_y);
        assert!((gap - 2.0).abs() < 1e-6, "gap was {gap}");
    }

    #[test]
    fn one_rect_per_row_even_for_zero_values() {
        let groups = build_groups(rows(&[
            ("A", "a", 100.0),
            ("A", "zero", 0.0),
            ("B", "b", 50.0),
        ]));
        let leaves = layout_groups(&groups, 580.0, 380.0, 2.0);
        assert_eq!(leaves.len(), 3);
        let zero = leaves.iter().find(|l| l.subcategory == "zero").unwrap();
        assert_eq!(zero.rect.area(), 0.0);
    }

    #[test]
    fn groups_share_palette_index_across_leaves() {
        let groups = build_groups(rows(&[
            ("A", "a", 100.0),
            ("A", "b", 60.0),
            ("B", "c", 50.0),
        ]));
        let leaves = layout_groups(&groups, 580.0, 380.0, 2.0);
        let a_idx: Vec<usize> = leaves
            .iter()
            .filter(|l| l.category == "A")
            .map(|l| l.palette_index)
            .collect();
        assert_eq!(a_idx, vec![0, 0]);
        let b = leaves.iter().find(|l| l.category == "B").unwrap();
        assert_ne!(b.palette_index, 0);
    }

    #[test]
    fn leaf_at_hits_containing_rect() {
        let groups = build_groups(rows(&[("A", "a", 300.0), ("B", "b", 100.0)]));
        let leaves = layout_groups(&groups, 580.0, 380.0, 2.0);
        let first = &leaves[0];
        let cx = first.rect.x + first.rect.w * 0.5;
        let cy = first.rect.y + first.rect.h * 0.5;
        assert_eq!(
            leaf_at(&leaves, cx, cy).map(|l| l.subcategory.as_str()),
            Some(first.subcategory.as_str())
        );
        assert!(leaf_at(&leaves, -5.0, -5.0).is_none());
        assert!(leaf_at(&leaves, 579.9, 0.1).is_none()); // outer padding strip
    }
}
