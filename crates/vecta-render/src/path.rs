//! Node geometry → kurbo paths.
//!
//! Each path point's `end` offset is the outgoing control toward the next
//! point and its `start` offset the incoming control from the previous one.
//! A segment with neither control is a straight line.

use kurbo::{BezPath, Point, Rect, Shape};
use vecta_core::model::PathPoint;

/// Build the local-space path for a geometry list.
pub fn to_bez_path(geometry: &[PathPoint]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = geometry.first() else {
        return path;
    };
    path.move_to(first.anchor());

    for pair in geometry.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        if from.end.is_none() && to.start.is_none() {
            path.line_to(to.anchor());
            continue;
        }
        let c1 = from.anchor() + from.end.unwrap_or_default();
        let c2 = to.anchor() + to.start.unwrap_or_default();
        path.curve_to(c1, c2, to.anchor());
    }
    path
}

/// Tight local bounds of the drawn path, `None` when there is nothing to draw.
pub fn local_bounds(geometry: &[PathPoint]) -> Option<Rect> {
    match geometry {
        [] => None,
        [only] => Some(Rect::from_points(only.anchor(), only.anchor())),
        _ => Some(to_bez_path(geometry).bounding_box()),
    }
}

/// Absolute `(start, end)` control positions of a point in local space.
pub fn control_points(point: &PathPoint) -> (Option<Point>, Option<Point>) {
    (
        point.start.map(|offset| point.anchor() + offset),
        point.end.map(|offset| point.anchor() + offset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use kurbo::{PathEl, Vec2};

    #[test]
    fn corners_become_lines() {
        let path = to_bez_path(&[
            PathPoint::corner(0.0, 0.0),
            PathPoint::corner(10.0, 0.0),
            PathPoint::corner(10.0, 10.0),
        ]);
        let els: Vec<PathEl> = path.elements().to_vec();
        assert_eq!(els.len(), 3);
        assert!(matches!(els[1], PathEl::LineTo(p) if p == Point::new(10.0, 0.0)));
    }

    #[test]
    fn controls_become_cubics() {
        let path = to_bez_path(&[
            PathPoint::smooth(0.0, 0.0, Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)),
            PathPoint::corner(20.0, 0.0),
        ]);
        match path.elements()[1] {
            PathEl::CurveTo(c1, c2, end) => {
                assert_eq!(c1, Point::new(5.0, 0.0));
                assert_eq!(c2, Point::new(20.0, 0.0));
                assert_eq!(end, Point::new(20.0, 0.0));
            }
            ref other => panic!("expected CurveTo, got {other:?}"),
        }
    }

    #[test]
    fn bounds_of_empty_and_single_point() {
        assert!(local_bounds(&[]).is_none());
        let single = local_bounds(&[PathPoint::corner(3.0, 4.0)]).unwrap();
        assert_eq!(single, Rect::new(3.0, 4.0, 3.0, 4.0));
    }

    #[test]
    fn bounds_cover_all_anchors() {
        let b = local_bounds(&[
            PathPoint::corner(-2.0, 1.0),
            PathPoint::corner(8.0, -3.0),
            PathPoint::corner(4.0, 9.0),
        ])
        .unwrap();
        assert_eq!(b, Rect::new(-2.0, -3.0, 8.0, 9.0));
    }

    #[test]
    fn control_points_are_anchor_relative() {
        let p = PathPoint::smooth(10.0, 10.0, Vec2::new(-1.0, 0.0), Vec2::new(0.0, 2.0));
        let (start, end) = control_points(&p);
        assert_eq!(start, Some(Point::new(9.0, 10.0)));
        assert_eq!(end, Some(Point::new(10.0, 12.0)));
    }
}
