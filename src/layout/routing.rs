//! Orthogonal relation routing between two node boxes.

use crate::geometry::{Point, Rect};

/// Which way the path leaves the first node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCase {
    /// `from` lies entirely left of `to`: right-mid to left-mid through the midline.
    LeftOfTarget,
    /// Horizontal projections overlap: both right-mids, detour to the right.
    Overlapping,
    /// `from` lies entirely right of `to`: left-mid to right-mid through the midline.
    RightOfTarget,
}

/// Pick the routing case for two boxes. The three cases partition every
/// pair of boxes with non-negative width.
pub fn select_case(from: &Rect, to: &Rect) -> RouteCase {
    if from.mr().x < to.ml().x {
        RouteCase::LeftOfTarget
    } else if from.ml().x > to.mr().x {
        RouteCase::RightOfTarget
    } else {
        RouteCase::Overlapping
    }
}

#[inline]
fn halfway(a: f64, b: f64) -> f64 {
    a + (b - a) / 2.0
}

/// Route a 4-point orthogonal polyline: start, two elbows, end.
pub fn route(from: &Rect, to: &Rect, overlap_offset: f64) -> ([Point; 4], RouteCase) {
    let case = select_case(from, to);

    // from┐
    //     └to
    let (start, end) = match case {
        RouteCase::LeftOfTarget => (from.mr(), to.ml()),
        // from─┐
        //   to─┘
        RouteCase::Overlapping => (from.mr(), to.mr()),
        //     ┌from
        // to──┘
        RouteCase::RightOfTarget => (from.ml(), to.mr()),
    };

    let elbow_x = match case {
        RouteCase::Overlapping => start.x.max(end.x) + overlap_offset,
        _ => halfway(start.x, end.x),
    };

    let path = [
        start,
        Point::new(elbow_x, start.y),
        Point::new(elbow_x, end.y),
        end,
    ];
    (path, case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_left_of_target() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(300.0, 100.0, 100.0, 50.0);
        let (path, case) = route(&a, &b, 20.0);

        assert_eq!(case, RouteCase::LeftOfTarget);
        assert_eq!(
            path,
            [
                Point::new(100.0, 25.0),
                Point::new(200.0, 25.0),
                Point::new(200.0, 125.0),
                Point::new(300.0, 125.0),
            ]
        );
    }

    #[test]
    fn test_overlapping_detours_right() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(50.0, 200.0, 200.0, 50.0);
        let (path, case) = route(&a, &b, 20.0);

        assert_eq!(case, RouteCase::Overlapping);
        assert_eq!(path[0], Point::new(100.0, 25.0));
        assert_eq!(path[1], Point::new(270.0, 25.0));
        assert_eq!(path[2], Point::new(270.0, 225.0));
        assert_eq!(path[3], Point::new(250.0, 225.0));
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(100.0, 0.0, 100.0, 50.0);
        assert_eq!(select_case(&a, &b), RouteCase::Overlapping);
    }

    #[test]
    fn test_right_of_target_mirrors() {
        let a = Rect::new(300.0, 100.0, 100.0, 50.0);
        let b = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (path, case) = route(&a, &b, 20.0);

        assert_eq!(case, RouteCase::RightOfTarget);
        assert_eq!(path[0], Point::new(300.0, 125.0));
        assert_eq!(path[1], Point::new(200.0, 125.0));
        assert_eq!(path[2], Point::new(200.0, 25.0));
        assert_eq!(path[3], Point::new(100.0, 25.0));
    }

    fn rect() -> impl Strategy<Value = Rect> {
        (-2000.0..2000.0f64, -2000.0..2000.0f64, 0.0..600.0f64, 0.0..600.0f64)
            .prop_map(|(l, t, w, h)| Rect::new(l, t, w, h))
    }

    proptest! {
        #[test]
        fn prop_exactly_one_case_applies(a in rect(), b in rect()) {
            let left = a.mr().x < b.ml().x;
            let overlap = a.mr().x >= b.ml().x && a.ml().x <= b.mr().x;
            let right = a.ml().x > b.mr().x;
            prop_assert_eq!([left, overlap, right].iter().filter(|c| **c).count(), 1);

            let expected = if left {
                RouteCase::LeftOfTarget
            } else if overlap {
                RouteCase::Overlapping
            } else {
                RouteCase::RightOfTarget
            };
            prop_assert_eq!(select_case(&a, &b), expected);
        }

        #[test]
        fn prop_segments_are_orthogonal(a in rect(), b in rect()) {
            let (path, _) = route(&a, &b, 20.0);
            for pair in path.windows(2) {
                prop_assert!(pair[0].x == pair[1].x || pair[0].y == pair[1].y);
            }
        }
    }
}
