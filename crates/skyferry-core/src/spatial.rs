//! Planar geometry for drone routing.
//!
//! All math happens directly in degree space; distances and step lengths
//! are degree quantities, matching the scale the delivery service operates
//! at. Every function here is total for finite inputs.

use crate::models::{
    LngLat, NamedRegion, DRONE_IS_CLOSE_DISTANCE, DRONE_MOVE_DISTANCE, HOVER_ANGLE,
};

/// Euclidean distance between two positions, in coordinate units.
///
/// Used as both path cost and closeness metric.
pub fn distance(a: LngLat, b: LngLat) -> f64 {
    ((a.lng - b.lng).powi(2) + (a.lat - b.lat).powi(2)).sqrt()
}

/// True when two positions are within [`DRONE_IS_CLOSE_DISTANCE`].
pub fn is_close(a: LngLat, b: LngLat) -> bool {
    distance(a, b) <= DRONE_IS_CLOSE_DISTANCE
}

/// Heading of the vector from `a` to `b` in degrees: 0 points along
/// increasing longitude (east), 90 along increasing latitude (north).
/// Normalized to [0, 360).
pub fn bearing(a: LngLat, b: LngLat) -> f64 {
    let angle = (b.lat - a.lat).atan2(b.lng - a.lng).to_degrees();
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Position exactly [`DRONE_MOVE_DISTANCE`] from `p` along `angle`.
///
/// The [`HOVER_ANGLE`] sentinel leaves the position unchanged.
pub fn next_position(p: LngLat, angle: f64) -> LngLat {
    if angle == HOVER_ANGLE {
        return p;
    }
    let rad = angle.to_radians();
    LngLat {
        lng: p.lng + DRONE_MOVE_DISTANCE * rad.cos(),
        lat: p.lat + DRONE_MOVE_DISTANCE * rad.sin(),
    }
}

/// True if `p` lies inside at least one of the regions.
pub fn in_any_region(p: LngLat, regions: &[NamedRegion]) -> bool {
    regions.iter().any(|region| region.contains_point(p))
}

/// Orientation-based segment intersection test.
///
/// Touching at an endpoint and collinear overlap both count as
/// intersecting; callers that want to forgive endpoint grazing filter on
/// the endpoints themselves.
pub fn segments_intersect(p1: LngLat, p2: LngLat, q1: LngLat, q2: LngLat) -> bool {
    fn orient(p: LngLat, q: LngLat, r: LngLat) -> f64 {
        (q.lng - p.lng) * (r.lat - p.lat) - (q.lat - p.lat) * (r.lng - p.lng)
    }

    fn on_segment(p: LngLat, q: LngLat, r: LngLat) -> bool {
        r.lng >= p.lng.min(q.lng)
            && r.lng <= p.lng.max(q.lng)
            && r.lat >= p.lat.min(q.lat)
            && r.lat <= p.lat.max(q.lat)
    }

    let o1 = orient(p1, p2, q1);
    let o2 = orient(p1, p2, q2);
    let o3 = orient(q1, q2, p1);
    let o4 = orient(q1, q2, p2);

    if ((o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0))
        && ((o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0))
    {
        return true;
    }

    (o1 == 0.0 && on_segment(p1, p2, q1))
        || (o2 == 0.0 && on_segment(p1, p2, q2))
        || (o3 == 0.0 && on_segment(q1, q2, p1))
        || (o4 == 0.0 && on_segment(q1, q2, p2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{APPLETON_TOWER, COMPASS_DIRECTIONS, COMPASS_INCREMENT_DEG};
    use rand::Rng;

    #[test]
    fn distance_three_four_five() {
        let a = LngLat::new(0.0, 0.0);
        let b = LngLat::new(0.0003, 0.0004);
        assert!((distance(a, b) - 0.0005).abs() < 1e-15);
    }

    #[test]
    fn is_close_at_exact_threshold() {
        let a = LngLat::new(0.0, 0.0);
        let b = LngLat::new(DRONE_IS_CLOSE_DISTANCE, 0.0);
        assert!(is_close(a, b));
        assert!(!is_close(a, LngLat::new(DRONE_IS_CLOSE_DISTANCE * 1.01, 0.0)));
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = LngLat::new(0.0, 0.0);
        assert_eq!(bearing(origin, LngLat::new(1.0, 0.0)), 0.0);
        assert!((bearing(origin, LngLat::new(0.0, 1.0)) - 90.0).abs() < 1e-12);
        assert!((bearing(origin, LngLat::new(-1.0, 0.0)) - 180.0).abs() < 1e-12);
        assert!((bearing(origin, LngLat::new(0.0, -1.0)) - 270.0).abs() < 1e-12);
    }

    #[test]
    fn bearing_normalizes_negative_angles() {
        let origin = LngLat::new(0.0, 0.0);
        let south_east = LngLat::new(1.0, -1.0);
        assert!((bearing(origin, south_east) - 315.0).abs() < 1e-12);
    }

    #[test]
    fn step_length_is_exact_for_every_heading() {
        for direction in 0..COMPASS_DIRECTIONS {
            let angle = direction as f64 * COMPASS_INCREMENT_DEG;
            let next = next_position(APPLETON_TOWER, angle);
            let d = distance(APPLETON_TOWER, next);
            assert!(
                (d - DRONE_MOVE_DISTANCE).abs() < 1e-12,
                "heading {angle}: step length {d}"
            );
        }
    }

    #[test]
    fn step_length_holds_from_random_positions() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let p = LngLat::new(
                APPLETON_TOWER.lng + rng.random_range(-0.02..0.02),
                APPLETON_TOWER.lat + rng.random_range(-0.02..0.02),
            );
            let direction = rng.random_range(0..COMPASS_DIRECTIONS);
            let angle = direction as f64 * COMPASS_INCREMENT_DEG;
            let d = distance(p, next_position(p, angle));
            assert!((d - DRONE_MOVE_DISTANCE).abs() < 1e-12);
        }
    }

    #[test]
    fn hover_does_not_move() {
        assert_eq!(next_position(APPLETON_TOWER, HOVER_ANGLE), APPLETON_TOWER);
    }

    #[test]
    fn segments_crossing() {
        assert!(segments_intersect(
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(0.0, 1.0),
            LngLat::new(1.0, 0.0),
        ));
    }

    #[test]
    fn segments_parallel_do_not_cross() {
        assert!(!segments_intersect(
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(0.0, 1.0),
            LngLat::new(1.0, 1.0),
        ));
    }

    #[test]
    fn segments_sharing_an_endpoint_touch() {
        assert!(segments_intersect(
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(2.0, 1.0),
        ));
    }

    #[test]
    fn segments_collinear_overlap_and_gap() {
        let a = LngLat::new(0.0, 0.0);
        let b = LngLat::new(2.0, 0.0);
        assert!(segments_intersect(
            a,
            b,
            LngLat::new(1.0, 0.0),
            LngLat::new(3.0, 0.0)
        ));
        assert!(!segments_intersect(
            a,
            b,
            LngLat::new(3.0, 0.0),
            LngLat::new(4.0, 0.0)
        ));
    }

    #[test]
    fn segments_t_touch() {
        assert!(segments_intersect(
            LngLat::new(0.0, 0.0),
            LngLat::new(2.0, 0.0),
            LngLat::new(1.0, -1.0),
            LngLat::new(1.0, 0.0),
        ));
    }

    #[test]
    fn in_any_region_checks_all() {
        let zones = vec![
            NamedRegion::new(
                "a",
                vec![
                    LngLat::new(0.0, 0.0),
                    LngLat::new(0.002, 0.0),
                    LngLat::new(0.002, 0.002),
                    LngLat::new(0.0, 0.002),
                ],
            ),
            NamedRegion::new(
                "b",
                vec![
                    LngLat::new(0.01, 0.01),
                    LngLat::new(0.012, 0.01),
                    LngLat::new(0.012, 0.012),
                    LngLat::new(0.01, 0.012),
                ],
            ),
        ];
        assert!(in_any_region(LngLat::new(0.011, 0.011), &zones));
        assert!(in_any_region(LngLat::new(0.001, 0.001), &zones));
        assert!(!in_any_region(LngLat::new(0.005, 0.005), &zones));
    }
}
