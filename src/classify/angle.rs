use crate::pose::Point2D;

/// Interior angle at `b` between rays `b→a` and `b→c`, in degrees (0..=180).
///
/// A zero-length ray points along +x (`atan2(0, 0) == 0`), so three
/// coincident points give 0.
pub fn angle(a: Point2D, b: Point2D, c: Point2D) -> f32 {
    let (ax, ay) = (a.x - b.x, a.y - b.y);
    let (cx, cy) = (c.x - b.x, c.y - b.y);
    let radians = cy.atan2(cx) - ay.atan2(ax);
    let degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}
