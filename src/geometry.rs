use egui::{Pos2, Rect, Vec2};

/// Calculate distance from a point to a line segment (used for stroke hit testing)
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Calculate the bounding box for a set of points
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Even-odd point-in-polygon test
pub fn polygon_contains(points: &[Pos2], pos: Pos2) -> bool {
    if points.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > pos.y) != (b.y > pos.y) {
            let cross_x = (b.x - a.x) * (pos.y - a.y) / (b.y - a.y) + a.x;
            if pos.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether `pos` lies inside the ellipse inscribed in `rect`
pub fn ellipse_contains(rect: Rect, pos: Pos2) -> bool {
    let radius = rect.size() / 2.0;
    if radius.x <= 0.0 || radius.y <= 0.0 {
        return false;
    }
    let d = pos - rect.center();
    (d.x / radius.x).powi(2) + (d.y / radius.y).powi(2) <= 1.0
}

/// Scale `point` about `origin` by independent factors per axis
pub fn scale_about(point: Pos2, origin: Pos2, scale: Vec2) -> Pos2 {
    origin + (point - origin) * scale
}

/// Scale a rectangle about `origin`, keeping min <= max even for negative factors
pub fn scale_rect_about(rect: Rect, origin: Pos2, scale: Vec2) -> Rect {
    Rect::from_two_pos(
        scale_about(rect.min, origin, scale),
        scale_about(rect.max, origin, scale),
    )
}

/// Points approximating the ellipse inscribed in `rect`, for painting
pub fn ellipse_points(rect: Rect, segments: usize) -> Vec<Pos2> {
    let center = rect.center();
    let radius = rect.size() / 2.0;
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            Pos2::new(center.x + radius.x * angle.cos(), center.y + radius.y * angle.sin())
        })
        .collect()
}

/// Twice the signed area; positive for counter-clockwise winding in y-up axes
fn signed_area(points: &[Pos2]) -> f32 {
    let mut sum = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum
}

fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn triangle_contains(a: Pos2, b: Pos2, c: Pos2, p: Pos2) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear-clipping triangulation of a simple polygon, concave or not. Returns
/// index triples into `points`. A self-intersecting remainder that has no ear
/// left is fanned from its first vertex.
pub fn triangulate(points: &[Pos2]) -> Vec<[usize; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }
    let area = signed_area(points);
    if area == 0.0 {
        return Vec::new();
    }

    let mut ring: Vec<usize> = (0..points.len()).collect();
    if area < 0.0 {
        ring.reverse();
    }

    let mut triangles = Vec::with_capacity(points.len() - 2);
    while ring.len() > 3 {
        let n = ring.len();
        let ear = (0..n).find(|&i| {
            let (a, b, c) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
            if cross(points[a], points[b], points[c]) <= 0.0 {
                return false;
            }
            ring.iter()
                .filter(|&&p| p != a && p != b && p != c)
                .all(|&p| !triangle_contains(points[a], points[b], points[c], points[p]))
        });
        match ear {
            Some(i) => {
                triangles.push([ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]]);
                ring.remove(i);
            }
            None => break,
        }
    }

    for k in 1..ring.len() - 1 {
        triangles.push([ring[0], ring[k], ring[k + 1]]);
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_distance_to_segment() {
        let d = distance_to_line_segment(pos2(5.0, 5.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 5.0).abs() < 0.001);

        // Beyond the end clamps to the endpoint
        let d = distance_to_line_segment(pos2(13.0, 4.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_bounds() {
        let rect = calculate_bounds(&[pos2(10.0, 30.0), pos2(50.0, 10.0), pos2(30.0, 50.0)], 0.0);
        assert_eq!(rect, Rect::from_min_max(pos2(10.0, 10.0), pos2(50.0, 50.0)));
        assert_eq!(calculate_bounds(&[], 1.0), Rect::NOTHING);
    }

    #[test]
    fn test_polygon_contains() {
        let triangle = [pos2(10.0, 10.0), pos2(50.0, 10.0), pos2(30.0, 50.0)];
        assert!(polygon_contains(&triangle, pos2(30.0, 20.0)));
        assert!(!polygon_contains(&triangle, pos2(5.0, 40.0)));
    }

    #[test]
    fn test_scale_rect_about_origin() {
        let rect = Rect::from_min_max(pos2(-10.0, -5.0), pos2(10.0, 5.0));
        let scaled = scale_rect_about(rect, Pos2::ZERO, vec2(2.0, 3.0));
        assert_eq!(scaled, Rect::from_min_max(pos2(-20.0, -15.0), pos2(20.0, 15.0)));
    }

    #[test]
    fn test_triangulate_concave_dart() {
        // Notch at (3, 5) makes this concave
        let dart = [pos2(0.0, 0.0), pos2(10.0, 5.0), pos2(0.0, 10.0), pos2(3.0, 5.0)];
        let triangles = triangulate(&dart);
        assert_eq!(triangles.len(), 2);

        let mut area = 0.0;
        for [a, b, c] in &triangles {
            let (a, b, c) = (dart[*a], dart[*b], dart[*c]);
            area += cross(a, b, c).abs() / 2.0;
            let centroid = pos2((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
            assert!(polygon_contains(&dart, centroid));
        }
        assert!((area - 35.0).abs() < 0.001);
    }

    #[test]
    fn test_triangulate_degenerate() {
        assert!(triangulate(&[pos2(0.0, 0.0), pos2(1.0, 1.0)]).is_empty());
        assert!(triangulate(&[pos2(0.0, 0.0), pos2(1.0, 1.0), pos2(2.0, 2.0)]).is_empty());
    }
}
