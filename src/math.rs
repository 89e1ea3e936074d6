use na::{Matrix2, Vector2};

/// Determinant of the 2x2 matrix with rows `a` and `b`, the z component of `a × b`.
#[inline]
pub fn cross2(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// `a` rotated by +90 degrees.
#[inline]
pub fn perp(a: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-a.y, a.x)
}

pub fn symmetrize(a_matrix: &Matrix2<f64>) -> Matrix2<f64> {
    (a_matrix + a_matrix.transpose()) * 0.5
}
