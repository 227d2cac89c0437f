//! Transform assembly
//!
//! Builds the map that carries one calibration triangle onto another.
//! Two forms are supported:
//!
//! - **Affine**: a 2x2 linear map plus offset over the plane x/y.
//! - **Taki**: a 3x3 direction-cosine map. Each triangle contributes its
//!   two edge vectors and their unit normal as rows, so the map also
//!   carries the plane orientation.
//!
//! Points are treated as row vectors: `p' = offset + p * M`.

use nalgebra::{Matrix2, Matrix3, RowVector2, RowVector3};
use starsync_core::{AlignmentError, PlanePoint};
use starsync_settings::TransformKind;

/// Determinants at or below this fraction of the row norm product are singular
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

fn degenerate(determinant: f64) -> AlignmentError {
    AlignmentError::DegenerateGeometry {
        ids: Vec::new(),
        determinant,
    }
}

fn is_singular(determinant: f64, scale: f64) -> bool {
    !determinant.is_finite() || determinant.abs() <= SINGULARITY_TOLERANCE * scale
}

/// 2D affine map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    /// Linear part
    pub matrix: Matrix2<f64>,
    /// Translation
    pub offset: RowVector2<f64>,
}

impl AffineTransform {
    /// Map carrying `src` onto `dst`, vertex by vertex
    pub fn assemble(src: &[PlanePoint; 3], dst: &[PlanePoint; 3]) -> Result<Self, AlignmentError> {
        let p = edge_matrix2(src);
        let q = edge_matrix2(dst);

        let det = p[(0, 0)] * p[(1, 1)] - p[(0, 1)] * p[(1, 0)];
        let scale = p.row(0).norm() * p.row(1).norm();
        if is_singular(det, scale) {
            return Err(degenerate(det));
        }

        let inverse = Matrix2::new(p[(1, 1)], -p[(0, 1)], -p[(1, 0)], p[(0, 0)]) / det;
        let matrix = inverse * q;
        let offset = RowVector2::new(dst[0].x, dst[0].y) - RowVector2::new(src[0].x, src[0].y) * matrix;

        Ok(Self { matrix, offset })
    }

    /// Map a point; z and the projection flags pass through
    pub fn apply(&self, point: &PlanePoint) -> PlanePoint {
        let mapped = self.offset + RowVector2::new(point.x, point.y) * self.matrix;
        point.with_xy(mapped[0], mapped[1])
    }
}

fn edge_matrix2(t: &[PlanePoint; 3]) -> Matrix2<f64> {
    Matrix2::new(
        t[1].x - t[0].x,
        t[1].y - t[0].y,
        t[2].x - t[0].x,
        t[2].y - t[0].y,
    )
}

/// 3D direction-cosine map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TakiTransform {
    /// Linear part
    pub matrix: Matrix3<f64>,
    /// Translation
    pub offset: RowVector3<f64>,
}

impl TakiTransform {
    /// Map carrying `src` onto `dst`, vertex by vertex
    pub fn assemble(src: &[PlanePoint; 3], dst: &[PlanePoint; 3]) -> Result<Self, AlignmentError> {
        let lmn_src = lmn(src);
        let lmn_dst = lmn(dst);

        let det = lmn_src.determinant();
        let scale = lmn_src.row(0).norm() * lmn_src.row(1).norm() * lmn_src.row(2).norm();
        if is_singular(det, scale) {
            return Err(degenerate(det));
        }

        let matrix = cofactor_inverse(&lmn_src, det) * lmn_dst;
        let offset = row3(&dst[0]) - row3(&src[0]) * matrix;

        Ok(Self { matrix, offset })
    }

    /// Map a point, including its z coordinate
    pub fn apply(&self, point: &PlanePoint) -> PlanePoint {
        let mapped = self.offset + row3(point) * self.matrix;
        PlanePoint {
            z: mapped[2],
            ..point.with_xy(mapped[0], mapped[1])
        }
    }
}

fn row3(p: &PlanePoint) -> RowVector3<f64> {
    RowVector3::new(p.x, p.y, p.z)
}

/// Edge vectors and unit normal of a triangle, one per row
fn lmn(t: &[PlanePoint; 3]) -> Matrix3<f64> {
    let e1 = row3(&t[1]) - row3(&t[0]);
    let e2 = row3(&t[2]) - row3(&t[0]);
    let normal = e1.cross(&e2);
    let length = normal.norm();
    let normal = if length > 0.0 {
        normal / length
    } else {
        RowVector3::zeros()
    };
    Matrix3::from_rows(&[e1, e2, normal])
}

/// Inverse from the transposed cofactor matrix
fn cofactor_inverse(m: &Matrix3<f64>, det: f64) -> Matrix3<f64> {
    let minor = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
    };
    Matrix3::new(
        minor(1, 2, 1, 2),
        -minor(0, 2, 1, 2),
        minor(0, 1, 1, 2),
        -minor(1, 2, 0, 2),
        minor(0, 2, 0, 2),
        -minor(0, 1, 0, 2),
        minor(1, 2, 0, 1),
        -minor(0, 2, 0, 1),
        minor(0, 1, 0, 1),
    ) / det
}

/// Either transform form behind one interface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// 2D affine map
    Affine(AffineTransform),
    /// 3D direction-cosine map
    Taki(TakiTransform),
}

impl Transform {
    /// Assemble a transform of the requested kind
    pub fn assemble(
        kind: TransformKind,
        src: &[PlanePoint; 3],
        dst: &[PlanePoint; 3],
    ) -> Result<Self, AlignmentError> {
        match kind {
            TransformKind::Affine => AffineTransform::assemble(src, dst).map(Transform::Affine),
            TransformKind::Taki => TakiTransform::assemble(src, dst).map(Transform::Taki),
        }
    }

    /// Which form this is
    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::Affine(_) => TransformKind::Affine,
            Transform::Taki(_) => TransformKind::Taki,
        }
    }

    /// Map a point
    pub fn apply(&self, point: &PlanePoint) -> PlanePoint {
        match self {
            Transform::Affine(t) => t.apply(point),
            Transform::Taki(t) => t.apply(point),
        }
    }
}
