//! Vector type alias for terrain normals and directions.

use nalgebra::Vector3;

/// 3D vector in the local east/north/up frame.
///
/// Alias for `nalgebra::Vector3<f32>`, used for surface normals when turning
/// elevation gradients into cell inclination and true surface area.
pub type Vec3 = Vector3<f32>;
