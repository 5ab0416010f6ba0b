//! Per-cell scalar output field.
//!
//! Holds the normalised snow depth of every cell in row-major order. Each slot
//! is written only by the task that owns the corresponding cell, so the driver
//! can hand out disjoint `&mut f32` to parallel workers without locking.

/// Scalar field over the simulation grid
///
/// Stores one value per cell as a flat `Vec<f32>` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    /// Field values in row-major order (y * width + x)
    pub data: Vec<f32>,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
}

/// The depth field written by the grid driver
pub type OutputField = FieldData;

impl FieldData {
    /// Create a new field with given dimensions, initialized to zero
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field has zero cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x]
    }

    /// Values scaled into [0, 1] by `max`, for texture/display consumers.
    ///
    /// An all-zero field (or `max <= 0`) maps to all zeros.
    #[must_use]
    pub fn normalized(&self, max: f32) -> Vec<f32> {
        if max <= 0.0 {
            return vec![0.0; self.data.len()];
        }
        self.data
            .iter()
            .map(|&v| (v / max).clamp(0.0, 1.0))
            .collect()
    }
}
