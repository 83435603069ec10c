//! Embedding matrix representations.

use ndarray::{Array2, ArrayView2, Axis, CowArray, Ix1};

/// Embedding matrix storage.
///
/// This trait abstracts over the concrete representation of the
/// embedding matrix, so that embeddings can be looked up by vocabulary
/// index regardless of how they are stored.
pub trait Storage {
    /// Get the embedding `idx`.
    fn embedding(&self, idx: usize) -> CowArray<f32, Ix1>;

    /// Get the shape of the embedding matrix, *(n_embeddings, dims)*.
    fn shape(&self) -> (usize, usize);
}

/// Storage that provides a view of the embedding matrix.
pub trait StorageView: Storage {
    /// Get a view of the embedding matrix.
    fn view(&self) -> ArrayView2<f32>;
}

/// In-memory `ndarray` matrix storage.
#[derive(Clone, Debug, PartialEq)]
pub struct NdArray {
    inner: Array2<f32>,
}

impl NdArray {
    pub fn new(arr: Array2<f32>) -> Self {
        NdArray { inner: arr }
    }
}

impl Storage for NdArray {
    fn embedding(&self, idx: usize) -> CowArray<f32, Ix1> {
        CowArray::from(self.inner.index_axis(Axis(0), idx))
    }

    fn shape(&self) -> (usize, usize) {
        self.inner.dim()
    }
}

impl StorageView for NdArray {
    fn view(&self) -> ArrayView2<f32> {
        self.inner.view()
    }
}
