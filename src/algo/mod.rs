//! Mesh processing algorithms.
//!
//! - **Curvature**: mixed Voronoi area, mean and Gaussian curvature
//! - **CVT**: Lloyd clustering of faces into patches
//!
//! Both only read mesh connectivity; clustering writes face-to-patch links and
//! patch representatives.

pub mod curvature;
pub mod cvt;
pub mod progress;

pub use progress::Progress;
