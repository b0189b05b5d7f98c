//! Centroidal Voronoi face clustering using Lloyd's algorithm.
//!
//! Partitions the faces of a mesh into `k` patches that are compact in space
//! and coherent in orientation. Each patch keeps a representative center that
//! always lies on the mesh (the center of one of its member faces).
//!
//! # Algorithm
//!
//! 1. **Seeding**: importance-sample `k` distinct faces with probability
//!    proportional to `area × density`; each becomes a patch.
//! 2. **Region update**: assign every face to the patch of minimum energy
//!    `α · (2 / diam) · |c_p - c_f|² + (1 - α) · |n_p - n_f|²`.
//! 3. **Centroid update**: move each patch center to the member face nearest
//!    the weighted centroid of its members.
//! 4. Repeat 2-3 for a fixed number of iterations, then materialize the
//!    patch face sets.
//!
//! # Example
//!
//! ```
//! use patchwork::prelude::*;
//! use patchwork::algo::cvt::{lloyd_cvt, LloydOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0), Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let options = LloydOptions::new(2).with_iterations(10);
//! let summary = lloyd_cvt(&mut mesh, &options).unwrap();
//! assert_eq!(summary.patches, 2);
//! assert!(mesh.face_ids().all(|f| mesh.face_patch(f).is_some()));
//! ```
//!
//! # References
//!
//! - Cohen-Steiner, D., Alliez, P., Desbrun, M. (2004). "Variational Shape
//!   Approximation." ACM SIGGRAPH.
//! - Du, Q., Faber, V., Gunzburger, M. (1999). "Centroidal Voronoi
//!   Tessellations: Applications and Algorithms." SIAM Review.

use nalgebra::{Point3, Vector3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{Face, FaceId, HalfEdgeMesh, Patch, PatchId, NORMALIZE_EPS};

/// Options for Lloyd clustering.
#[derive(Debug, Clone)]
pub struct LloydOptions {
    /// Number of patches to create.
    pub regions: usize,

    /// Number of Lloyd iterations. Zero only seeds and assigns.
    pub iterations: usize,

    /// Weight of the positional term against the normal term, in `[0, 1]`.
    pub alpha: f64,

    /// Seed for the sampling RNG.
    pub seed: u64,

    /// Maximum number of random draws while seeding.
    ///
    /// `None` means `1000 × faces + 1000 × regions`.
    pub max_seed_attempts: Option<usize>,

    /// Whether to assign faces in parallel.
    pub parallel: bool,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            regions: 20,
            iterations: 200,
            alpha: 1.0,
            seed: 0,
            max_seed_attempts: None,
            parallel: true,
        }
    }
}

impl LloydOptions {
    /// Create options for the given number of patches.
    pub fn new(regions: usize) -> Self {
        Self {
            regions,
            ..Default::default()
        }
    }

    /// Set the number of Lloyd iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the position/normal weighting.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of draws made while seeding.
    pub fn with_max_seed_attempts(mut self, attempts: usize) -> Self {
        self.max_seed_attempts = Some(attempts);
        self
    }

    /// Set whether region assignment runs in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that the options describe a runnable clustering.
    pub fn validate(&self) -> Result<()> {
        if self.regions == 0 {
            return Err(MeshError::invalid_param(
                "regions",
                self.regions,
                "must be at least 1",
            ));
        }
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(MeshError::invalid_param(
                "alpha",
                self.alpha,
                "must lie in [0, 1]",
            ));
        }
        Ok(())
    }

    fn seed_attempt_limit(&self, num_faces: usize) -> usize {
        self.max_seed_attempts.unwrap_or_else(|| {
            num_faces
                .saturating_mul(1000)
                .saturating_add(self.regions.saturating_mul(1000))
        })
    }
}

/// Outcome of one centroid update.
#[derive(Debug, Clone, Default)]
pub struct CentroidReport {
    /// Patches that had no (weighted) members and kept their old center.
    pub empty_patches: Vec<PatchId>,

    /// Largest distance a patch center moved.
    pub max_shift: f64,
}

/// Outcome of a full clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LloydSummary {
    /// Number of patches created.
    pub patches: usize,

    /// Number of Lloyd iterations performed.
    pub iterations: usize,

    /// Patches left without faces after materialization.
    pub empty_patches: usize,
}

/// A Lloyd clustering policy.
///
/// The driver ([`run`]) only sees these two phases, so variants with other
/// distance measures plug in without touching the iteration loop.
pub trait CvtVariant {
    /// Point every face at its best patch.
    fn update_regions(&self, mesh: &mut HalfEdgeMesh);

    /// Recompute every patch representative from its current members.
    fn update_centroids(&self, mesh: &mut HalfEdgeMesh) -> CentroidReport;
}

/// Euclidean Lloyd clustering on face centers and normals.
#[derive(Debug, Clone, Copy)]
pub struct LloydCvt {
    alpha: f64,
    distance_scale: f64,
    parallel: bool,
}

impl LloydCvt {
    /// Create the variant for a mesh; the positional term is scaled by
    /// `2 / diameter` so the energy does not depend on mesh size.
    ///
    /// Fails if `options` does not pass [`LloydOptions::validate`].
    pub fn new(mesh: &HalfEdgeMesh, options: &LloydOptions) -> Result<Self> {
        options.validate()?;

        let diameter = mesh.diameter();
        let distance_scale = if diameter > 0.0 { 2.0 / diameter } else { 0.0 };
        Ok(Self {
            alpha: options.alpha,
            distance_scale,
            parallel: options.parallel,
        })
    }

    /// Energy of assigning `face` to `patch`.
    #[inline]
    pub fn energy(&self, patch: &Patch, face: &Face) -> f64 {
        let dc = (patch.center - face.center).norm_squared();
        let dn = (patch.normal - face.normal).norm_squared();
        self.alpha * self.distance_scale * dc + (1.0 - self.alpha) * dn
    }

    /// Lowest-energy patch for a face; the lowest patch index wins ties.
    fn nearest_patch(&self, mesh: &HalfEdgeMesh, f: FaceId) -> PatchId {
        let face = mesh.face(f);
        let mut best = PatchId::new(0);
        let mut best_energy = f64::INFINITY;
        for patch in mesh.patches() {
            let e = self.energy(patch, face);
            if e < best_energy {
                best_energy = e;
                best = patch.id;
            }
        }
        best
    }
}

impl CvtVariant for LloydCvt {
    fn update_regions(&self, mesh: &mut HalfEdgeMesh) {
        if mesh.num_patches() == 0 {
            return;
        }

        let n = mesh.num_faces();
        let assignment: Vec<PatchId> = {
            let mesh = &*mesh;
            if self.parallel {
                (0..n)
                    .into_par_iter()
                    .map(|i| self.nearest_patch(mesh, FaceId::new(i)))
                    .collect()
            } else {
                (0..n)
                    .map(|i| self.nearest_patch(mesh, FaceId::new(i)))
                    .collect()
            }
        };

        for (i, p) in assignment.into_iter().enumerate() {
            mesh.assign_face(FaceId::new(i), p);
        }
    }

    fn update_centroids(&self, mesh: &mut HalfEdgeMesh) -> CentroidReport {
        let mut accumulators = vec![Accumulator::default(); mesh.num_patches()];

        // Relative weights keep the sums finite for huge densities
        let w_max = mesh
            .faces()
            .map(|(_, face)| sampling_weight(face))
            .fold(0.0_f64, f64::max);

        for (f, face) in mesh.faces() {
            if let Some(p) = face.patch() {
                let acc = &mut accumulators[p.index()];
                acc.members.push(f);

                let w = sampling_weight(face);
                if w > 0.0 {
                    let w = w / w_max;
                    acc.weighted_center += w * face.center.coords;
                    acc.weighted_normal += w * face.normal;
                    acc.weight += w;
                }
            }
        }

        let mut report = CentroidReport::default();

        for (i, acc) in accumulators.iter().enumerate() {
            let p = PatchId::new(i);
            let weighted = acc.weight > 0.0;
            if acc.members.is_empty() || !weighted {
                report.empty_patches.push(p);
                continue;
            }

            let centroid = Point3::from(acc.weighted_center / acc.weight);
            let center_face = project_to_region(mesh, &acc.members, &centroid);
            let center = mesh.face(center_face).center;
            let normal = acc.weighted_normal.try_normalize(NORMALIZE_EPS);

            let patch = mesh.patch_mut(p);
            report.max_shift = report.max_shift.max((center - patch.center).norm());
            patch.center_face = center_face;
            patch.center = center;
            if let Some(normal) = normal {
                patch.normal = normal;
            }
        }

        if !report.empty_patches.is_empty() {
            log::warn!(
                "lloyd: {} patch(es) without members keep stale centers: {:?}",
                report.empty_patches.len(),
                report.empty_patches
            );
        }

        report
    }
}

/// Per-patch sums gathered during a centroid update.
#[derive(Debug, Clone)]
struct Accumulator {
    weighted_center: Vector3<f64>,
    weighted_normal: Vector3<f64>,
    weight: f64,
    members: Vec<FaceId>,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            weighted_center: Vector3::zeros(),
            weighted_normal: Vector3::zeros(),
            weight: 0.0,
            members: Vec::new(),
        }
    }
}

/// `area × density`, or zero when that is not a finite positive number.
fn sampling_weight(face: &Face) -> f64 {
    let w = face.area * face.density;
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

/// Member face whose cached center is closest to `point` (first wins).
fn project_to_region(mesh: &HalfEdgeMesh, members: &[FaceId], point: &Point3<f64>) -> FaceId {
    let mut best = members[0];
    let mut best_dist = f64::INFINITY;
    for &f in members {
        let d = (mesh.face(f).center - point).norm_squared();
        if d < best_dist {
            best_dist = d;
            best = f;
        }
    }
    best
}

/// Seed `options.regions` patches by rejection sampling.
///
/// Refreshes face geometry and vertex normals and drops any previous patches
/// first. A face is accepted with probability `w_f / w_max` where
/// `w_f = area × density`; faces whose weight is not finite and positive
/// never seed. A face never seeds two patches.
///
/// # Errors
///
/// - [`MeshError::EmptyMesh`] if the mesh has no faces
/// - [`MeshError::InsufficientSeeds`] if fewer faces than requested have
///   positive weight, or the attempt limit runs out
pub fn initialize_centroids(mesh: &mut HalfEdgeMesh, options: &LloydOptions) -> Result<()> {
    let n = mesh.num_faces();
    if n == 0 {
        return Err(MeshError::EmptyMesh);
    }

    mesh.clear_patches();
    mesh.update_face_geometry();
    mesh.update_vertex_normals();

    let k = options.regions;
    let weights: Vec<f64> = mesh.faces().map(|(_, f)| sampling_weight(f)).collect();
    let eligible = weights.iter().filter(|&&w| w > 0.0).count();

    if eligible < k {
        return Err(MeshError::InsufficientSeeds {
            requested: k,
            available: eligible,
            attempts: 0,
        });
    }

    let w_max = weights.iter().copied().fold(0.0_f64, f64::max);
    let limit = options.seed_attempt_limit(n);
    let mut rng = SmallRng::seed_from_u64(options.seed);
    let mut seeded = vec![false; n];
    let mut attempts = 0;

    while mesh.num_patches() < k {
        if attempts >= limit {
            return Err(MeshError::InsufficientSeeds {
                requested: k,
                available: eligible,
                attempts,
            });
        }
        attempts += 1;

        let fi = rng.gen_range(0..n);
        let d: f64 = rng.gen();
        let accepted = d < weights[fi] / w_max;
        if seeded[fi] || !accepted {
            continue;
        }

        seeded[fi] = true;
        let p = mesh.add_patch(FaceId::new(fi));
        log::debug!("lloyd: seeded {:?} at face {} (draw {})", p, fi, attempts);
    }

    log::debug!("lloyd: {} seeds placed in {} draws", k, attempts);
    Ok(())
}

/// Run Lloyd clustering with a given variant.
///
/// Seeds, alternates region and centroid updates `options.iterations` times,
/// then materializes patch face sets. Every face belongs to a patch when this
/// returns successfully.
pub fn run<V: CvtVariant>(
    mesh: &mut HalfEdgeMesh,
    variant: &V,
    options: &LloydOptions,
) -> Result<LloydSummary> {
    run_internal(mesh, variant, options, None)
}

/// Run Lloyd clustering with progress reporting.
///
/// See [`run`] for details.
pub fn run_with_progress<V: CvtVariant>(
    mesh: &mut HalfEdgeMesh,
    variant: &V,
    options: &LloydOptions,
    progress: &Progress,
) -> Result<LloydSummary> {
    run_internal(mesh, variant, options, Some(progress))
}

fn run_internal<V: CvtVariant>(
    mesh: &mut HalfEdgeMesh,
    variant: &V,
    options: &LloydOptions,
    progress: Option<&Progress>,
) -> Result<LloydSummary> {
    options.validate()?;
    initialize_centroids(mesh, options)?;

    for iter in 0..options.iterations {
        if let Some(p) = progress {
            p.report(iter, options.iterations, "Lloyd iteration");
        }

        variant.update_regions(mesh);
        let report = variant.update_centroids(mesh);

        log::debug!(
            "lloyd: iteration {} max shift {:.3e}, {} empty",
            iter,
            report.max_shift,
            report.empty_patches.len()
        );
    }

    // Only seed faces are assigned when no iteration ran
    if mesh.faces().any(|(_, face)| face.patch().is_none()) {
        variant.update_regions(mesh);
    }

    mesh.materialize_patches();

    if let Some(p) = progress {
        p.report(options.iterations, options.iterations, "Lloyd clustering complete");
    }

    let summary = LloydSummary {
        patches: mesh.num_patches(),
        iterations: options.iterations,
        empty_patches: mesh.patches().filter(|p| p.is_empty()).count(),
    };

    log::info!(
        "lloyd: {} faces in {} patches after {} iterations ({} empty)",
        mesh.num_faces(),
        summary.patches,
        summary.iterations,
        summary.empty_patches
    );

    Ok(summary)
}

/// Cluster mesh faces with Euclidean Lloyd relaxation.
pub fn lloyd_cvt(mesh: &mut HalfEdgeMesh, options: &LloydOptions) -> Result<LloydSummary> {
    let variant = LloydCvt::new(mesh, options)?;
    run(mesh, &variant, options)
}

/// Cluster mesh faces with Euclidean Lloyd relaxation and progress reporting.
pub fn lloyd_cvt_with_progress(
    mesh: &mut HalfEdgeMesh,
    options: &LloydOptions,
    progress: &Progress,
) -> Result<LloydSummary> {
    let variant = LloydCvt::new(mesh, options)?;
    run_with_progress(mesh, &variant, options, progress)
}
