//! Handle types for mesh elements.
//!
//! Every entity of a [`HalfEdgeMesh`](super::HalfEdgeMesh) lives in a per-type
//! arena and is addressed by a typed `u32` handle. Handles are stable for the
//! lifetime of the mesh; a reserved sentinel value stands in for "no element".
//!
//! Half-edges are allocated in mate pairs: edge `e` owns half-edges `2e` and
//! `2e + 1`, so [`HalfEdgeId::mate`] and [`HalfEdgeId::edge`] need no lookup.

use std::fmt::{self, Debug};

const INVALID: u32 = u32::MAX;

/// A vertex handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A half-edge handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A full (undirected) edge handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

/// A face handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

/// A patch handle. Equal to the patch's creation index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PatchId(u32);

macro_rules! impl_handle {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a handle from an arena index.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large for a handle", index);
                Self(index as u32)
            }

            /// Create the null handle.
            #[inline]
            pub const fn invalid() -> Self {
                Self(INVALID)
            }

            /// Arena index of this handle.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a non-null handle.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_handle!(VertexId, "V");
impl_handle!(HalfEdgeId, "HE");
impl_handle!(EdgeId, "E");
impl_handle!(FaceId, "F");
impl_handle!(PatchId, "P");

impl HalfEdgeId {
    /// The oppositely directed half-edge of the same edge.
    #[inline]
    pub fn mate(self) -> Self {
        debug_assert!(self.is_valid());
        Self(self.0 ^ 1)
    }

    /// The edge this half-edge belongs to.
    #[inline]
    pub fn edge(self) -> EdgeId {
        debug_assert!(self.is_valid());
        EdgeId(self.0 >> 1)
    }
}

impl EdgeId {
    /// One of the two half-edges of this edge (`side` is 0 or 1).
    #[inline]
    pub fn halfedge(self, side: usize) -> HalfEdgeId {
        debug_assert!(side < 2);
        HalfEdgeId((self.0 << 1) | side as u32)
    }
}
