//! `BoundaryId`: the six faces of a hexahedral element.
//!
//! Faces are numbered `GAMMA_1 ..= GAMMA_6`. The vertical pair carries the
//! semantic aliases [`BoundaryId::SHALLOW_FACE`] (towards the surface) and
//! [`BoundaryId::DEEP_FACE`]; the lateral faces are [`BoundaryId::FRONT`],
//! [`BoundaryId::RIGHT`], [`BoundaryId::BACK`] and [`BoundaryId::LEFT`].
//!
//! ```text
//!            Back (j+1)
//!          +-----------+
//!   Left   |           |  Right
//!   (i-1)  |   (i,j)   |  (i+1)
//!          +-----------+
//!            Front (j-1)
//! ```

use std::fmt;

/// One face of a hexahedral element.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(u8)]
pub enum BoundaryId {
    Gamma1 = 0,
    Gamma2 = 1,
    Gamma3 = 2,
    Gamma4 = 3,
    Gamma5 = 4,
    Gamma6 = 5,
}

impl BoundaryId {
    /// Face towards the surface (decreasing depth).
    pub const SHALLOW_FACE: Self = BoundaryId::Gamma1;
    /// Face towards the basement (increasing depth).
    pub const DEEP_FACE: Self = BoundaryId::Gamma6;
    /// Lateral face towards `j - 1`.
    pub const FRONT: Self = BoundaryId::Gamma2;
    /// Lateral face towards `i + 1`.
    pub const RIGHT: Self = BoundaryId::Gamma3;
    /// Lateral face towards `j + 1`.
    pub const BACK: Self = BoundaryId::Gamma4;
    /// Lateral face towards `i - 1`.
    pub const LEFT: Self = BoundaryId::Gamma5;

    /// Number of faces of a hexahedron.
    pub const COUNT: usize = 6;

    /// All faces in `GAMMA` order.
    pub const ALL: [Self; 6] = [
        BoundaryId::Gamma1,
        BoundaryId::Gamma2,
        BoundaryId::Gamma3,
        BoundaryId::Gamma4,
        BoundaryId::Gamma5,
        BoundaryId::Gamma6,
    ];

    /// The four lateral faces, in `Front, Right, Back, Left` order.
    pub const LATERAL: [Self; 4] = [Self::FRONT, Self::RIGHT, Self::BACK, Self::LEFT];

    /// The face on the other side of the element.
    ///
    /// An involution without fixed points:
    /// `GAMMA_1 <-> GAMMA_6`, `GAMMA_2 <-> GAMMA_4`, `GAMMA_3 <-> GAMMA_5`.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            BoundaryId::Gamma1 => BoundaryId::Gamma6,
            BoundaryId::Gamma2 => BoundaryId::Gamma4,
            BoundaryId::Gamma3 => BoundaryId::Gamma5,
            BoundaryId::Gamma4 => BoundaryId::Gamma2,
            BoundaryId::Gamma5 => BoundaryId::Gamma3,
            BoundaryId::Gamma6 => BoundaryId::Gamma1,
        }
    }

    /// Zero-based slot of this face, usable to index per-face arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`BoundaryId::index`].
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// True for the four faces that are not shallow/deep.
    #[inline]
    pub const fn is_lateral(self) -> bool {
        !matches!(self, BoundaryId::Gamma1 | BoundaryId::Gamma6)
    }

    /// Step in `(i, j)` to the lateral neighbour across this face;
    /// `None` for the vertical faces.
    pub const fn lateral_offset(self) -> Option<(isize, isize)> {
        match self {
            BoundaryId::Gamma2 => Some((0, -1)),
            BoundaryId::Gamma3 => Some((1, 0)),
            BoundaryId::Gamma4 => Some((0, 1)),
            BoundaryId::Gamma5 => Some((-1, 0)),
            BoundaryId::Gamma1 | BoundaryId::Gamma6 => None,
        }
    }

    /// Canonical name of the face, for diagnostics.
    pub const fn image(self) -> &'static str {
        match self {
            BoundaryId::Gamma1 => "GAMMA_1",
            BoundaryId::Gamma2 => "GAMMA_2",
            BoundaryId::Gamma3 => "GAMMA_3",
            BoundaryId::Gamma4 => "GAMMA_4",
            BoundaryId::Gamma5 => "GAMMA_5",
            BoundaryId::Gamma6 => "GAMMA_6",
        }
    }

    /// Semantic alias of the face, for diagnostics.
    pub const fn alias_image(self) -> &'static str {
        match self {
            BoundaryId::Gamma1 => "ShallowFace",
            BoundaryId::Gamma2 => "Front",
            BoundaryId::Gamma3 => "Right",
            BoundaryId::Gamma4 => "Back",
            BoundaryId::Gamma5 => "Left",
            BoundaryId::Gamma6 => "DeepFace",
        }
    }
}

impl fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.image())
    }
}
