use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// The kinds of boundary a patch can describe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryType {
    /// An impermeable wall
    Wall,
    /// A boundary that is not modeled (e.g. the front and back of a 2D problem meshed in 3D)
    Empty,
}

impl FromStr for BoundaryType {
    type Err = BoundaryTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wall" => Ok(Self::Wall),
            "empty" => Ok(Self::Empty),
            other => Err(BoundaryTypeError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Wall => write!(f, "wall"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BoundaryTypeError {
    #[error("Invalid boundary type: '{0}'")]
    Unknown(String),
}

/// A named group of contiguous boundary `Face`s
///
/// All boundary faces are numbered after the internal faces, grouped contiguously by patch.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryPatch {
    pub name: String,
    pub kind: BoundaryType,
    pub n_faces: usize,
    pub start_face: usize,
}

impl BoundaryPatch {
    pub fn new(
        name: impl Into<String>,
        kind: BoundaryType,
        n_faces: usize,
        start_face: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            n_faces,
            start_face,
        }
    }

    /// Construct a patch with a boundary type given by name (`"wall"` or `"empty"`)
    pub fn with_type_name(
        name: impl Into<String>,
        kind: &str,
        n_faces: usize,
        start_face: usize,
    ) -> Result<Self, BoundaryTypeError> {
        Ok(Self::new(name, kind.parse()?, n_faces, start_face))
    }

    /// Range of Face ids covered by this patch
    pub fn faces(&self) -> Range<usize> {
        self.start_face..(self.start_face + self.n_faces)
    }
}

impl fmt::Display for BoundaryPatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}): faces [{}, {})",
            self.name,
            self.kind,
            self.start_face,
            self.start_face + self.n_faces
        )
    }
}
