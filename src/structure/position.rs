use std::fmt::Display;
use std::ops::{Deref, DerefMut};

use bincode::Decode;
use bincode::Encode;
use derive_more::From;
use derive_more::Into;
use derive_more::IntoIterator;
use serde::{Deserialize, Serialize};

/// A single component of a [`Position`].
pub type Coordinate = i64;

/// A point of a D-dimensional integer lattice, dimension 0 first.
#[derive(
    Debug,
    Clone,
    Default,
    Ord,
    PartialOrd,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    From,
    Into,
    IntoIterator,
    Encode,
    Decode,
)]
#[serde(transparent)]
pub struct Position {
    coords: Vec<Coordinate>,
}

impl Position {
    pub fn new(coords: Vec<Coordinate>) -> Self {
        Position { coords }
    }

    /// The all-zero position of the given dimensionality.
    pub fn origin(num_dimensions: usize) -> Self {
        Position {
            coords: vec![0; num_dimensions],
        }
    }

    pub fn num_dimensions(&self) -> usize {
        self.coords.len()
    }

    /// Overwrites every component with the one of `other`.
    ///
    /// # Panics
    ///
    /// If the two positions have different dimensionality.
    pub fn copy_from(&mut self, other: &[Coordinate]) {
        self.coords.copy_from_slice(other);
    }
}

impl Deref for Position {
    type Target = [Coordinate];

    fn deref(&self) -> &Self::Target {
        &self.coords
    }
}

impl DerefMut for Position {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.coords
    }
}

impl AsRef<[Coordinate]> for Position {
    fn as_ref(&self) -> &[Coordinate] {
        &self.coords
    }
}

impl From<&[Coordinate]> for Position {
    fn from(value: &[Coordinate]) -> Self {
        Position {
            coords: value.to_vec(),
        }
    }
}

impl<const N: usize> From<[Coordinate; N]> for Position {
    fn from(value: [Coordinate; N]) -> Self {
        Position {
            coords: value.to_vec(),
        }
    }
}

impl FromIterator<Coordinate> for Position {
    fn from_iter<T: IntoIterator<Item = Coordinate>>(iter: T) -> Self {
        Position {
            coords: iter.into_iter().collect(),
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (d, c) in self.coords.iter().enumerate() {
            if d > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}
