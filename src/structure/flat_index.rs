use bincode::Decode;
use bincode::Encode;
use derive_more::Add;
use derive_more::AddAssign;
use derive_more::Display;
use derive_more::From;
use derive_more::Into;
use derive_more::Sub;
use derive_more::SubAssign;

use serde::{Deserialize, Serialize};

/// A storage locator inside one contiguous buffer, i.e. the linear index of an element.
#[derive(
    Debug,
    Copy,
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
    Display,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Encode,
    Decode,
)]
#[display(fmt = "{}", index)]
pub struct FlatIndex {
    index: usize,
}

impl FlatIndex {
    /// Converts a signed linear offset, `None` if it is negative.
    pub fn from_signed(index: i64) -> Option<Self> {
        usize::try_from(index).ok().map(FlatIndex::from)
    }
}
