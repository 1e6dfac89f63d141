use bincode::{Decode, Encode};
use log::debug;
use num::Zero;
use serde::{Deserialize, Serialize};

use super::{GetElement, Img, ImgError, SetElement};
use crate::cursor::{ArrayCursor, ArrayRandomAccess};
use crate::structure::{Coordinate, Dimensions, FlatIndex, Position};

/// An image backed by a single contiguous buffer of `Π size[d]` elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Encode)]
#[serde(try_from = "RawArrayImg<T>")]
pub struct ArrayImg<T> {
    dimensions: Dimensions,
    data: Vec<T>,
}

/// Wire form of an [`ArrayImg`], checked by [`ArrayImg::new`] on the way in.
#[derive(Deserialize, Decode)]
struct RawArrayImg<T> {
    dimensions: Dimensions,
    data: Vec<T>,
}

impl<T> TryFrom<RawArrayImg<T>> for ArrayImg<T> {
    type Error = ImgError;

    fn try_from(raw: RawArrayImg<T>) -> Result<Self, ImgError> {
        ArrayImg::new(raw.dimensions, raw.data)
    }
}

decode_via_try_from!(ArrayImg<T>, RawArrayImg<T>, T);

impl<T> ArrayImg<T> {
    /// Wraps an existing buffer laid out in raster order.
    ///
    /// # Errors
    ///
    /// `DataLength` if the buffer does not have exactly one element per position.
    pub fn new(dimensions: Dimensions, data: Vec<T>) -> Result<Self, ImgError> {
        if data.len() != dimensions.size() {
            return Err(ImgError::DataLength(data.len(), dimensions.size()));
        }
        debug!(
            "array image {} over {} elements",
            dimensions,
            dimensions.size()
        );
        Ok(ArrayImg { dimensions, data })
    }

    /// Fills the image by calling `f` with every position in raster order.
    pub fn from_fn(dimensions: Dimensions, mut f: impl FnMut(&Position) -> T) -> Self {
        let mut position = Position::origin(dimensions.num_dimensions());
        let data = (0..dimensions.size())
            .map(|i| {
                dimensions.index_to_position(i.into(), &mut position);
                f(&position)
            })
            .collect();
        debug!("array image {} from fn", dimensions);
        ArrayImg { dimensions, data }
    }

    pub fn filled(dimensions: Dimensions, value: T) -> Self
    where
        T: Clone,
    {
        let data = vec![value; dimensions.size()];
        ArrayImg { dimensions, data }
    }

    pub fn zeros(dimensions: Dimensions) -> Self
    where
        T: Zero + Clone,
    {
        Self::filled(dimensions, T::zero())
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Allocation steps of the buffer
    pub fn strides(&self) -> Vec<usize> {
        self.dimensions.strides()
    }

    /// Sequential cursor reading the image in raster order
    pub fn cursor(&self) -> ArrayCursor<&Self> {
        ArrayCursor::new(self)
    }

    pub fn cursor_mut(&mut self) -> ArrayCursor<&mut Self> {
        ArrayCursor::new(self)
    }

    /// Localizable-by-dim cursor, placed before the first element
    pub fn random_access(&self) -> ArrayRandomAccess<&Self> {
        ArrayRandomAccess::new(self)
    }

    pub fn random_access_mut(&mut self) -> ArrayRandomAccess<&mut Self> {
        ArrayRandomAccess::new(self)
    }
}

impl<T> Img for ArrayImg<T> {
    type Locator = FlatIndex;

    fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    fn locate(&self, position: &[Coordinate]) -> FlatIndex {
        self.dimensions.position_to_index(position)
    }
}

impl<T> GetElement for ArrayImg<T> {
    type Element = T;

    fn get_at(&self, locator: FlatIndex) -> Option<&T> {
        self.data.get(usize::from(locator))
    }
}

impl<T> SetElement for ArrayImg<T> {
    fn get_mut_at(&mut self, locator: FlatIndex) -> Option<&mut T> {
        self.data.get_mut(usize::from(locator))
    }
}

/// Signed strides, as used by the cursors for relative moves.
pub(crate) fn signed_strides(dimensions: &Dimensions) -> Vec<i64> {
    dimensions.strides().into_iter().map(|s| s as i64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::linear_offset;

    fn img_3x2() -> ArrayImg<u32> {
        ArrayImg::from_fn(Dimensions::new(vec![3, 2]).unwrap(), |p| {
            (10 * p[1] + p[0]) as u32
        })
    }

    #[test]
    fn raster_layout() {
        let img = img_3x2();
        assert_eq!(img.data(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(img.locate(&[2, 1]), FlatIndex::from(5));
        assert_eq!(img.get_ref(&[1, 1]).unwrap(), &11);
        assert!(img.get_ref(&[3, 0]).is_err());
    }

    #[test]
    fn data_length_is_checked() {
        let err = ArrayImg::new(Dimensions::new(vec![2, 2]).unwrap(), vec![0u8; 3]).unwrap_err();
        assert_eq!(err, ImgError::DataLength(3, 4));
    }

    #[test]
    fn set_by_position_and_locator() {
        let mut img: ArrayImg<f64> = ArrayImg::zeros(Dimensions::new(vec![2, 2]).unwrap());
        img.set(&[1, 0], 2.5).unwrap();
        img.set_at(FlatIndex::from(3), -1.0).unwrap();
        assert_eq!(img.data(), &[0.0, 2.5, 0.0, -1.0]);
        assert!(img.set_at(FlatIndex::from(4), 0.0).is_err());
        assert!(img.set(&[0, 2], 0.0).is_err());
    }

    #[test]
    fn decoding_checks_the_buffer_length() {
        let config = bincode::config::standard();
        let img = img_3x2();

        let bytes = bincode::encode_to_vec(&img, config).unwrap();
        let (decoded, _): (ArrayImg<u32>, _) = bincode::decode_from_slice(&bytes, config).unwrap();
        assert_eq!(decoded, img);

        let short = bincode::encode_to_vec((vec![3usize, 3], vec![1u8, 2]), config).unwrap();
        let err = bincode::decode_from_slice::<ArrayImg<u8>, _>(&short, config).unwrap_err();
        assert!(err.to_string().contains("does not fill"), "{err}");

        let short = bincode::serde::encode_to_vec((vec![3usize, 3], vec![1u8, 2]), config).unwrap();
        assert!(bincode::serde::decode_from_slice::<ArrayImg<u8>, _>(&short, config).is_err());

        let bytes = bincode::serde::encode_to_vec(&img, config).unwrap();
        let (decoded, _): (ArrayImg<u32>, _) =
            bincode::serde::decode_from_slice(&bytes, config).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn signed_offsets_go_negative() {
        let img = img_3x2();
        let strides = signed_strides(img.dimensions());
        assert_eq!(linear_offset(&[-1, 0], &strides), -1);
        assert_eq!(linear_offset(&[0, 2], &strides), 6);
    }
}
