//! 3^D - 1 neighborhood around a center
//!
//! The cursor drives a random-access source through the box
//! `center - 1 ..= center + 1`, skipping the center itself. Visiting order is
//! the raster order of that box.
//!
//! Positions are not checked: the center must be at least one pixel away from
//! the border of the image, otherwise the source is moved outside and what it
//! reads there is up to the source. Pad the input if border pixels matter.

use delegate::delegate;
use log::trace;

use super::interval::ZeroMinIntervalIterator;
use super::traits::{Localizable, RandomlyPositionable, Sampler, SamplerMut, SequentialIterable};
use crate::structure::{position_to_index, Coordinate, Dimensions, FlatIndex, Position};

#[derive(Debug, Clone)]
pub struct LocalNeighborhoodCursor<S> {
    source: S,
    driver: ZeroMinIntervalIterator,
    center_minus_one: Position,
    center_index: FlatIndex,
}

impl<S: RandomlyPositionable> LocalNeighborhoodCursor<S> {
    /// # Panics
    ///
    /// If `center` does not have the dimensionality of the source.
    pub fn new(source: S, center: &[Coordinate]) -> Self {
        let n = source.num_dimensions();
        assert_eq!(
            center.len(),
            n,
            "dimensionality mismatch: center {:?} for a {}-dimensional source",
            center,
            n
        );
        let ones = vec![1; n];
        let threes = vec![3; n];
        LocalNeighborhoodCursor {
            source,
            driver: ZeroMinIntervalIterator::new(Dimensions::uniform(n, 3)),
            center_minus_one: center.iter().map(|c| c - 1).collect(),
            center_index: position_to_index(&ones, &threes),
        }
    }

    /// Moves the neighborhood to a new center and rewinds it, reusing all
    /// buffers.
    ///
    /// # Panics
    ///
    /// On a dimensionality mismatch.
    pub fn update(&mut self, center: &[Coordinate]) {
        assert_eq!(
            center.len(),
            self.center_minus_one.len(),
            "dimensionality mismatch"
        );
        for (m, &c) in self.center_minus_one.iter_mut().zip(center) {
            *m = c - 1;
        }
        self.driver.reset();
        trace!("neighborhood moved to {:?}", center);
    }

    pub fn center(&self) -> Position {
        self.center_minus_one.iter().map(|c| c + 1).collect()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Gives the source back, left wherever the last step put it.
    pub fn into_source(self) -> S {
        self.source
    }

    fn place_source(&mut self) {
        let offset = self.driver.current();
        for (d, (&m, &o)) in self.center_minus_one.iter().zip(offset).enumerate() {
            self.source.set_position_dim(m + o, d);
        }
    }
}

impl<S: RandomlyPositionable> SequentialIterable for LocalNeighborhoodCursor<S> {
    fn fwd(&mut self) {
        self.driver.fwd();
        if self.driver.index() == Some(self.center_index) {
            self.driver.fwd();
        }
        if self.driver.index().is_some() {
            self.place_source();
        }
    }

    fn has_next(&self) -> bool {
        // the zero dimensional neighborhood only holds its center
        self.driver.has_next() && !self.center_minus_one.is_empty()
    }

    fn reset(&mut self) {
        self.driver.reset();
    }
}

impl<S: Localizable> Localizable for LocalNeighborhoodCursor<S> {
    delegate! {
        to self.source {
            fn num_dimensions(&self) -> usize;
            fn position_dim(&self, dim: usize) -> Coordinate;
            fn localize(&self, position: &mut [Coordinate]);
            fn position(&self) -> Position;
        }
    }
}

impl<S: Sampler> Sampler for LocalNeighborhoodCursor<S> {
    type Element = S::Element;

    fn get(&self) -> Option<&S::Element> {
        self.driver.index()?;
        self.source.get()
    }
}

impl<S: SamplerMut> SamplerMut for LocalNeighborhoodCursor<S> {
    fn get_mut(&mut self) -> Option<&mut S::Element> {
        self.driver.index()?;
        self.source.get_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::img::ArrayImg;

    #[test]
    fn center_index_is_the_middle_of_the_box() {
        let img = ArrayImg::<u8>::zeros(Dimensions::uniform(3, 4));
        let cursor = LocalNeighborhoodCursor::new(img.random_access(), &[1, 1, 1]);
        assert_eq!(cursor.center_index, FlatIndex::from(13));
        assert_eq!(cursor.center(), Position::from([1, 1, 1]));
    }

    #[test]
    #[should_panic(expected = "dimensionality mismatch")]
    fn center_must_match_the_source() {
        let img = ArrayImg::<u8>::zeros(Dimensions::uniform(2, 4));
        LocalNeighborhoodCursor::new(img.random_access(), &[1, 1, 1]);
    }
}
