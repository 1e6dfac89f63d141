use delegate::delegate;

use super::interval::ZeroMinIntervalIterator;
use super::traits::{Localizable, RandomlyPositionable, Sampler, SamplerMut, SequentialIterable};
use crate::structure::{Coordinate, Dimensions, Position};

/// Walks the box `[offset, offset + size)` of a random-access source in raster
/// order. Like the neighborhood cursor it does not check that the box lies
/// inside the image.
#[derive(Debug, Clone)]
pub struct RegionOfInterestCursor<S> {
    source: S,
    driver: ZeroMinIntervalIterator,
    offset: Position,
}

impl<S: RandomlyPositionable> RegionOfInterestCursor<S> {
    /// # Panics
    ///
    /// If `offset` or `size` do not have the dimensionality of the source.
    pub fn new(source: S, offset: &[Coordinate], size: Dimensions) -> Self {
        let n = source.num_dimensions();
        assert!(
            offset.len() == n && size.num_dimensions() == n,
            "dimensionality mismatch: region {:?} + {} in a {}-dimensional source",
            offset,
            size,
            n
        );
        RegionOfInterestCursor {
            source,
            driver: ZeroMinIntervalIterator::new(size),
            offset: Position::from(offset),
        }
    }

    pub fn offset(&self) -> &Position {
        &self.offset
    }

    pub fn size(&self) -> &Dimensions {
        self.driver.dimensions()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: RandomlyPositionable> SequentialIterable for RegionOfInterestCursor<S> {
    fn fwd(&mut self) {
        self.driver.fwd();
        if self.driver.index().is_none() {
            return;
        }
        let local = self.driver.current();
        for (d, (&o, &l)) in self.offset.iter().zip(local).enumerate() {
            self.source.set_position_dim(o + l, d);
        }
    }

    fn has_next(&self) -> bool {
        self.driver.has_next()
    }

    fn reset(&mut self) {
        self.driver.reset();
    }
}

impl<S: Localizable> Localizable for RegionOfInterestCursor<S> {
    delegate! {
        to self.source {
            fn num_dimensions(&self) -> usize;
            fn position_dim(&self, dim: usize) -> Coordinate;
            fn localize(&self, position: &mut [Coordinate]);
            fn position(&self) -> Position;
        }
    }
}

impl<S: Sampler> Sampler for RegionOfInterestCursor<S> {
    type Element = S::Element;

    fn get(&self) -> Option<&S::Element> {
        self.driver.index()?;
        self.source.get()
    }
}

impl<S: SamplerMut> SamplerMut for RegionOfInterestCursor<S> {
    fn get_mut(&mut self) -> Option<&mut S::Element> {
        self.driver.index()?;
        self.source.get_mut()
    }
}
