//! The cursor family
//!
//! | cursor | image | sequential | random access |
//! |---|---|---|---|
//! | [`ArrayCursor`] | [`ArrayImg`] | raster order | no |
//! | [`ArrayRandomAccess`] | [`ArrayImg`] | raster order | yes |
//! | [`CellCursor`] | [`CellImg`] | cell by cell | no |
//! | [`CellRandomAccess`] | [`CellImg`] | no | yes |
//! | [`LocalNeighborhoodCursor`] | any random access | 3^D - 1 neighbors | no |
//! | [`RegionOfInterestCursor`] | any random access | raster order of a sub-box | no |
//!
//! Cursors are generic over how they hold their image: through `&Img` they are
//! read-only and `Clone`, through `&mut Img` they also implement
//! [`SamplerMut`]. Every sequential cursor is also a [`LendingIterator`] whose
//! `next` steps forward and reads.

use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

use duplicate::duplicate;
use gat_lending_iterator::LendingIterator;

use crate::img::{ArrayImg, CellImg};

pub mod array;
pub mod cell;
pub mod interval;
pub mod neighborhood;
pub mod roi;
pub mod traits;

pub use array::{ArrayCursor, ArrayRandomAccess};
pub use cell::{CellCursor, CellRandomAccess};
pub use interval::{raster_step, ZeroMinIntervalIterator};
pub use neighborhood::LocalNeighborhoodCursor;
pub use roi::RegionOfInterestCursor;
pub use traits::{Localizable, RandomlyPositionable, Sampler, SamplerMut, SequentialIterable};

/// `(x, y, ...) = value`, or `(x, y, ...) = none` off the stored elements.
fn fmt_location<C>(cursor: &C, f: &mut Formatter<'_>) -> fmt::Result
where
    C: Localizable + Sampler,
    C::Element: Display,
{
    match cursor.get() {
        Some(value) => write!(f, "{} = {}", cursor.position(), value),
        None => write!(f, "{} = none", cursor.position()),
    }
}

duplicate! {
    [cursor_type img_type reference;
    [ArrayCursor] [ArrayImg] [&'a];
    [ArrayCursor] [ArrayImg] [&'a mut];
    [ArrayRandomAccess] [ArrayImg] [&'a];
    [ArrayRandomAccess] [ArrayImg] [&'a mut];
    [CellCursor] [CellImg] [&'a];
    [CellCursor] [CellImg] [&'a mut];]

impl<'a, T> LendingIterator for cursor_type<reference img_type<T>> {
    type Item<'r>
        = &'r T
    where
        Self: 'r;

    fn next(&mut self) -> Option<Self::Item<'_>> {
        self.fwd();
        <Self as Sampler>::get(self)
    }
}
}

duplicate! {
    [cursor_type img_type;
    [ArrayCursor] [ArrayImg];
    [ArrayRandomAccess] [ArrayImg];
    [CellCursor] [CellImg];
    [CellRandomAccess] [CellImg];]

impl<T: Display, I: Deref<Target = img_type<T>>> Display for cursor_type<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_location(self, f)
    }
}
}

duplicate! {
    [cursor_type; [LocalNeighborhoodCursor]; [RegionOfInterestCursor];]

impl<S: RandomlyPositionable + Sampler> LendingIterator for cursor_type<S> {
    type Item<'r>
        = &'r <cursor_type<S> as Sampler>::Element
    where
        Self: 'r;

    fn next(&mut self) -> Option<Self::Item<'_>> {
        self.fwd();
        <Self as Sampler>::get(self)
    }
}

impl<S: Localizable + Sampler> Display for cursor_type<S>
where
    S::Element: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_location(self, f)
    }
}
}
