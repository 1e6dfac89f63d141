/*!

Dimension-generic cursors over n-dimensional images.

An image is a box of elements addressed by integer positions, dimension 0
varying fastest. How a position maps to storage is the business of the
container: [`ArrayImg`] keeps everything in one flat buffer, [`CellImg`] tiles
the box with independently allocated cells. How a caller walks the positions
is the business of the cursor.

Cursors are described by small capability traits:
- [`SequentialIterable`]: step through a fixed sequence (`fwd`, `has_next`, `reset`)
- [`Localizable`]: report the current position
- [`RandomlyPositionable`]: jump to a position or move along single axes
- [`Sampler`] / [`SamplerMut`]: read or write the element under the cursor

Derived cursors such as [`LocalNeighborhoodCursor`] and
[`RegionOfInterestCursor`] drive any random-access cursor. They either own it
or borrow it mutably, so at most one of them moves a given cursor at a time.

```
use imgcursor::{ArrayImg, Dimensions, RandomlyPositionable, Sampler, SequentialIterable};

let dims = Dimensions::new(vec![4, 3]).unwrap();
let img = ArrayImg::from_fn(dims, |p| p[0] + 10 * p[1]);

let mut access = img.random_access();
let mut neighbors = access.local_neighborhood(&[1, 1]);
let mut sum = 0;
while neighbors.has_next() {
    neighbors.fwd();
    sum += neighbors.get().unwrap();
}
assert_eq!(sum, 8 * 11);
```

*/

/// Implements `Decode` and `BorrowDecode` by decoding `$raw` and converting it
/// with `TryFrom`, so decoded values pass the same checks as constructed ones.
macro_rules! decode_via_try_from {
    ($ty:ty, $raw:ty $(, $param:ident)*) => {
        impl<__Context $(, $param: ::bincode::Decode<__Context>)*> ::bincode::Decode<__Context>
            for $ty
        {
            fn decode<__D: ::bincode::de::Decoder<Context = __Context>>(
                decoder: &mut __D,
            ) -> core::result::Result<Self, ::bincode::error::DecodeError> {
                let raw: $raw = ::bincode::Decode::decode(decoder)?;
                Self::try_from(raw)
                    .map_err(|e| ::bincode::error::DecodeError::OtherString(e.to_string()))
            }
        }

        impl<'__de, __Context $(, $param: ::bincode::BorrowDecode<'__de, __Context>)*>
            ::bincode::BorrowDecode<'__de, __Context> for $ty
        {
            fn borrow_decode<__D: ::bincode::de::BorrowDecoder<'__de, Context = __Context>>(
                decoder: &mut __D,
            ) -> core::result::Result<Self, ::bincode::error::DecodeError> {
                let raw: $raw = ::bincode::BorrowDecode::borrow_decode(decoder)?;
                Self::try_from(raw)
                    .map_err(|e| ::bincode::error::DecodeError::OtherString(e.to_string()))
            }
        }
    };
}

/// Dimensions, positions and index arithmetic
pub mod structure;

/// Flat and chunked images
pub mod img;

/// Cursor traits and implementations
pub mod cursor;

pub use cursor::{
    ArrayCursor, ArrayRandomAccess, CellCursor, CellRandomAccess, LocalNeighborhoodCursor,
    Localizable, RandomlyPositionable, RegionOfInterestCursor, Sampler, SamplerMut,
    SequentialIterable, ZeroMinIntervalIterator,
};
pub use img::{ArrayImg, Cell, CellImg, CellLocator, GetElement, Img, ImgError, SetElement};
pub use structure::{Coordinate, Dimensions, FlatIndex, Position, StructureError};
