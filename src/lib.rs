/*!

A decoder for a binary game save format that has only partly been reverse
engineered.

A save is walked front to back with a bounds checked [ByteCursor], and every
field that is understood comes out as a labeled [FieldRecord]. Regions whose
meaning is unknown are stepped over and recorded as
[FieldValue::Skipped], never guessed at.

## Quick Start

```rust
use savedump::{FieldValue, Reporter};

let mut data = Vec::new();
for i in 1..=5i32 {
    data.extend_from_slice(&i.to_be_bytes()); // world coordinates
}
data.extend_from_slice(&[0; 5]); // unknown block
for f in [0.5f32, 1.5, 2.5, 3.5, 4.5] {
    data.extend_from_slice(&f.to_le_bytes()); // position
}
data.extend_from_slice(&7i32.to_be_bytes()); // player direction
data.extend_from_slice(&[0, 0]); // no player table, no player block
data.extend_from_slice(&[0x00, 0x05]);
data.extend_from_slice(b"Sword"); // inventory type
data.push(1); // explored
data.extend_from_slice(&0i16.to_be_bytes()); // item count

let records = savedump::decode(&data).unwrap();
let last = records.last().unwrap();
assert_eq!(last.label, "InvCount");
assert_eq!(last.value, FieldValue::Int16(0));

let mut out = Vec::new();
Reporter::new(&mut out).write_records(&records).unwrap();
assert!(out.starts_with(b"WorldX : 1\nWorldY : 2\n"));
```

## Byte Order

Most multi byte fields are stored big endian. The position float block is the
exception and is stored little endian. Both are decoded as stored, the
asymmetry belongs to the format.

## Ambiguities

Some parts of the format are decoded on a best guess basis and can be
configured through a [DecoderBuilder]:

- The player detail block comes in a [Minimal](PlayerLayout::Minimal) and an
  [Extended](PlayerLayout::Extended) layout. Nothing in the data says which.
- In the player table, a name is read as being followed by a marker byte
  where a value of 1 means a big endian f64 follows. This matches every save
  seen so far but has not been confirmed.
- The inventory count is trusted for only the first item by default
  ([InventoryPolicy::FirstOnly]). [InventoryPolicy::All] decodes every item.

## Errors

Running out of data is expected with malformed or unusual saves. Decoding
never panics; it stops at the first read that would go past the end and
returns a [DecodeError] holding every field decoded up to that point.

*/

mod cursor;
mod decoder;
mod errors;
mod load;
mod options;
mod report;
pub(crate) mod util;
mod value;

pub use self::cursor::{ByteCursor, CursorError, FixedWidth, ReadError};
pub use self::decoder::{decode, DecodeError, SaveDecoder, UNKNOWN_BLOCK_LEN};
pub use self::errors::*;
pub use self::load::load_file;
pub use self::options::{
    DecodeOptions, DecoderBuilder, Endian, InventoryPolicy, ParseOptionError, PlayerLayout,
};
pub use self::report::Reporter;
pub use self::value::*;
