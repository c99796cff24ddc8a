use std::borrow::Cow;
use std::fmt;

/// Length prefixed string pulled out of a save buffer.
///
/// The format makes no promise about the encoding of string contents, so the
/// raw bytes are kept as-is and only converted (lossily) when displayed.
///
/// ```
/// use savedump::SaveStr;
///
/// let v1 = SaveStr::new(b"Sword");
/// assert_eq!(v1.to_utf8(), "Sword");
///
/// let v2 = SaveStr::new(&[b'a', 0xff][..]);
/// assert_eq!(v2.view_data(), &[b'a', 0xff]);
/// assert_eq!(v2.to_utf8(), "a\u{FFFD}");
/// ```
#[derive(PartialEq, Eq, Copy, Clone, Default)]
pub struct SaveStr<'a> {
    data: &'a [u8],
}

impl<'a> SaveStr<'a> {
    pub fn new(data: &'a [u8]) -> SaveStr<'a> {
        SaveStr { data }
    }

    /// View the underlying bytes exactly as they appear in the save
    pub fn view_data(&self) -> &'a [u8] {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert to utf8, replacing invalid sequences. Only allocates when the
    /// data is not already utf8.
    pub fn to_utf8(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.data)
    }

    pub fn to_utf8_owned(&self) -> String {
        self.to_utf8().into_owned()
    }
}

impl<'a> fmt::Debug for SaveStr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SaveStr {{ {} }}", self)
    }
}

impl<'a> fmt::Display for SaveStr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_utf8())
    }
}

#[cfg(feature = "serde")]
impl<'a> serde::Serialize for SaveStr<'a> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_utf8())
    }
}

/// A single decoded value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value"))]
pub enum FieldValue<'a> {
    Int32(i32),
    Int16(i16),
    UInt8(u8),
    Float32(f32),
    Float64(f64),
    Str(SaveStr<'a>),

    /// A region of the given number of bytes that was stepped over without
    /// being interpreted
    Skipped(usize),
}

impl<'a> FieldValue<'a> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, FieldValue::Skipped(_))
    }

    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            FieldValue::Int32(x) => Some(x),
            FieldValue::Int16(x) => Some(i32::from(x)),
            FieldValue::UInt8(x) => Some(i32::from(x)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::Float32(x) => Some(f64::from(x)),
            FieldValue::Float64(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<SaveStr<'a>> {
        match *self {
            FieldValue::Str(x) => Some(x),
            _ => None,
        }
    }
}

/// One labeled output unit of a decode, in the order the field was read
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldRecord<'a> {
    /// Name of the field
    pub label: &'static str,

    /// Nesting level of the field. Entries of the player table, the player
    /// detail block and the inventory list sit below the top level.
    pub depth: u8,

    /// Byte offset in the buffer where the field starts
    pub offset: usize,

    pub value: FieldValue<'a>,
}

impl<'a> FieldRecord<'a> {
    pub fn new(label: &'static str, depth: u8, offset: usize, value: FieldValue<'a>) -> Self {
        FieldRecord {
            label,
            depth,
            offset,
            value,
        }
    }
}

/// The five big endian world coordinates at the start of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldCoords {
    pub x: i32,
    pub y: i32,
    pub xa: i32,
    pub ya: i32,
    pub za: i32,
}

/// The position float block that follows the world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x_offset: f32,
    pub y_offset: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Entry of the player table.
///
/// Only entries with a type of zero are known to carry data. Anything past
/// the type byte of other entries is not understood and is not consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTableEntry<'a> {
    pub kind: u8,

    /// Present when `kind` is zero
    pub name: Option<SaveStr<'a>>,

    /// Present when the byte that trails the name is one. Whether that byte
    /// really is a marker for the value has not been confirmed.
    pub value: Option<f64>,
}

/// Extracted color channels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red channel
    pub r: f32,

    /// Green channel
    pub g: f32,

    /// Blue channel
    pub b: f32,
}

/// Appearance and identity fields that follow the player id in the extended
/// layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerAppearance<'a> {
    pub forename: SaveStr<'a>,
    pub surname: SaveStr<'a>,
    pub legs: SaveStr<'a>,
    pub torso: SaveStr<'a>,
    pub head: SaveStr<'a>,
    pub top: SaveStr<'a>,
    pub bottoms: SaveStr<'a>,
    pub shoes: SaveStr<'a>,
    pub shoes_palette: SaveStr<'a>,
    pub bottoms_palette: SaveStr<'a>,
    pub top_palette: SaveStr<'a>,
    pub skin_palette: SaveStr<'a>,
    pub hair: SaveStr<'a>,
    pub gender: i32,
    pub profession: SaveStr<'a>,
    pub hair_color: Color,
    pub top_color: Color,
    pub trouser_color: Color,
    pub unknown: [f32; 4],
}

/// The optional player detail block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerDetail<'a> {
    pub id: i32,

    /// Only decoded with [PlayerLayout::Extended](crate::PlayerLayout::Extended)
    pub appearance: Option<PlayerAppearance<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryEntry<'a> {
    pub name: SaveStr<'a>,
    pub uses: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inventory<'a> {
    pub kind: SaveStr<'a>,
    pub explored: u8,

    /// The count as stored in the save. May exceed `items.len()` depending on
    /// the [InventoryPolicy](crate::InventoryPolicy).
    pub count: i16,
    pub items: Vec<InventoryEntry<'a>>,
}

/// Typed view of a fully decoded save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveFile<'a> {
    pub world: WorldCoords,
    pub position: Position,
    pub direction: i32,

    /// `None` when the control byte before the table was zero
    pub player_table: Option<Vec<PlayerTableEntry<'a>>>,

    /// `None` when the control byte before the block was zero
    pub player: Option<PlayerDetail<'a>>,
    pub inventory: Inventory<'a>,
}
