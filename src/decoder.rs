use crate::{
    ByteCursor, Color, CursorError, DecodeOptions, Endian, FieldRecord, FieldValue, FixedWidth,
    Inventory, InventoryEntry, InventoryPolicy, PlayerAppearance, PlayerDetail, PlayerLayout,
    PlayerTableEntry, Position, SaveFile, SaveStr, WorldCoords,
};
use std::fmt;
use tracing::{debug, trace};

/// Width of the region between the world coordinates and the position block.
/// Its meaning is unknown and it is never interpreted.
pub const UNKNOWN_BLOCK_LEN: usize = 5;

const WORLD_LABELS: [&str; 5] = ["WorldX", "WorldY", "WorldXa", "WorldYa", "WorldZa"];
const POSITION_LABELS: [&str; 5] = ["x offset", "y offset", "X", "Y", "Z"];
const APPEARANCE_LABELS: [&str; 13] = [
    "Forename",
    "Surname",
    "Legs",
    "Torso",
    "Head",
    "Top",
    "Bottoms",
    "Shoes",
    "Shoespal",
    "Bottomspal",
    "Toppal",
    "Skinpal",
    "Hair",
];
const COLOR_LABELS: [&str; 9] = [
    "Hair Color R",
    "Hair Color G",
    "Hair Color B",
    "Top Color R",
    "Top Color G",
    "Top Color B",
    "Trouser Color R",
    "Trouser Color G",
    "Trouser Color B",
];

/// Decoding stopped before the end of the schema.
///
/// Every field successfully decoded before the failing read is kept, as a
/// partially decoded save is still useful when working out the format.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError<'a> {
    error: CursorError,
    records: Vec<FieldRecord<'a>>,
}

impl<'a> DecodeError<'a> {
    /// The fields decoded before the failure, in read order
    pub fn records(&self) -> &[FieldRecord<'a>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FieldRecord<'a>> {
        self.records
    }

    pub fn cursor_error(&self) -> &CursorError {
        &self.error
    }

    /// Byte offset of the read that failed
    pub fn offset(&self) -> usize {
        self.error.position()
    }
}

impl<'a> fmt::Display for DecodeError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "decoding stopped after {} fields: {}",
            self.records.len(),
            self.error
        )
    }
}

impl<'a> std::error::Error for DecodeError<'a> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Walks a save buffer and produces labeled fields
///
/// ```
/// use savedump::{FieldValue, SaveDecoder};
///
/// // truncated after the first world coordinate
/// let data = [0x00, 0x00, 0x00, 0x01, 0x00, 0x00];
/// let err = SaveDecoder::new().decode(&data).unwrap_err();
/// assert_eq!(err.records().len(), 1);
/// assert_eq!(err.records()[0].label, "WorldX");
/// assert_eq!(err.records()[0].value, FieldValue::Int32(1));
/// assert_eq!(err.offset(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SaveDecoder {
    options: DecodeOptions,
}

impl SaveDecoder {
    /// A decoder with the default options
    pub fn new() -> Self {
        SaveDecoder::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        SaveDecoder { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode the buffer into a flat list of labeled fields
    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<Vec<FieldRecord<'a>>, DecodeError<'a>> {
        let mut walker = Walker::new(data, &self.options);
        match walker.walk() {
            Ok(_) => Ok(walker.records),
            Err(e) => Err(walker.fail(e)),
        }
    }

    /// Decode the buffer into its typed representation
    pub fn decode_save<'a>(&self, data: &'a [u8]) -> Result<SaveFile<'a>, DecodeError<'a>> {
        let mut walker = Walker::new(data, &self.options);
        walker.walk().map_err(|e| walker.fail(e))
    }
}

/// Decode the buffer with the default [DecodeOptions]
pub fn decode(data: &[u8]) -> Result<Vec<FieldRecord<'_>>, DecodeError<'_>> {
    SaveDecoder::new().decode(data)
}

struct Walker<'a, 'b> {
    cursor: ByteCursor<'a>,
    options: &'b DecodeOptions,
    records: Vec<FieldRecord<'a>>,
}

impl<'a, 'b> Walker<'a, 'b> {
    fn new(data: &'a [u8], options: &'b DecodeOptions) -> Self {
        Walker {
            cursor: ByteCursor::new(data),
            options,
            records: Vec::new(),
        }
    }

    fn fail(&mut self, error: CursorError) -> DecodeError<'a> {
        debug!(
            offset = error.position(),
            fields = self.records.len(),
            "decoding stopped early: {}",
            error
        );

        DecodeError {
            error,
            records: std::mem::take(&mut self.records),
        }
    }

    #[inline]
    fn push(&mut self, label: &'static str, depth: u8, offset: usize, value: FieldValue<'a>) {
        trace!(label, offset, "decoded field");
        self.records.push(FieldRecord::new(label, depth, offset, value));
    }

    #[inline]
    fn read_endian<T: FixedWidth>(&mut self, endian: Endian) -> Result<T, CursorError> {
        match endian {
            Endian::Little => self.cursor.read::<T>(),
            Endian::Big => self.cursor.read_be::<T>(),
        }
    }

    fn int32(&mut self, label: &'static str, depth: u8) -> Result<i32, CursorError> {
        let offset = self.cursor.position();
        let value = self.cursor.read_be::<i32>()?;
        self.push(label, depth, offset, FieldValue::Int32(value));
        Ok(value)
    }

    fn int16(&mut self, label: &'static str, depth: u8) -> Result<i16, CursorError> {
        let offset = self.cursor.position();
        let value = self.cursor.read_be::<i16>()?;
        self.push(label, depth, offset, FieldValue::Int16(value));
        Ok(value)
    }

    fn byte(&mut self, label: &'static str, depth: u8) -> Result<u8, CursorError> {
        let offset = self.cursor.position();
        let value = self.cursor.read_u8()?;
        self.push(label, depth, offset, FieldValue::UInt8(value));
        Ok(value)
    }

    fn float32(
        &mut self,
        label: &'static str,
        depth: u8,
        endian: Endian,
    ) -> Result<f32, CursorError> {
        let offset = self.cursor.position();
        let value = self.read_endian::<f32>(endian)?;
        self.push(label, depth, offset, FieldValue::Float32(value));
        Ok(value)
    }

    fn float64(
        &mut self,
        label: &'static str,
        depth: u8,
        endian: Endian,
    ) -> Result<f64, CursorError> {
        let offset = self.cursor.position();
        let value = self.read_endian::<f64>(endian)?;
        self.push(label, depth, offset, FieldValue::Float64(value));
        Ok(value)
    }

    fn string(&mut self, label: &'static str, depth: u8) -> Result<SaveStr<'a>, CursorError> {
        let offset = self.cursor.position();
        let value = self.cursor.read_string()?;
        self.push(label, depth, offset, FieldValue::Str(value));
        Ok(value)
    }

    fn skip(&mut self, label: &'static str, len: usize) -> Result<(), CursorError> {
        let offset = self.cursor.position();
        self.cursor.skip(len)?;
        self.push(label, 0, offset, FieldValue::Skipped(len));
        Ok(())
    }

    fn walk(&mut self) -> Result<SaveFile<'a>, CursorError> {
        let mut world = [0i32; 5];
        for (slot, label) in world.iter_mut().zip(WORLD_LABELS) {
            *slot = self.int32(label, 0)?;
        }

        self.skip("Unknown Block", UNKNOWN_BLOCK_LEN)?;

        let endian = self.options.position_endian;
        let mut position = [0f32; 5];
        for (slot, label) in position.iter_mut().zip(POSITION_LABELS) {
            *slot = self.float32(label, 0, endian)?;
        }

        let direction = self.int32("Player Direction", 0)?;
        let player_table = self.player_table()?;
        let player = self.player_detail()?;
        let inventory = self.inventory()?;

        let [x, y, xa, ya, za] = world;
        let [x_offset, y_offset, px, py, pz] = position;
        Ok(SaveFile {
            world: WorldCoords { x, y, xa, ya, za },
            position: Position {
                x_offset,
                y_offset,
                x: px,
                y: py,
                z: pz,
            },
            direction,
            player_table,
            player,
            inventory,
        })
    }

    fn player_table(&mut self) -> Result<Option<Vec<PlayerTableEntry<'a>>>, CursorError> {
        if self.byte("Control Byte", 0)? == 0 {
            return Ok(None);
        }

        let len = self.int32("Player Table Length", 0)?;
        debug!(offset = self.cursor.position(), len, "player table present");

        // the length comes from the file, so don't trust it for allocation
        let mut entries = Vec::new();
        for _ in 0..len.max(0) {
            let kind = self.byte("Type", 1)?;
            let mut entry = PlayerTableEntry {
                kind,
                name: None,
                value: None,
            };

            // Only type zero entries are understood. The name is always seen
            // followed by a 1 byte which is read as a marker for a trailing
            // value. This is a guess that has not been verified.
            if kind == 0 {
                entry.name = Some(self.string("Name", 2)?);
                let marker = self.cursor.read_u8()?;
                if marker == 1 {
                    let endian = self.options.table_value_endian;
                    entry.value = Some(self.float64("Value", 2, endian)?);
                }
            }

            entries.push(entry);
        }

        Ok(Some(entries))
    }

    fn player_detail(&mut self) -> Result<Option<PlayerDetail<'a>>, CursorError> {
        if self.byte("Control Byte", 0)? == 0 {
            return Ok(None);
        }

        let id = self.int32("Player ID", 1)?;
        let appearance = match self.options.player_layout {
            PlayerLayout::Minimal => None,
            PlayerLayout::Extended => Some(self.player_appearance()?),
        };

        Ok(Some(PlayerDetail { id, appearance }))
    }

    fn player_appearance(&mut self) -> Result<PlayerAppearance<'a>, CursorError> {
        let mut strings = [SaveStr::default(); 13];
        for (slot, label) in strings.iter_mut().zip(APPEARANCE_LABELS) {
            *slot = self.string(label, 1)?;
        }

        let gender = self.int32("Grender", 1)?;
        let profession = self.string("Profession", 1)?;

        let mut colors = [0f32; 9];
        for (slot, label) in colors.iter_mut().zip(COLOR_LABELS) {
            *slot = self.float32(label, 1, Endian::Big)?;
        }

        let mut unknown = [0f32; 4];
        for slot in unknown.iter_mut() {
            *slot = self.float32("Unknown", 1, Endian::Big)?;
        }

        let [
            forename,
            surname,
            legs,
            torso,
            head,
            top,
            bottoms,
            shoes,
            shoes_palette,
            bottoms_palette,
            top_palette,
            skin_palette,
            hair,
        ] = strings;
        let [hr, hg, hb, tr, tg, tb, pr, pg, pb] = colors;

        Ok(PlayerAppearance {
            forename,
            surname,
            legs,
            torso,
            head,
            top,
            bottoms,
            shoes,
            shoes_palette,
            bottoms_palette,
            top_palette,
            skin_palette,
            hair,
            gender,
            profession,
            hair_color: Color {
                r: hr,
                g: hg,
                b: hb,
            },
            top_color: Color {
                r: tr,
                g: tg,
                b: tb,
            },
            trouser_color: Color {
                r: pr,
                g: pg,
                b: pb,
            },
            unknown,
        })
    }

    fn inventory(&mut self) -> Result<Inventory<'a>, CursorError> {
        let kind = self.string("Inventory Type", 0)?;
        let explored = self.byte("InvExplored", 0)?;
        let count = self.int16("InvCount", 0)?;

        let limit = match self.options.inventory_policy {
            InventoryPolicy::FirstOnly => count.clamp(0, 1),
            InventoryPolicy::All => count.max(0),
        };

        if limit < count {
            debug!(count, limit, "inventory list truncated by policy");
        }

        let mut items = Vec::new();
        for _ in 0..limit {
            let name = self.string("Item", 1)?;
            let uses = self.int32("Uses?", 1)?;
            items.push(InventoryEntry { name, uses });
        }

        Ok(Inventory {
            kind,
            explored,
            count,
            items,
        })
    }
}
