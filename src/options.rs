use crate::SaveDecoder;
use std::fmt;
use std::str::FromStr;

/// Which layout follows the player id inside the player detail block.
///
/// Two incompatible versions of the format exist in the wild. Which one a
/// given file uses can't be detected from the data, so the caller picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerLayout {
    /// Only the player id is present
    Minimal,

    /// The player id is followed by thirteen appearance strings, a gender
    /// code, a profession, nine color channels, and four unknown floats
    #[default]
    Extended,
}

/// Byte order of a multi byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// The format's unswapped order
    Little,

    /// Stored with bytes reversed
    Big,
}

/// How much of the inventory list is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InventoryPolicy {
    /// Decode at most one item no matter the stored count. This is how the
    /// format was first dumped, as decoding later items is not trusted.
    #[default]
    FirstOnly,

    /// Decode as many items as the stored count says
    All,
}

/// Error returned when parsing one of the option enums from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError {
    kind: &'static str,
    input: String,
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized {}: {}", self.kind, self.input)
    }
}

impl std::error::Error for ParseOptionError {}

impl FromStr for PlayerLayout {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(PlayerLayout::Minimal),
            "extended" => Ok(PlayerLayout::Extended),
            _ => Err(ParseOptionError {
                kind: "player layout",
                input: s.to_string(),
            }),
        }
    }
}

impl FromStr for Endian {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" | "native" => Ok(Endian::Little),
            "big" | "be" | "swapped" => Ok(Endian::Big),
            _ => Err(ParseOptionError {
                kind: "byte order",
                input: s.to_string(),
            }),
        }
    }
}

/// Construct a customized save decoder
///
/// ```
/// use savedump::{DecoderBuilder, InventoryPolicy, PlayerLayout};
/// let decoder = DecoderBuilder::new()
///     .player_layout(PlayerLayout::Minimal)
///     .inventory_policy(InventoryPolicy::All)
///     .build();
/// assert_eq!(decoder.options().player_layout, PlayerLayout::Minimal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderBuilder {
    options: DecodeOptions,
}

/// Knobs controlling how the ambiguous parts of the format are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub player_layout: PlayerLayout,

    /// Byte order of the position float block
    pub position_endian: Endian,

    /// Byte order of the optional value attached to a player table name
    pub table_value_endian: Endian,

    pub inventory_policy: InventoryPolicy,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            player_layout: PlayerLayout::default(),
            position_endian: Endian::Little,
            table_value_endian: Endian::Big,
            inventory_policy: InventoryPolicy::default(),
        }
    }
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        DecoderBuilder::new()
    }
}

impl DecoderBuilder {
    /// Create a new builder with the default options
    pub fn new() -> Self {
        DecoderBuilder {
            options: DecodeOptions::default(),
        }
    }

    pub fn player_layout(mut self, layout: PlayerLayout) -> Self {
        self.options.player_layout = layout;
        self
    }

    pub fn position_endian(mut self, endian: Endian) -> Self {
        self.options.position_endian = endian;
        self
    }

    pub fn table_value_endian(mut self, endian: Endian) -> Self {
        self.options.table_value_endian = endian;
        self
    }

    pub fn inventory_policy(mut self, policy: InventoryPolicy) -> Self {
        self.options.inventory_policy = policy;
        self
    }

    pub fn build(self) -> SaveDecoder {
        SaveDecoder::with_options(self.options)
    }
}
