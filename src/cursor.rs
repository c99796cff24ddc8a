use crate::{util::get_split, SaveStr};
use std::fmt;

/// A fixed width numeric type that can be pulled out of a save buffer
///
/// The unswapped byte order of the format is little endian (the byte order
/// of the machines that wrote the saves), so [`FixedWidth::from_raw`] always
/// decodes little endian regardless of the host.
pub trait FixedWidth: Sized + Copy {
    /// Number of bytes the type occupies in the buffer
    const WIDTH: usize;

    /// Decode the value from exactly `WIDTH` bytes in the format's native order
    fn from_raw(data: &[u8]) -> Self;

    /// Reverse the byte sequence of the value and reinterpret it as `Self`.
    ///
    /// Floats are swapped through their bit pattern so no numeric conversion
    /// takes place. Single byte types are returned unchanged.
    fn swap_bytes(self) -> Self;
}

macro_rules! fixed_width_int {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn from_raw(data: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(&data[..Self::WIDTH]);
                    <$ty>::from_le_bytes(buf)
                }

                #[inline]
                fn swap_bytes(self) -> Self {
                    <$ty>::swap_bytes(self)
                }
            }
        )*
    };
}

macro_rules! fixed_width_float {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn from_raw(data: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(&data[..Self::WIDTH]);
                    <$ty>::from_le_bytes(buf)
                }

                #[inline]
                fn swap_bytes(self) -> Self {
                    <$ty>::from_bits(self.to_bits().swap_bytes())
                }
            }
        )*
    };
}

fixed_width_int!(u8, i8, u16, i16, u32, i32, u64, i64);
fixed_width_float!(f32, f64);

#[inline]
fn out_of_bounds(requested: usize, data: &[u8]) -> ReadError {
    ReadError::OutOfBounds {
        requested,
        remaining: data.len(),
    }
}

#[inline]
pub(crate) fn read<T: FixedWidth>(data: &[u8]) -> Result<(T, &[u8]), ReadError> {
    if data.len() < T::WIDTH {
        return Err(out_of_bounds(T::WIDTH, data));
    }

    let (head, rest) = data.split_at(T::WIDTH);
    Ok((T::from_raw(head), rest))
}

#[inline]
pub(crate) fn read_be<T: FixedWidth>(data: &[u8]) -> Result<(T, &[u8]), ReadError> {
    read::<T>(data).map(|(x, rest)| (x.swap_bytes(), rest))
}

#[inline]
pub(crate) fn read_string(data: &[u8]) -> Result<(SaveStr, &[u8]), ReadError> {
    let (head, rest) = get_split::<2>(data).ok_or_else(|| out_of_bounds(2, data))?;
    let text_len = usize::from(u16::from_be_bytes(head));
    if text_len <= rest.len() {
        let (text, rest) = rest.split_at(text_len);
        Ok((SaveStr::new(text), rest))
    } else {
        // report the whole field so the caller sees what the prefix asked for
        Err(ReadError::OutOfBounds {
            requested: text_len + 2,
            remaining: data.len(),
        })
    }
}

#[inline]
pub(crate) fn read_bytes(data: &[u8], len: usize) -> Result<(&[u8], &[u8]), ReadError> {
    if len <= data.len() {
        Ok(data.split_at(len))
    } else {
        Err(out_of_bounds(len, data))
    }
}

/// The reason a read against the buffer failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// The read would cross the end of the buffer
    OutOfBounds { requested: usize, remaining: usize },
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ReadError::OutOfBounds {
                requested,
                remaining,
            } => write!(
                f,
                "out of bounds: needed {} bytes but only {} remain",
                requested, remaining
            ),
        }
    }
}

impl ReadError {
    #[inline]
    #[must_use]
    pub fn at(self, position: usize) -> CursorError {
        CursorError {
            position,
            kind: self,
        }
    }
}

/// A [ReadError] tagged with the buffer offset the read started at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorError {
    position: usize,
    kind: ReadError,
}

impl CursorError {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &ReadError {
        &self.kind
    }

    pub fn into_kind(self) -> ReadError {
        self.kind
    }
}

impl std::error::Error for CursorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ReadError::OutOfBounds {
                requested,
                remaining,
            } => write!(
                f,
                "not enough data to read {} bytes at offset {} ({} remain)",
                requested, self.position, remaining
            ),
        }
    }
}

/// Bounds checked, forward only reader over a save buffer
///
/// Every read either succeeds and advances the cursor by exactly the number of
/// bytes consumed, or fails with [ReadError::OutOfBounds] and leaves the
/// cursor untouched.
///
/// ```rust
/// use savedump::ByteCursor;
/// let data = [0x00, 0x00, 0x00, 0x2a, 0x00, 0x02, b'h', b'i'];
/// let mut cursor = ByteCursor::new(&data);
/// assert_eq!(cursor.read_be::<i32>().unwrap(), 42);
/// assert_eq!(cursor.read_string().unwrap().to_utf8(), "hi");
/// assert_eq!(cursor.position(), data.len());
/// assert!(cursor.read_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    original_length: usize,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            original_length: data.len(),
        }
    }

    /// The unread portion of the buffer
    #[inline]
    pub fn remainder(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.original_length - self.data.len()
    }

    #[inline]
    fn err_position(&self, err: ReadError) -> CursorError {
        err.at(self.position())
    }

    /// Read a value stored in the format's native (little endian) order
    #[inline]
    pub fn read<T: FixedWidth>(&mut self) -> Result<T, CursorError> {
        let (result, rest) = read::<T>(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    /// Read a value stored with its bytes reversed (big endian)
    #[inline]
    pub fn read_be<T: FixedWidth>(&mut self) -> Result<T, CursorError> {
        let (result, rest) = read_be::<T>(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        self.read::<u8>()
    }

    /// Read a string with a big endian u16 length prefix. The contents are
    /// not validated as any encoding.
    #[inline]
    pub fn read_string(&mut self) -> Result<SaveStr<'a>, CursorError> {
        let (result, rest) = read_string(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        let (result, rest) = read_bytes(self.data, len).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    /// Advance past `len` bytes without interpreting them
    #[inline]
    pub fn skip(&mut self, len: usize) -> Result<(), CursorError> {
        self.read_bytes(len).map(|_| ())
    }
}
