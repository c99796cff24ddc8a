use crate::{FieldRecord, FieldValue};
use std::io::{self, Write};

/// Number of significant digits floats are rendered with
const FLOAT_PRECISION: usize = 6;

/// Renders decoded fields as `<label> : <value>` lines
///
/// Nested fields are indented two spaces per level. Strings are written
/// byte-for-byte as they appear in the save. Floats are written with six
/// significant digits, switching to scientific notation for very large or
/// small magnitudes.
///
/// ```
/// use savedump::{FieldRecord, FieldValue, Reporter, SaveStr};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let records = [
///     FieldRecord::new("X", 0, 0, FieldValue::Float32(2.5)),
///     FieldRecord::new("Item", 1, 4, FieldValue::Str(SaveStr::new(b"Sword"))),
///     FieldRecord::new("Uses?", 1, 11, FieldValue::Int32(-3)),
/// ];
///
/// let mut out = Vec::new();
/// Reporter::new(&mut out).write_records(&records)?;
/// assert_eq!(out, b"X : 2.5\n  Item : Sword\n  Uses? : -3\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Reporter<W> {
    writer: W,
    offsets: bool,
    scratch: String,
}

impl<W: Write> Reporter<W> {
    pub fn new(writer: W) -> Self {
        Reporter {
            writer,
            offsets: false,
            scratch: String::new(),
        }
    }

    /// Prefix each line with the byte offset of the field and include
    /// skipped regions in the output
    pub fn with_offsets(mut self, offsets: bool) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn inner(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_records(&mut self, records: &[FieldRecord]) -> io::Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    pub fn write_record(&mut self, record: &FieldRecord) -> io::Result<()> {
        if record.value.is_skipped() && !self.offsets {
            return Ok(());
        }

        if self.offsets {
            write!(self.writer, "{:>10}: ", record.offset)?;
        }

        for _ in 0..record.depth {
            self.writer.write_all(b"  ")?;
        }

        self.writer.write_all(record.label.as_bytes())?;
        self.writer.write_all(b" : ")?;

        match record.value {
            FieldValue::Int32(x) => self.write_int(x)?,
            FieldValue::Int16(x) => self.write_int(x)?,
            FieldValue::UInt8(x) => self.write_int(x)?,
            FieldValue::Float32(x) => self.write_float(f64::from(x))?,
            FieldValue::Float64(x) => self.write_float(x)?,
            FieldValue::Str(x) => self.writer.write_all(x.view_data())?,
            FieldValue::Skipped(len) => write!(self.writer, "<{} bytes skipped>", len)?,
        }

        self.writer.write_all(b"\n")
    }

    #[cfg(feature = "faster_writer")]
    fn write_int<I: itoa::Integer>(&mut self, x: I) -> io::Result<()> {
        let mut buffer = itoa::Buffer::new();
        self.writer.write_all(buffer.format(x).as_bytes())
    }

    #[cfg(not(feature = "faster_writer"))]
    fn write_int<I: std::fmt::Display>(&mut self, x: I) -> io::Result<()> {
        write!(self.writer, "{}", x)
    }

    fn write_float(&mut self, x: f64) -> io::Result<()> {
        self.scratch.clear();
        format_general(x, &mut self.scratch);
        self.writer.write_all(self.scratch.as_bytes())
    }
}

/// Format a float the way `%g` does: six significant digits, trailing zeros
/// removed, and scientific notation when the exponent is below -4 or not
/// below the precision.
pub(crate) fn format_general(x: f64, out: &mut String) {
    use std::fmt::Write as _;

    if x.is_nan() {
        out.push_str(if x.is_sign_negative() { "-nan" } else { "nan" });
        return;
    } else if x.is_infinite() {
        out.push_str(if x.is_sign_negative() { "-inf" } else { "inf" });
        return;
    } else if x == 0.0 {
        out.push_str(if x.is_sign_negative() { "-0" } else { "0" });
        return;
    }

    // Round to the precision first so the exponent reflects any carry (eg:
    // 999999.5 rounds up to 1e+06)
    let sci = format!("{:.*e}", FLOAT_PRECISION - 1, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= FLOAT_PRECISION as i32 {
        out.push_str(trim_fraction(mantissa));
        let sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(out, "e{}{:02}", sign, exp.abs());
    } else {
        let decimals = (FLOAT_PRECISION as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, x);
        out.push_str(trim_fraction(&fixed));
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
