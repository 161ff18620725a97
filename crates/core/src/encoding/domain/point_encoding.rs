use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// On-disk representation of a frame's coordinate buffer.
///
/// Both encodings write every value of the buffer in its original order
/// with no header, footer or separator between points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointEncoding {
    /// One value per line in shortest round-trip decimal form, `\n` terminated.
    #[default]
    Text,
    /// Consecutive big-endian IEEE-754 single-precision values.
    Binary,
}

impl PointEncoding {
    pub const ALL: &[PointEncoding] = &[PointEncoding::Text, PointEncoding::Binary];

    /// Streams the whole buffer into `out`. Stops at the first I/O error.
    pub fn encode<W: Write + ?Sized>(self, points: &[f32], out: &mut W) -> io::Result<()> {
        match self {
            PointEncoding::Text => {
                for value in points {
                    writeln!(out, "{value:?}")?;
                }
            }
            PointEncoding::Binary => {
                for value in points {
                    out.write_all(&value.to_be_bytes())?;
                }
            }
        }
        Ok(())
    }

    pub fn name(self) -> &'static str {
        match self {
            PointEncoding::Text => "text",
            PointEncoding::Binary => "binary",
        }
    }
}

impl fmt::Display for PointEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PointEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(PointEncoding::Text),
            "binary" | "bin" => Ok(PointEncoding::Binary),
            other => Err(format!("encoding must be 'text' or 'binary', got '{other}'")),
        }
    }
}
