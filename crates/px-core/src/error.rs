use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    SizeOverflow {
        width: usize,
        height: usize,
    },
    /// Box edges outside `COORD_MIN..=COORD_MAX`.
    OutOfPlane {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedRows {
                row,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "ragged bitmap: row {row} has {actual} cells, expected {expected}"
                )
            }
            Self::SizeOverflow { width, height } => {
                write!(f, "bitmap size overflow: {width}x{height}")
            }
            Self::OutOfPlane {
                x,
                y,
                width,
                height,
            } => {
                write!(f, "{width}x{height} bitmap at ({x}, {y}) leaves the coordinate plane")
            }
        }
    }
}

impl std::error::Error for Error {}
