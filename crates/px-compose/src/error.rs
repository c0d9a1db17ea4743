use core::fmt;

use crate::Codepoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    UnknownCharacter(Codepoint),
    UnresolvedReference {
        from: Codepoint,
        to: Codepoint,
    },
    UnknownDiacritic {
        codepoint: Codepoint,
        name: String,
    },
    /// Reference chain that returns to its first element.
    ReferenceCycle(Vec<Codepoint>),
    InvalidDescent {
        codepoint: Codepoint,
    },
    MalformedBitmap {
        codepoint: Codepoint,
        source: px_core::Error,
    },
    MalformedDiacritic {
        name: String,
        source: px_core::Error,
    },
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCharacter(cp) => write!(f, "unknown character U+{cp:04X}"),
            Self::UnresolvedReference { from, to } => {
                write!(f, "U+{from:04X} references unknown character U+{to:04X}")
            }
            Self::UnknownDiacritic { codepoint, name } => {
                write!(f, "U+{codepoint:04X} uses unknown diacritic '{name}'")
            }
            Self::ReferenceCycle(chain) => {
                write!(f, "reference cycle:")?;
                for cp in chain {
                    write!(f, " U+{cp:04X}")?;
                }
                Ok(())
            }
            Self::InvalidDescent { codepoint } => {
                write!(f, "U+{codepoint:04X} has a non-finite or out-of-range descent")
            }
            Self::MalformedBitmap { codepoint, .. } => {
                write!(f, "malformed bitmap for U+{codepoint:04X}")
            }
            Self::MalformedDiacritic { name, .. } => {
                write!(f, "malformed bitmap for diacritic '{name}'")
            }
        }
    }
}

impl std::error::Error for ComposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedBitmap { source, .. } | Self::MalformedDiacritic { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
