use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Side length of a playable square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum Size {
    Four,
    Five,
    Six,
}

impl Size {
    pub const ALL: [Self; 3] = [Self::Four, Self::Five, Self::Six];

    pub const fn len(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
        }
    }

    /// Number of border cells, i.e. the cells a player fills in.
    pub const fn edge_cells(self) -> usize {
        4 * self.len() - 4
    }

    /// Storage key component for this size.
    pub const fn difficulty(self) -> Difficulty {
        match self {
            Self::Four => Difficulty::Easy,
            Self::Five => Difficulty::Medium,
            Self::Six => Difficulty::Hard,
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a playable size, expected 4, 5 or 6")]
pub struct InvalidSize(pub usize);

impl TryFrom<usize> for Size {
    type Error = InvalidSize;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            other => Err(InvalidSize(other)),
        }
    }
}

impl From<Size> for usize {
    fn from(value: Size) -> Self {
        value.len()
    }
}

impl FromStr for Size {
    type Err = InvalidSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map_err(|_| InvalidSize(0))
            .and_then(Self::try_from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub const fn size(self) -> Size {
        match self {
            Self::Easy => Size::Four,
            Self::Medium => Size::Five,
            Self::Hard => Size::Six,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Difficulty, Size};

    #[test]
    fn edge_cells() {
        assert_eq!(Size::Four.edge_cells(), 12);
        assert_eq!(Size::Five.edge_cells(), 16);
        assert_eq!(Size::Six.edge_cells(), 20);
    }

    #[test]
    fn parse() {
        assert_eq!("5".parse::<Size>(), Ok(Size::Five));
        assert!("7".parse::<Size>().is_err());
        assert!("five".parse::<Size>().is_err());
    }

    #[test]
    fn difficulty_round_trip() {
        for size in Size::ALL {
            assert_eq!(size.difficulty().size(), size);
        }
        assert_eq!(Difficulty::Hard.key(), "hard");
    }
}
