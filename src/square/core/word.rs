use std::{ops::Index, slice::Iter, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An uppercase dictionary word.
///
/// Parsing is case-insensitive; the stored form is always uppercase, so
/// equality and hashing never depend on how the word was typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word {
    letters: Vec<char>,
}

impl Word {
    pub fn from_letters(letters: impl IntoIterator<Item = char>) -> Result<Self, ParseWordError> {
        let letters: Vec<char> = letters.into_iter().collect();

        if letters.is_empty() {
            return Err(ParseWordError::Empty);
        }

        if let Some(bad) = letters.iter().find(|ch| !ch.is_ascii_alphabetic()) {
            return Err(ParseWordError::NotAlphabetic {
                word: letters.iter().collect(),
                ch: *bad,
            });
        }

        Ok(Self {
            letters: letters.iter().map(char::to_ascii_uppercase).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, char> {
        self.letters.iter()
    }

    pub fn first(&self) -> char {
        self.letters[0]
    }

    pub fn last(&self) -> char {
        self.letters[self.letters.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.letters.get(index).copied()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWordError {
    #[error("word is empty")]
    Empty,

    #[error("word `{word}` contains non-alphabetic character {ch:?}")]
    NotAlphabetic { word: String, ch: char },
}

impl FromStr for Word {
    type Err = ParseWordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_letters(s.trim().chars())
    }
}

impl TryFrom<String> for Word {
    type Error = ParseWordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters.iter().collect::<String>())
    }
}

impl IntoIterator for Word {
    type Item = char;
    type IntoIter = std::vec::IntoIter<char>;

    fn into_iter(self) -> Self::IntoIter {
        self.letters.into_iter()
    }
}

impl<'a> IntoIterator for &'a Word {
    type Item = &'a char;
    type IntoIter = Iter<'a, char>;

    fn into_iter(self) -> Self::IntoIter {
        self.letters.iter()
    }
}

impl Index<usize> for Word {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self.letters.len() == other.chars().count()
            && self
                .letters
                .iter()
                .zip(other.chars())
                .all(|(a, b)| *a == b.to_ascii_uppercase())
    }
}
