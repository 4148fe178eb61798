use std::fmt;

pub const SLUG_MAX_LEN: usize = 64;

pub fn is_valid_slug(value: &str) -> bool {
    RaffleSlug::parse(value).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RaffleSlug(String);

impl RaffleSlug {
    pub fn parse(value: &str) -> Result<Self, SlugError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SlugError::Empty);
        }
        if trimmed.len() > SLUG_MAX_LEN {
            return Err(SlugError::TooLong {
                max: SLUG_MAX_LEN,
                found: trimmed.len(),
            });
        }
        if trimmed.starts_with('-') || trimmed.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }
        for (idx, ch) in trimmed.chars().enumerate() {
            let ok = ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-';
            if !ok {
                return Err(SlugError::InvalidCharacter { ch, index: idx });
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RaffleSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RaffleSlug {
    type Err = SlugError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    Empty,
    TooLong { max: usize, found: usize },
    EdgeHyphen,
    InvalidCharacter { ch: char, index: usize },
}

impl fmt::Display for SlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugError::Empty => write!(f, "slug must not be empty"),
            SlugError::TooLong { max, found } => {
                write!(f, "slug must be at most {max} chars, got {found}")
            }
            SlugError::EdgeHyphen => write!(f, "slug must not start or end with '-'"),
            SlugError::InvalidCharacter { ch, index } => {
                write!(f, "invalid character '{ch}' at position {index}")
            }
        }
    }
}

impl std::error::Error for SlugError {}
