//! Validation and normalization of raw ISBN strings.
//!
//! A raw identifier is stripped of everything that is not alphanumeric (hyphens, spaces),
//! validated as either an ISBN-10 or an ISBN-13 and then completed with the other form where
//! one exists. ISBN-10s always have an ISBN-13 (`978` prefix) but only ISBN-13s in the `978`
//! range have an ISBN-10.

use std::{fmt, str::FromStr};

const BOOKLAND: &str = "978";

/// A validated ISBN carrying both canonical forms.
///
/// The ISBN-13 form is always present, an ISBN-10 can always be moved into the `978` range.
/// The ISBN-10 form is absent for ISBN-13s outside of the `978` range.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Isbn {
    digits13: String,
    digits10: Option<String>,
}

/// The reasons a raw identifier is not a valid ISBN.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// After stripping separators the identifier is not 10 or 13 characters long.
    InvalidLength(usize),
    /// A character that cannot appear at its position, i.e. a letter in the digits or an `X`
    /// anywhere but the last position of an ISBN-10.
    InvalidCharacter(char),
    /// The check character does not match the rest of the identifier.
    ChecksumFailed,
}

impl Isbn {
    /// The 13 digit form.
    #[must_use]
    pub fn isbn13(&self) -> &str {
        &self.digits13
    }

    /// The 10 character form, if this ISBN is within the `978` range.
    #[must_use]
    pub fn isbn10(&self) -> Option<&str> {
        self.digits10.as_deref()
    }

    /// The form used when querying a catalog.
    ///
    /// The ISBN-13 is preferred and only when absent would the ISBN-10 be used, as every valid
    /// [`Isbn`] has an ISBN-13 this is always the ISBN-13.
    #[must_use]
    pub fn query(&self) -> &str {
        self.isbn13()
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits13)
    }
}

impl FromStr for Isbn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid ISBN format: ")?;
        match self {
            Self::InvalidLength(_) => f.write_str("expected 10 or 13 characters"),
            Self::InvalidCharacter(_) => f.write_str("unexpected character"),
            Self::ChecksumFailed => f.write_str("check digit does not match"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates and canonicalizes a raw identifier into an [`Isbn`].
///
/// Separators (anything that is not alphanumeric) are ignored and a lowercase `x` check
/// character is accepted as `X`.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the identifier has the wrong length, contains characters
/// that are not allowed at their position or fails the checksum.
pub fn normalize(raw: &str) -> Result<Isbn, ValidationError> {
    let stripped: Vec<char> = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    match stripped.len() {
        10 => from_isbn10(&stripped),
        13 => from_isbn13(&stripped),
        len => Err(ValidationError::InvalidLength(len)),
    }
}

fn from_isbn10(chars: &[char]) -> Result<Isbn, ValidationError> {
    let (check, stem) = chars.split_last().ok_or(ValidationError::InvalidLength(0))?;
    let stem = digits(stem)?;

    let check_value = match check {
        'X' => 10,
        c => c.to_digit(10).ok_or(ValidationError::InvalidCharacter(*c))?,
    };

    let sum: u32 = stem
        .iter()
        .zip((2..=10).rev())
        .map(|(d, w)| d * w)
        .sum::<u32>()
        + check_value;

    if sum % 11 != 0 {
        return Err(ValidationError::ChecksumFailed);
    }

    // the ISBN-10 check character is dropped, the ISBN-13 has its own
    let mut stem13 = vec![9, 7, 8];
    stem13.extend_from_slice(&stem);

    let digits10: String = chars.iter().collect();
    let mut digits13 = String::from(BOOKLAND);
    digits13.extend(&chars[..9]);
    digits13.push(isbn13_check_char(&stem13));

    Ok(Isbn {
        digits13,
        digits10: Some(digits10),
    })
}

fn from_isbn13(chars: &[char]) -> Result<Isbn, ValidationError> {
    let all = digits(chars)?;

    let sum: u32 = all.iter().zip([1, 3].iter().cycle()).map(|(d, w)| d * w).sum();
    if sum % 10 != 0 {
        return Err(ValidationError::ChecksumFailed);
    }

    let digits13: String = chars.iter().collect();
    let digits10 = digits13.strip_prefix(BOOKLAND).map(|rest| {
        let mut stem: String = rest.chars().take(9).collect();
        stem.push(isbn10_check_char(&all[3..12]));
        stem
    });

    Ok(Isbn { digits13, digits10 })
}

fn digits(chars: &[char]) -> Result<Vec<u32>, ValidationError> {
    chars
        .iter()
        .map(|c| c.to_digit(10).ok_or(ValidationError::InvalidCharacter(*c)))
        .collect()
}

/// Check character for the first 9 digits of an ISBN-10.
fn isbn10_check_char(stem: &[u32]) -> char {
    let sum: u32 = stem.iter().zip((2..=10).rev()).map(|(d, w)| d * w).sum();
    match (11 - sum % 11) % 11 {
        10 => 'X',
        // always < 10
        v => char::from_digit(v, 10).unwrap_or('0'),
    }
}

/// Check digit for the first 12 digits of an ISBN-13.
fn isbn13_check_char(stem: &[u32]) -> char {
    let sum: u32 = stem.iter().zip([1, 3].iter().cycle()).map(|(d, w)| d * w).sum();
    char::from_digit((10 - sum % 10) % 10, 10).unwrap_or('0')
}
