use std::fmt;
use std::str::FromStr;
use std::fmt::{Display, Formatter};
use num_traits::{PrimInt, ToPrimitive};
use num_traits::cast;

/// A byte count as typed by, or shown to, a user.
///
/// Parses plain numbers and numbers with a binary `k`, `m`, `g` or `t`
/// suffix (case-insensitive), so `64k` is 65536. Displays with two decimal
/// places in the largest unit that keeps the number above one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DataSize<I> {
    inner: I
}

impl<I> DataSize<I> {
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I> From<I> for DataSize<I> {
    fn from(outer: I) -> DataSize<I> {
        DataSize {
            inner: outer
        }
    }
}

/// Why a data size could not be parsed.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseDataSizeError {
    Empty,
    InvalidNumber(String),
    Overflow,
}

impl Display for ParseDataSizeError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ParseDataSizeError::Empty => write!(f, "empty size"),
            ParseDataSizeError::InvalidNumber(s) => write!(f, "{:?} is not a number", s),
            ParseDataSizeError::Overflow => write!(f, "size is too large"),
        }
    }
}

impl std::error::Error for ParseDataSizeError {}

fn suffix_shift(suffix: char) -> Option<u32> {
    match suffix.to_ascii_lowercase() {
        'k' => Some(10),
        'm' => Some(20),
        'g' => Some(30),
        't' => Some(40),
        _ => None
    }
}

impl<I> FromStr for DataSize<I> where I: PrimInt + FromStr {
    type Err = ParseDataSizeError;

    fn from_str(s: &str) -> Result<DataSize<I>, Self::Err> {
        let s = s.trim();
        let last = s.chars().last().ok_or(ParseDataSizeError::Empty)?;

        let (digits, shift) = match suffix_shift(last) {
            Some(shift) => (&s[..s.len() - last.len_utf8()], shift),
            None => (s, 0)
        };

        let value = I::from_str(digits).map_err(|_| ParseDataSizeError::InvalidNumber(digits.to_string()))?;
        let factor : I = cast(1u64 << shift).ok_or(ParseDataSizeError::Overflow)?;

        Ok(DataSize {
            inner: value.checked_mul(&factor).ok_or(ParseDataSizeError::Overflow)?
        })
    }
}

impl<I> Display for DataSize<I> where I: ToPrimitive {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let bytes = self.inner.to_f64().ok_or(fmt::Error)?;
        let units = [("TB", 40), ("GB", 30), ("MB", 20), ("KB", 10)];

        for &(name, shift) in units.iter() {
            let scale = (1u64 << shift) as f64;
            if bytes >= scale {
                return write!(f, "{:.2}{}", bytes / scale, name);
            }
        }

        write!(f, "{:.2}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::units::{DataSize, ParseDataSizeError};

    #[test]
    fn parse_plain() {
        assert_eq!("4096".parse::<DataSize<usize>>().unwrap().into_inner(), 4096);
    }

    #[test]
    fn parse_suffixes() {
        assert_eq!("64k".parse::<DataSize<usize>>().unwrap().into_inner(), 64 * 1024);
        assert_eq!("5M".parse::<DataSize<u64>>().unwrap().into_inner(), 5 * 1024 * 1024);
        assert_eq!("2g".parse::<DataSize<u64>>().unwrap().into_inner(), 2 * 1024 * 1024 * 1024);
        assert_eq!("1t".parse::<DataSize<u64>>().unwrap().into_inner(), 1 << 40);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<DataSize<u64>>(), Err(ParseDataSizeError::Empty));
        assert_eq!("k".parse::<DataSize<u64>>(), Err(ParseDataSizeError::InvalidNumber("".to_string())));
        assert_eq!("12q".parse::<DataSize<u64>>(), Err(ParseDataSizeError::InvalidNumber("12q".to_string())));
        assert_eq!("1t".parse::<DataSize<u32>>(), Err(ParseDataSizeError::Overflow));
        assert_eq!("8g".parse::<DataSize<u32>>(), Err(ParseDataSizeError::Overflow));
    }

    #[test]
    fn display_units() {
        assert_eq!(format!("{}", DataSize::from(512u64)), "512.00B");
        assert_eq!(format!("{}", DataSize::from(1536u64)), "1.50KB");
        assert_eq!(format!("{}", DataSize::from(5u64 * 1024 * 1024)), "5.00MB");
        assert_eq!(format!("{}", DataSize::from(3.0f64 * 1024.0 * 1024.0 * 1024.0)), "3.00GB");
    }
}
