//! Typed value extraction from the token stream.
//!
//! One call to [`extract`] consumes exactly one token (a quoted span counts
//! as one token for strings) and converts it to the requested
//! [`ParamType`], or fails with the kind's usage label and the literal text
//! that would not convert.
//!
//! Integer conversion tries base 10 first and re-attempts the same token as
//! bare base 16 (no `0x` prefix) when the decimal parse stops on an invalid
//! digit. Unsigned kinds reject a leading `-` before either branch runs.

use std::num::{IntErrorKind, ParseIntError};

use thiserror::Error;

use crate::option::{ParamType, ParamValue};
use crate::token::TokenStream;

/// Extraction failure for a single parameter.
///
/// Every variant carries the expected usage label; the token variants carry
/// the literal text that failed to convert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The stream ended before a token for this slot was found.
    #[error("missing argument, expected {expected}")]
    MissingToken { expected: &'static str },
    /// The token did not convert to the requested kind.
    #[error("invalid argument {found:?}, expected {expected}")]
    Malformed {
        expected: &'static str,
        found: String,
    },
    /// A leading `-` was given for an unsigned kind.
    #[error("negative value {found:?} not allowed, expected {expected}")]
    NegativeUnsigned {
        expected: &'static str,
        found: String,
    },
}

/// Consumes one token and converts it to `kind`.
///
/// # Examples
///
/// ```
/// use optline_core::{extract, ParamType, ParamValue, TokenStream};
///
/// let mut stream = TokenStream::from_line("3afD -5");
/// assert_eq!(
///     extract(ParamType::I32, &mut stream),
///     Ok(ParamValue::I32(0x3afd)),
/// );
/// assert!(extract(ParamType::U32, &mut stream).is_err());
/// ```
pub fn extract(kind: ParamType, stream: &mut TokenStream) -> Result<ParamValue, ExtractError> {
    let expected = kind.usage_label();
    if kind == ParamType::Str {
        let token = stream
            .next_quoted()
            .ok_or(ExtractError::MissingToken { expected })?;
        return Ok(ParamValue::Str(token.to_owned()));
    }

    let token = stream
        .next_token()
        .ok_or(ExtractError::MissingToken { expected })?;
    convert(kind, token)
}

fn convert(kind: ParamType, token: &str) -> Result<ParamValue, ExtractError> {
    let expected = kind.usage_label();
    if kind.is_unsigned() && token.starts_with('-') {
        return Err(ExtractError::NegativeUnsigned {
            expected,
            found: token.to_owned(),
        });
    }

    match kind {
        ParamType::I8 => parse_int(token, expected).map(ParamValue::I8),
        ParamType::I16 => parse_int(token, expected).map(ParamValue::I16),
        ParamType::I32 => parse_int(token, expected).map(ParamValue::I32),
        ParamType::I64 => parse_int(token, expected).map(ParamValue::I64),
        ParamType::U8 => parse_int(token, expected).map(ParamValue::U8),
        ParamType::U16 => parse_int(token, expected).map(ParamValue::U16),
        ParamType::U32 => parse_int(token, expected).map(ParamValue::U32),
        ParamType::U64 => parse_int(token, expected).map(ParamValue::U64),
        ParamType::F32 => parse_float::<f32>(token, expected).map(ParamValue::F32),
        ParamType::F64 => parse_float::<f64>(token, expected).map(ParamValue::F64),
        ParamType::Char => parse_char(token, expected),
        ParamType::Str => unreachable!("strings are handled by extract()"),
    }
}

/// Shared capability for the integer family: radix-aware parsing keyed on
/// the concrete width.
trait RadixInt: Sized {
    fn from_radix(token: &str, radix: u32) -> Result<Self, ParseIntError>;
}

macro_rules! impl_radix_int {
    ($($ty:ty),* $(,)?) => {
        $(impl RadixInt for $ty {
            fn from_radix(token: &str, radix: u32) -> Result<Self, ParseIntError> {
                <$ty>::from_str_radix(token, radix)
            }
        })*
    };
}

impl_radix_int!(i8, i16, i32, i64, u8, u16, u32, u64);

fn parse_int<T: RadixInt>(token: &str, expected: &'static str) -> Result<T, ExtractError> {
    match T::from_radix(token, 10) {
        Ok(value) => Ok(value),
        // Only an invalid digit (trailing characters the decimal parse could
        // not consume) triggers the bare-hex retry; overflow is final.
        Err(err) if *err.kind() == IntErrorKind::InvalidDigit => T::from_radix(token, 16)
            .map_err(|_| ExtractError::Malformed {
                expected,
                found: token.to_owned(),
            }),
        Err(_) => Err(ExtractError::Malformed {
            expected,
            found: token.to_owned(),
        }),
    }
}

fn parse_float<T: std::str::FromStr>(
    token: &str,
    expected: &'static str,
) -> Result<T, ExtractError> {
    token.parse::<T>().map_err(|_| ExtractError::Malformed {
        expected,
        found: token.to_owned(),
    })
}

fn parse_char(token: &str, expected: &'static str) -> Result<ParamValue, ExtractError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(ParamValue::Char(c)),
        _ => Err(ExtractError::Malformed {
            expected,
            found: token.to_owned(),
        }),
    }
}
