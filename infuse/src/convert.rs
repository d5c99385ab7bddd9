//! Conversion of raw configuration strings into scalar values.
//!
//! Every type that can appear as a configurable field or method parameter
//! implements [`FromConfigValue`]. Numeric and boolean inputs are trimmed
//! before parsing; textual inputs are taken verbatim.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::num::{
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize, NonZeroU8,
    NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize,
};
use std::path::PathBuf;
use std::time::Duration;

use crate::ConversionError;

/// Trait for types that can be built from a single configuration string.
///
/// # Examples
///
/// ```rust
/// use infuse::{ConversionError, FromConfigValue};
///
/// struct Percent(u8);
///
/// impl FromConfigValue for Percent {
///     fn from_config_value(value: &str) -> Result<Self, ConversionError> {
///         let number = u8::from_config_value(value.trim_end_matches('%'))?;
///         if number > 100 {
///             return Err(ConversionError::new::<Self>(value, "out of range"));
///         }
///         Ok(Percent(number))
///     }
/// }
///
/// assert_eq!(Percent::from_config_value("42%").unwrap().0, 42);
/// assert!(Percent::from_config_value("142%").is_err());
/// ```
pub trait FromConfigValue: Sized {
    /// Parses `value` into `Self`.
    fn from_config_value(value: &str) -> Result<Self, ConversionError>;
}

/// Converts `value` into `T`.
///
/// ```rust
/// assert_eq!(infuse::convert::<u16>(" 8080 ").unwrap(), 8080);
/// assert!(infuse::convert::<u16>("eighty").is_err());
/// ```
pub fn convert<T>(value: &str) -> Result<T, ConversionError>
where
    T: FromConfigValue,
{
    T::from_config_value(value)
}

impl FromConfigValue for String {
    fn from_config_value(value: &str) -> Result<Self, ConversionError> {
        Ok(value.to_owned())
    }
}

impl FromConfigValue for Box<str> {
    fn from_config_value(value: &str) -> Result<Self, ConversionError> {
        Ok(value.into())
    }
}

impl FromConfigValue for PathBuf {
    fn from_config_value(value: &str) -> Result<Self, ConversionError> {
        Ok(PathBuf::from(value))
    }
}

impl FromConfigValue for char {
    fn from_config_value(value: &str) -> Result<Self, ConversionError> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConversionError::new::<Self>(
                value,
                "expected exactly one character",
            )),
        }
    }
}

impl FromConfigValue for bool {
    fn from_config_value(value: &str) -> Result<Self, ConversionError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "on" | "1" => Ok(true),
            "false" | "no" | "n" | "off" | "0" => Ok(false),
            _ => Err(ConversionError::new::<Self>(
                value,
                "expected one of true, false, yes, no, y, n, on, off, 1, 0",
            )),
        }
    }
}

impl FromConfigValue for Duration {
    fn from_config_value(value: &str) -> Result<Self, ConversionError> {
        duration_str::parse(value.trim())
            .map_err(|err| ConversionError::new::<Self>(value, err.to_string()))
    }
}

impl<T> FromConfigValue for Option<T>
where
    T: FromConfigValue,
{
    fn from_config_value(value: &str) -> Result<Self, ConversionError> {
        T::from_config_value(value).map(Some)
    }
}

macro_rules! impl_from_trimmed_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(value: &str) -> Result<Self, ConversionError> {
                    value
                        .trim()
                        .parse::<$ty>()
                        .map_err(|err| ConversionError::new::<$ty>(value, err))
                }
            }
        )*
    };
}

impl_from_trimmed_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl_from_trimmed_str!(
    NonZeroI8,
    NonZeroI16,
    NonZeroI32,
    NonZeroI64,
    NonZeroI128,
    NonZeroIsize,
    NonZeroU8,
    NonZeroU16,
    NonZeroU32,
    NonZeroU64,
    NonZeroU128,
    NonZeroUsize,
);

impl_from_trimmed_str!(IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

#[cfg(feature = "num-bigint")]
impl_from_trimmed_str!(num_bigint::BigInt, num_bigint::BigUint);

#[cfg(feature = "bigdecimal")]
impl_from_trimmed_str!(bigdecimal::BigDecimal);
