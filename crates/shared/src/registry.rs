//! Closed, wire-coded enumerations
//!
//! Each enum keeps its wire table (`ALL`) verbatim: symbolic names are
//! looked up, never derived, so mixed naming conventions survive untouched.
//! Parsing is total and lands on the enum's declared `FALLBACK`.

use std::fmt::Debug;

/// A closed enumeration with a wire code, a canonical symbolic name and a
/// fallback for unrecognized input
pub trait WireEnum: Copy + Eq + Debug + Sized + 'static {
    /// Integer or string wire code
    type Code: Copy + PartialEq + Debug;

    /// Family name used in log messages
    const FAMILY: &'static str;

    /// Variant returned for unrecognized codes or names
    const FALLBACK: Self;

    /// Every variant, in declaration order
    const ALL: &'static [Self];

    fn code(&self) -> Self::Code;

    /// Canonical symbolic name (the exact wire spelling)
    fn name(&self) -> &'static str;

    /// Total lookup by code
    fn from_code(code: Self::Code) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.code() == code)
            .unwrap_or(Self::FALLBACK)
    }

    /// Total, case-sensitive lookup by symbolic name
    fn from_name(name: &str) -> Self {
        Self::lookup_name(name).unwrap_or(Self::FALLBACK)
    }

    /// Total parse of a wire name; same as [`WireEnum::from_name`]
    fn parse(name: &str) -> Self {
        Self::from_name(name)
    }

    /// Exact-name lookup without fallback
    fn lookup_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }

    /// Whether this is the fallback variant
    fn is_fallback(&self) -> bool {
        *self == Self::FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Broken,
    }

    impl WireEnum for Light {
        type Code = i32;
        const FAMILY: &'static str = "Light";
        const FALLBACK: Self = Light::Broken;
        const ALL: &'static [Self] = &[Light::Red, Light::Green, Light::Broken];

        fn code(&self) -> i32 {
            match self {
                Light::Red => 1,
                Light::Green => 2,
                Light::Broken => -1,
            }
        }

        fn name(&self) -> &'static str {
            match self {
                Light::Red => "Red",
                Light::Green => "green_light",
                Light::Broken => "Broken",
            }
        }
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Light::from_code(1), Light::Red);
        assert_eq!(Light::from_code(2), Light::Green);
        assert_eq!(Light::from_code(77), Light::Broken);
    }

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(Light::from_name("Red"), Light::Red);
        assert_eq!(Light::from_name("green_light"), Light::Green);
        assert_eq!(Light::from_name("GreenLight"), Light::Broken);
        assert_eq!(Light::from_name("red"), Light::Broken);
        assert_eq!(Light::lookup_name("red"), None);
    }

    #[test]
    fn test_parse_is_total() {
        assert_eq!(Light::parse("green_light"), Light::Green);
        assert_eq!(Light::parse("not-a-light"), Light::Broken);
    }

    #[test]
    fn test_is_fallback() {
        assert!(Light::Broken.is_fallback());
        assert!(!Light::Red.is_fallback());
    }
}
