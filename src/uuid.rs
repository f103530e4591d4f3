use rand::Rng;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

// The unique identifier for one logical asset, for its whole lifetime.
// Serialized as lowercase base-16 text in meta files.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uuid(u64);

impl Uuid
{
    // zero is reserved for "no asset"
    pub const INVALID: Uuid = Uuid(0);

    #[must_use]
    pub fn create() -> Self
    {
        let mut rng = rand::rng();
        loop
        {
            let value: u64 = rng.random();
            if value != 0 { return Self(value); }
        }
    }

    #[inline] #[must_use]
    pub const fn from_raw(value: u64) -> Self { Self(value) }

    #[inline] #[must_use]
    pub const fn as_raw(self) -> u64 { self.0 }

    #[inline] #[must_use]
    pub const fn is_valid(self) -> bool { self.0 != 0 }
}
impl Display for Uuid
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "{:016x}", self.0)
    }
}
impl Debug for Uuid
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Display::fmt(self, f) }
}
impl FromStr for Uuid
{
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        u64::from_str_radix(s.trim(), 16).map(Self)
    }
}
