//! Bit size helpers for type-safe key sizes

/// Type-safe bit size representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitSize {
    /// The number of bits
    pub bits: u32,
}

impl BitSize {
    /// Convert to bytes, rounding down
    #[must_use]
    pub fn to_bytes(&self) -> usize {
        (self.bits / 8) as usize
    }

    /// Whether the size is a whole, non-zero number of bytes
    #[must_use]
    pub fn is_byte_aligned(&self) -> bool {
        self.bits > 0 && self.bits % 8 == 0
    }
}

/// Extension trait for bit conversion
///
/// ```
/// use jwtsmith_key::Bits;
///
/// assert_eq!(256u32.bits().to_bytes(), 32);
/// ```
pub trait Bits {
    /// Convert to `BitSize`
    fn bits(self) -> BitSize;
}

impl Bits for u32 {
    fn bits(self) -> BitSize {
        BitSize { bits: self }
    }
}

impl Bits for usize {
    fn bits(self) -> BitSize {
        // Clamp absurd sizes instead of wrapping
        let bits = u32::try_from(self).unwrap_or(u32::MAX);
        BitSize { bits }
    }
}
