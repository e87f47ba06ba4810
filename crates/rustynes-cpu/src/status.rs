//! CPU status register (P) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! |  |  |  |  |  |  |  +-- Carry
//! |  |  |  |  |  |  +----- Zero
//! |  |  |  |  |  +-------- Interrupt disable
//! |  |  |  |  +----------- Decimal (unused on the NES CPU, but still set/read)
//! |  |  |  +-------------- Break (1 when pushed by PHP/BRK, 0 from IRQ/NMI)
//! |  |  +----------------- Unused, always 1 when pushed to the stack
//! |  +-------------------- Overflow
//! +----------------------- Negative
//! ```

use bitflags::bitflags;

bitflags! {
    /// CPU status register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Carry.
        const C = 1 << 0;
        /// Zero.
        const Z = 1 << 1;
        /// Interrupt disable.
        const I = 1 << 2;
        /// Decimal mode.
        const D = 1 << 3;
        /// Break.
        const B = 1 << 4;
        /// Unused, forced to 1 at the start of every instruction.
        const U = 1 << 5;
        /// Overflow.
        const V = 1 << 6;
        /// Negative.
        const N = 1 << 7;
    }
}

impl Status {
    /// Status immediately after `reset` (before the caller ORs in `I`).
    pub const POWER_ON: Self = Self::U;

    /// Mask of flags PLP is allowed to change; B and U are not real stack
    /// bits and are left alone.
    pub const PLP_MASK: Self = Self::C
        .union(Self::Z)
        .union(Self::I)
        .union(Self::D)
        .union(Self::V)
        .union(Self::N);

    /// Set Z and N from `value`, the common "load result into flags" idiom.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set_flag(Self::Z, value == 0);
        self.set_flag(Self::N, value & 0x80 != 0);
    }

    /// Set or clear a single flag.
    #[inline]
    pub fn set_flag(&mut self, flag: Self, value: bool) {
        if value {
            *self |= flag;
        } else {
            *self &= !flag;
        }
    }

    /// Byte pushed to the stack by PHP/BRK/IRQ/NMI. `brk` distinguishes a
    /// software interrupt (B=1) from a hardware one (B=0); U is always 1.
    #[must_use]
    #[inline]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let mut value = self.bits() | Self::U.bits();
        if brk {
            value |= Self::B.bits();
        } else {
            value &= !Self::B.bits();
        }
        value
    }

    /// Status reconstructed from a byte pulled by PLP/RTI. B is discarded
    /// (it was never a stored flag), U is forced to 1.
    #[must_use]
    #[inline]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}
