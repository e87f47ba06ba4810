//! PPU VRAM (Video RAM) and palette RAM.
//!
//! The PPU has access to:
//! - 2KB internal VRAM for nametables (mirrored to 4KB address space)
//! - 32 bytes of palette RAM
//! - External CHR ROM/RAM (accessed through the cartridge, not this module)
//!
//! # Address Space ($0000-$3FFF)
//!
//! ```text
//! $0000-$0FFF: Pattern Table 0 (cartridge CHR)
//! $1000-$1FFF: Pattern Table 1 (cartridge CHR)
//! $2000-$23FF: Nametable 0
//! $2400-$27FF: Nametable 1
//! $2800-$2BFF: Nametable 2
//! $2C00-$2FFF: Nametable 3
//! $3000-$3EFF: Mirror of $2000-$2EFF
//! $3F00-$3F1F: Palette RAM (32 bytes)
//! $3F20-$3FFF: Mirror of $3F00-$3F1F
//! ```
//!
//! # Nametable Mirroring
//!
//! The NES only has 2KB of internal VRAM, so the cartridge wires the two
//! logical nametables together one of two ways:
//! - **Horizontal**: A A B B
//! - **Vertical**: A B A B

pub use rustynes_mappers::Mirroring;

/// Internal nametable and palette RAM. Pattern-table access ($0000-$1FFF) is
/// not handled here; the PPU delegates those addresses to the cartridge.
pub struct Vram {
    nametables: Vec<u8>,
    palette: Vec<u8>,
    mirroring: Mirroring,
}

impl Vram {
    /// Create VRAM wired with the cartridge's mirroring.
    #[must_use]
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            nametables: vec![0; 2048],
            palette: vec![0; 32],
            mirroring,
        }
    }

    /// Change mirroring, e.g. after loading a new cartridge.
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    /// Current mirroring mode.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Read a nametable ($2000-$2FFF, mirrored through $3EFF) or palette
    /// ($3F00-$3FFF) byte. Callers must route $0000-$1FFF to the cartridge.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => {
                log::warn!("VRAM read from pattern table ${addr:04X}; not routed to cartridge");
                0
            }
            0x2000..=0x2FFF => self.nametables[self.mirror_nametable_addr(addr)],
            0x3000..=0x3EFF => self.nametables[self.mirror_nametable_addr(addr - 0x1000)],
            0x3F00..=0x3FFF => self.palette[self.mirror_palette_addr(addr)],
            _ => unreachable!(),
        }
    }

    /// Write a nametable or palette byte; see [`Vram::read`].
    pub fn write(&mut self, addr: u16, value: u8) {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => {
                log::warn!("VRAM write to pattern table ${addr:04X}; not routed to cartridge");
            }
            0x2000..=0x2FFF => {
                let a = self.mirror_nametable_addr(addr);
                self.nametables[a] = value;
            }
            0x3000..=0x3EFF => {
                let a = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[a] = value;
            }
            0x3F00..=0x3FFF => {
                let a = self.mirror_palette_addr(addr);
                self.palette[a] = value;
            }
            _ => unreachable!(),
        }
    }

    fn mirror_nametable_addr(&self, addr: u16) -> usize {
        let addr = addr & 0x0FFF;
        let nametable = (addr / 0x0400) as usize;
        let offset = (addr % 0x0400) as usize;

        match self.mirroring {
            Mirroring::Horizontal => {
                let bank = usize::from(nametable >= 2);
                bank * 0x0400 + offset
            }
            Mirroring::Vertical => {
                let bank = nametable % 2;
                bank * 0x0400 + offset
            }
        }
    }

    /// $3F10/$3F14/$3F18/$3F1C mirror $3F00/$3F04/$3F08/$3F0C; everything
    /// mirrors every 32 bytes.
    fn mirror_palette_addr(&self, addr: u16) -> usize {
        let mut addr = (addr & 0x1F) as usize;
        if addr >= 0x10 && addr % 4 == 0 {
            addr -= 0x10;
        }
        addr
    }

    /// Read a palette entry directly by its 5-bit index, for pixel synthesis.
    #[must_use]
    #[inline]
    pub fn read_palette(&self, addr: u8) -> u8 {
        let addr = self.mirror_palette_addr(0x3F00 | u16::from(addr));
        self.palette[addr]
    }

    /// Clear nametables and palette RAM to the power-up state.
    pub fn reset(&mut self) {
        self.nametables.fill(0);
        self.palette.fill(0);
    }
}

impl Default for Vram {
    fn default() -> Self {
        Self::new(Mirroring::Horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_mirroring_pairs_0_1_and_2_3() {
        let vram = Vram::new(Mirroring::Horizontal);
        assert_eq!(vram.mirror_nametable_addr(0x2000), 0x0000);
        assert_eq!(vram.mirror_nametable_addr(0x2400), 0x0000);
        assert_eq!(vram.mirror_nametable_addr(0x2800), 0x0400);
        assert_eq!(vram.mirror_nametable_addr(0x2C00), 0x0400);
    }

    #[test]
    fn vertical_mirroring_pairs_0_2_and_1_3() {
        let vram = Vram::new(Mirroring::Vertical);
        assert_eq!(vram.mirror_nametable_addr(0x2000), 0x0000);
        assert_eq!(vram.mirror_nametable_addr(0x2800), 0x0000);
        assert_eq!(vram.mirror_nametable_addr(0x2400), 0x0400);
        assert_eq!(vram.mirror_nametable_addr(0x2C00), 0x0400);
    }

    #[test]
    fn palette_mirroring() {
        let vram = Vram::new(Mirroring::Horizontal);
        assert_eq!(vram.mirror_palette_addr(0x3F00), 0x00);
        assert_eq!(vram.mirror_palette_addr(0x3F0F), 0x0F);
        assert_eq!(vram.mirror_palette_addr(0x3F10), 0x00);
        assert_eq!(vram.mirror_palette_addr(0x3F14), 0x04);
        assert_eq!(vram.mirror_palette_addr(0x3F18), 0x08);
        assert_eq!(vram.mirror_palette_addr(0x3F1C), 0x0C);
        assert_eq!(vram.mirror_palette_addr(0x3F11), 0x11);
        assert_eq!(vram.mirror_palette_addr(0x3F1F), 0x1F);
    }

    #[test]
    fn palette_read_write_roundtrip() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        vram.write(0x3F00, 0x0F);
        vram.write(0x3F01, 0x30);
        assert_eq!(vram.read(0x3F00), 0x0F);
        assert_eq!(vram.read(0x3F01), 0x30);

        vram.write(0x3F10, 0x20);
        assert_eq!(vram.read(0x3F00), 0x20);
    }

    #[test]
    fn nametable_read_write_roundtrip() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        vram.write(0x2000, 0x42);
        assert_eq!(vram.read(0x2000), 0x42);
        assert_eq!(vram.read(0x2400), 0x42);
    }

    #[test]
    fn nametable_mirror_region_above_0x3000() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        vram.write(0x2000, 0x55);
        assert_eq!(vram.read(0x3000), 0x55);

        vram.write(0x3100, 0xAA);
        assert_eq!(vram.read(0x2100), 0xAA);
    }

    #[test]
    fn palette_32_byte_mirror() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        vram.write(0x3F00, 0x11);
        assert_eq!(vram.read(0x3F20), 0x11);
        assert_eq!(vram.read(0x3F40), 0x11);
        assert_eq!(vram.read(0x3FE0), 0x11);
    }

    #[test]
    fn changing_mirroring_takes_effect_immediately() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        vram.write(0x2000, 0x42);
        vram.write(0x2400, 0x55);
        assert_eq!(vram.read(0x2000), 0x55);

        vram.set_mirroring(Mirroring::Vertical);
        vram.write(0x2000, 0xAA);
        assert_eq!(vram.read(0x2000), 0xAA);
        assert_eq!(vram.read(0x2400), 0x00);
    }

    #[test]
    fn reset_clears_nametables_and_palette() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        vram.write(0x2000, 0x42);
        vram.write(0x3F00, 0x0F);
        vram.reset();
        assert_eq!(vram.read(0x2000), 0x00);
        assert_eq!(vram.read(0x3F00), 0x00);
    }
}
