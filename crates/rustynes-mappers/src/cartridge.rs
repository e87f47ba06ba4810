//! Cartridge: owns PRG/CHR storage and the mapper that translates addresses
//! into it.
//!
//! The [`Mapper`] trait only answers "does this address belong to me, and if
//! so at what offset"; the cartridge is what actually holds the bytes and
//! performs the indexed read/write once the mapper has answered.

use crate::mapper::{Mapper, Mirroring};
use crate::nrom::Nrom;
use crate::rom::{Rom, RomError};

/// A loaded cartridge: PRG-ROM, CHR storage (ROM or RAM), and its mapper.
pub struct Cartridge {
    prg_rom: Vec<u8>,
    chr_memory: Vec<u8>,
    mapper: Box<dyn Mapper>,
}

/// Size of CHR-RAM provisioned when a cartridge declares zero CHR-ROM banks.
const CHR_RAM_SIZE: usize = 8 * 1024;

impl Cartridge {
    /// Build a cartridge from a parsed [`Rom`], selecting and constructing
    /// the appropriate mapper.
    ///
    /// # Errors
    ///
    /// Returns [`RomError::UnsupportedMapper`] for any mapper number other
    /// than 0.
    pub fn load(rom: &Rom) -> Result<Self, RomError> {
        let mapper_number = rom.header.mapper;
        let mapper: Box<dyn Mapper> = match mapper_number {
            0 => {
                let prg_banks = rom.header.prg_rom_units.max(1);
                let chr_is_ram = rom.header.chr_rom_units == 0;
                Box::new(Nrom::new(prg_banks, chr_is_ram, rom.header.mirroring))
            }
            n => return Err(RomError::UnsupportedMapper(n)),
        };

        let chr_memory = if rom.chr_rom.is_empty() {
            vec![0; CHR_RAM_SIZE]
        } else {
            rom.chr_rom.clone()
        };

        log::info!(
            "cartridge ready: mapper {} ({}), {} KiB PRG, {} KiB CHR ({})",
            mapper.mapper_number(),
            mapper.mapper_name(),
            rom.prg_rom.len() / 1024,
            chr_memory.len() / 1024,
            if rom.chr_rom.is_empty() {
                "RAM"
            } else {
                "ROM"
            },
        );

        Ok(Self {
            prg_rom: rom.prg_rom.clone(),
            chr_memory,
            mapper,
        })
    }

    /// CPU-space read. Returns `None` if the mapper declines the address.
    #[must_use]
    pub fn cpu_read(&self, addr: u16) -> Option<u8> {
        let offset = self.mapper.cpu_map_read(addr)?;
        self.prg_rom.get(offset % self.prg_rom.len().max(1)).copied()
    }

    /// CPU-space write. Returns `true` if the mapper claimed the address
    /// (NROM never does, since it has no PRG-RAM or registers).
    pub fn cpu_write(&mut self, addr: u16, value: u8) -> bool {
        self.mapper.cpu_map_write(addr, value).is_some()
    }

    /// PPU-space (pattern table) read. Returns `None` if the mapper declines
    /// the address.
    #[must_use]
    pub fn ppu_read(&self, addr: u16) -> Option<u8> {
        let offset = self.mapper.ppu_map_read(addr)?;
        self.chr_memory.get(offset).copied()
    }

    /// PPU-space (pattern table) write. Returns `true` if the write was
    /// accepted (CHR-RAM only).
    pub fn ppu_write(&mut self, addr: u16, value: u8) -> bool {
        match self.mapper.ppu_map_write(addr, value) {
            Some(offset) => {
                if let Some(slot) = self.chr_memory.get_mut(offset) {
                    *slot = value;
                }
                true
            }
            None => false,
        }
    }

    /// Current nametable mirroring mode, as wired by the cartridge.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mapper.mirroring()
    }

    /// iNES mapper number, for diagnostics.
    #[must_use]
    pub fn mapper_number(&self) -> u16 {
        self.mapper.mapper_number()
    }

    /// Human-readable mapper name, for diagnostics.
    #[must_use]
    pub fn mapper_name(&self) -> &'static str {
        self.mapper.mapper_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::RomHeader;

    fn make_rom(prg_units: u8, chr_units: u8, mirroring: Mirroring) -> Rom {
        Rom {
            header: RomHeader {
                prg_rom_units: prg_units,
                chr_rom_units: chr_units,
                mirroring,
                has_trainer: false,
                mapper: 0,
            },
            trainer: None,
            prg_rom: (0..(prg_units as usize * 16 * 1024))
                .map(|i| (i & 0xFF) as u8)
                .collect(),
            chr_rom: if chr_units > 0 {
                (0..(chr_units as usize * 8 * 1024)).map(|i| (i & 0xFF) as u8).collect()
            } else {
                Vec::new()
            },
        }
    }

    #[test]
    fn loads_nrom_cartridge() {
        let rom = make_rom(2, 1, Mirroring::Horizontal);
        let cart = Cartridge::load(&rom).unwrap();
        assert_eq!(cart.cpu_read(0x8000), Some(0x00));
        assert_eq!(cart.mirroring(), Mirroring::Horizontal);
    }

    #[test]
    fn rejects_unsupported_mapper() {
        let mut rom = make_rom(1, 1, Mirroring::Horizontal);
        rom.header.mapper = 4;
        assert!(matches!(
            Cartridge::load(&rom),
            Err(RomError::UnsupportedMapper(4))
        ));
    }

    #[test]
    fn cpu_write_to_prg_space_is_declined() {
        let rom = make_rom(1, 1, Mirroring::Horizontal);
        let mut cart = Cartridge::load(&rom).unwrap();
        assert!(!cart.cpu_write(0x8000, 0xFF));
    }

    #[test]
    fn chr_ram_writes_persist() {
        let rom = make_rom(1, 0, Mirroring::Horizontal);
        let mut cart = Cartridge::load(&rom).unwrap();
        assert!(cart.ppu_write(0x0010, 0x42));
        assert_eq!(cart.ppu_read(0x0010), Some(0x42));
    }

    #[test]
    fn chr_rom_writes_are_rejected() {
        let rom = make_rom(1, 1, Mirroring::Horizontal);
        let mut cart = Cartridge::load(&rom).unwrap();
        assert!(!cart.ppu_write(0x0000, 0x99));
    }
}
