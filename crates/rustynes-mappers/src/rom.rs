//! iNES ROM file format parsing.
//!
//! Only the original 16-byte iNES header is supported (bytes 8..16 are
//! ignored, per the iNES-1.0 compatibility note in the format); NES 2.0's
//! extended header fields are out of scope for this core.

use crate::Mirroring;

/// Errors that can occur when parsing an iNES ROM image.
#[derive(Debug, thiserror::Error)]
pub enum RomError {
    /// File is too small to contain a 16-byte header.
    #[error("ROM file too small: expected at least {HEADER_SIZE} bytes, got {0}")]
    FileTooSmall(usize),

    /// The first four bytes are not `4E 45 53 1A`.
    #[error("invalid iNES magic number: expected 4E 45 53 1A, got {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// The file is shorter than the header's declared PRG/CHR sizes imply.
    #[error("ROM body truncated: expected at least {expected} bytes after header, got {actual}")]
    BodyTruncated {
        /// Expected body size in bytes (trainer + PRG-ROM + CHR-ROM).
        expected: usize,
        /// Actual body size in bytes.
        actual: usize,
    },

    /// The header names a mapper number this crate does not implement.
    #[error("unsupported mapper number: {0}")]
    UnsupportedMapper(u16),
}

/// Size of the iNES header, in bytes.
pub const HEADER_SIZE: usize = 16;

/// Size of a single PRG-ROM bank, in bytes.
pub const PRG_BANK_SIZE: usize = 16 * 1024;

/// Size of a single CHR-ROM bank, in bytes.
pub const CHR_BANK_SIZE: usize = 8 * 1024;

/// Size of the optional trainer block, in bytes.
pub const TRAINER_SIZE: usize = 512;

const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

/// Parsed iNES header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomHeader {
    /// PRG-ROM size, in 16 KiB units.
    pub prg_rom_units: u8,
    /// CHR-ROM size, in 8 KiB units. Zero means the cartridge uses CHR-RAM.
    pub chr_rom_units: u8,
    /// Nametable mirroring wired by the cartridge.
    pub mirroring: Mirroring,
    /// Whether the cartridge has a 512-byte trainer preceding PRG-ROM.
    pub has_trainer: bool,
    /// iNES mapper number: `(flags7 high nibble << 4) | flags6 high nibble`.
    pub mapper: u16,
}

impl RomHeader {
    /// Parse the 16-byte header from the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`RomError::FileTooSmall`] if `data` is shorter than
    /// [`HEADER_SIZE`], or [`RomError::InvalidMagic`] if the magic bytes
    /// don't match.
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < HEADER_SIZE {
            return Err(RomError::FileTooSmall(data.len()));
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != MAGIC {
            return Err(RomError::InvalidMagic(magic));
        }

        let prg_rom_units = data[4];
        let chr_rom_units = data[5];
        let flags6 = data[6];
        let flags7 = data[7];

        let mirroring = if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let has_trainer = flags6 & 0x04 != 0;
        let mapper = (u16::from(flags7) & 0xF0) | (u16::from(flags6) >> 4);

        Ok(Self {
            prg_rom_units,
            chr_rom_units,
            mirroring,
            has_trainer,
            mapper,
        })
    }

    /// PRG-ROM size in bytes.
    #[must_use]
    pub const fn prg_rom_size(self) -> usize {
        self.prg_rom_units as usize * PRG_BANK_SIZE
    }

    /// CHR-ROM size in bytes (0 if the cartridge uses CHR-RAM).
    #[must_use]
    pub const fn chr_rom_size(self) -> usize {
        self.chr_rom_units as usize * CHR_BANK_SIZE
    }
}

/// A parsed iNES cartridge image: header plus PRG-ROM/CHR-ROM bodies.
#[derive(Debug, Clone)]
pub struct Rom {
    /// The parsed header.
    pub header: RomHeader,
    /// Optional 512-byte trainer, if `header.has_trainer`.
    pub trainer: Option<Vec<u8>>,
    /// PRG-ROM bytes (`header.prg_rom_size()` long).
    pub prg_rom: Vec<u8>,
    /// CHR-ROM bytes (empty when the cartridge uses CHR-RAM).
    pub chr_rom: Vec<u8>,
}

impl Rom {
    /// Parse a complete iNES file: header, optional trainer, PRG-ROM, and
    /// CHR-ROM.
    ///
    /// # Errors
    ///
    /// See [`RomHeader::parse`] for header errors; returns
    /// [`RomError::BodyTruncated`] if `data` does not contain as many bytes
    /// as the header declares.
    pub fn load(data: &[u8]) -> Result<Self, RomError> {
        let header = RomHeader::parse(data)?;

        let mut offset = HEADER_SIZE;

        let trainer = if header.has_trainer {
            let end = offset + TRAINER_SIZE;
            if data.len() < end {
                return Err(RomError::BodyTruncated {
                    expected: end - HEADER_SIZE,
                    actual: data.len() - HEADER_SIZE,
                });
            }
            let t = data[offset..end].to_vec();
            offset = end;
            Some(t)
        } else {
            None
        };

        let prg_size = header.prg_rom_size();
        let prg_end = offset + prg_size;
        if data.len() < prg_end {
            return Err(RomError::BodyTruncated {
                expected: prg_end - HEADER_SIZE,
                actual: data.len() - HEADER_SIZE,
            });
        }
        let prg_rom = data[offset..prg_end].to_vec();
        offset = prg_end;

        let chr_size = header.chr_rom_size();
        let chr_end = offset + chr_size;
        if data.len() < chr_end {
            return Err(RomError::BodyTruncated {
                expected: chr_end - HEADER_SIZE,
                actual: data.len() - HEADER_SIZE,
            });
        }
        let chr_rom = data[offset..chr_end].to_vec();

        log::debug!(
            "loaded iNES ROM: mapper {}, {} KiB PRG, {} KiB CHR, {:?} mirroring",
            header.mapper,
            prg_rom.len() / 1024,
            chr_rom.len() / 1024,
            header.mirroring,
        );

        Ok(Self {
            header,
            trainer,
            prg_rom,
            chr_rom,
        })
    }
}
