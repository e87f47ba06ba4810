//! iNES cartridge parsing and the NES cartridge mapper abstraction.
//!
//! This crate loads an iNES ROM image, exposes its header fields, and
//! provides the [`Mapper`] trait that translates CPU/PPU bus addresses into
//! offsets within a cartridge's PRG/CHR storage.
//!
//! # Supported mappers
//!
//! | Mapper | Name | Description |
//! |--------|------|-------------|
//! | 0 | NROM | No banking, fixed 16/32 KiB PRG-ROM and 8 KiB CHR |
//!
//! Only Mapper 0 is implemented, but [`Mapper`] does not hard-code that: it
//! is a plain address-translation interface any future mapper can implement.
//!
//! # Example
//!
//! ```no_run
//! use rustynes_mappers::{Cartridge, Rom};
//!
//! let rom_data = std::fs::read("game.nes").expect("failed to read ROM");
//! let rom = Rom::load(&rom_data).expect("failed to parse ROM");
//! let cartridge = Cartridge::load(&rom).expect("unsupported mapper");
//! let opcode = cartridge.cpu_read(0x8000);
//! ```

#![warn(missing_docs)]

pub mod cartridge;
pub mod mapper;
pub mod nrom;
pub mod rom;

pub use cartridge::Cartridge;
pub use mapper::{Mapper, Mirroring};
pub use nrom::Nrom;
pub use rom::{Rom, RomError, RomHeader};
