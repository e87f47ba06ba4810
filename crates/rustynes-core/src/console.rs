//! Top-level NES console: owns the CPU, bus, and framebuffer, and drives
//! emulation one instruction or one frame at a time.

use crate::bus::{ControllerState, NesBus};
use crate::palette;
use rustynes_cpu::Cpu;
use rustynes_mappers::{Cartridge, Rom, RomError};

/// NES emulation timing constants.
pub mod timing {
    /// Master clock frequency (NTSC).
    pub const MASTER_CLOCK_NTSC: u32 = 21_477_272;
    /// CPU clock frequency (NTSC).
    pub const CPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 12;
    /// PPU clock frequency (NTSC).
    pub const PPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 4;
    /// CPU cycles per frame (NTSC).
    pub const CPU_CYCLES_PER_FRAME: u32 = 29_780;
    /// PPU dots per scanline.
    pub const PPU_DOTS_PER_SCANLINE: u16 = 341;
    /// Total scanlines (including VBlank).
    pub const PPU_SCANLINES: u16 = 262;
    /// Target frame rate (NTSC).
    pub const FRAME_RATE_NTSC: f64 = 60.0988;
}

/// Errors creating a [`Console`].
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// ROM parsing or mapper selection failed.
    #[error(transparent)]
    Rom(#[from] RomError),
}

/// NES console emulator: CPU, bus (PPU + cartridge + controllers), and the
/// RGBA framebuffer callers read each frame.
pub struct Console {
    cpu: Cpu,
    bus: NesBus,
    framebuffer: Vec<u8>,
    total_cycles: u64,
    frame_count: u64,
    running: bool,
}

impl Console {
    /// Parse an iNES image and build a console around it.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Rom`] if the image is malformed or names an
    /// unsupported mapper.
    pub fn new(rom_data: &[u8]) -> Result<Self, ConsoleError> {
        let rom = Rom::load(rom_data)?;
        let cartridge = Cartridge::load(&rom)?;
        Ok(Self::with_cartridge(cartridge))
    }

    /// Build a console around an already-loaded cartridge.
    #[must_use]
    pub fn with_cartridge(cartridge: Cartridge) -> Self {
        Self {
            cpu: Cpu::new(),
            bus: NesBus::new(cartridge),
            framebuffer: vec![0; rustynes_ppu::WIDTH * rustynes_ppu::HEIGHT * 4],
            total_cycles: 0,
            frame_count: 0,
            running: true,
        }
    }

    /// Reset the console to its power-up state (RAM contents are left
    /// unspecified, matching hardware).
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.bus.reset();
        self.total_cycles = 0;
        self.running = true;
    }

    /// Power on the console (equivalent to [`Console::reset`]).
    pub fn power_on(&mut self) {
        self.reset();
    }

    /// Run one CPU instruction (or one OAM DMA transfer if one is pending).
    ///
    /// Returns the number of CPU cycles spent.
    pub fn step(&mut self) -> u16 {
        if !self.running {
            return 0;
        }

        if self.bus.oam_dma_pending() {
            let dma_cycles = self.bus.execute_oam_dma();
            self.clock_ppu(dma_cycles);
            self.total_cycles += u64::from(dma_cycles);
            return dma_cycles;
        }

        let cycles = self.cpu.step(&mut self.bus);
        self.clock_ppu(u16::from(cycles));
        self.bus.add_cpu_cycles(cycles);
        self.total_cycles += u64::from(cycles);
        u16::from(cycles)
    }

    /// Advance the PPU (and CPU interrupt line) by `cpu_cycles` CPU cycles'
    /// worth of dots: three [`NesBus::clock`] ticks per CPU cycle.
    fn clock_ppu(&mut self, cpu_cycles: u16) {
        for _ in 0..(u32::from(cpu_cycles) * 3) {
            if self.bus.clock() {
                self.cpu.request_nmi();
            }
        }
    }

    /// Run roughly one frame's worth of CPU cycles (~29,780 NTSC).
    ///
    /// Returns the actual number of CPU cycles executed.
    pub fn step_frame(&mut self) -> u64 {
        let start_cycles = self.total_cycles;
        let target_cycles = self.total_cycles + u64::from(timing::CPU_CYCLES_PER_FRAME);

        while self.total_cycles < target_cycles && self.running {
            self.step();
        }

        self.update_framebuffer();
        self.frame_count += 1;

        self.total_cycles - start_cycles
    }

    /// Convert the PPU's palette-index framebuffer into RGBA.
    fn update_framebuffer(&mut self) {
        for (i, &palette_idx) in self.bus.framebuffer().iter().enumerate() {
            let (r, g, b) = palette::palette_to_rgb(palette_idx);
            let offset = i * 4;
            self.framebuffer[offset] = r;
            self.framebuffer[offset + 1] = g;
            self.framebuffer[offset + 2] = b;
            self.framebuffer[offset + 3] = 0xFF;
        }
    }

    /// The current framebuffer, 256x240 RGBA, updated once per
    /// [`Console::step_frame`] call.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Set controller 1 state from a button byte.
    pub fn set_controller_1(&mut self, buttons: u8) {
        self.bus.set_controller1(ControllerState { buttons });
    }

    /// Set controller 2 state from a button byte.
    pub fn set_controller_2(&mut self, buttons: u8) {
        self.bus.set_controller2(ControllerState { buttons });
    }

    /// Set controller 1 state.
    pub fn set_controller1(&mut self, state: ControllerState) {
        self.bus.set_controller1(state);
    }

    /// Set controller 2 state.
    pub fn set_controller2(&mut self, state: ControllerState) {
        self.bus.set_controller2(state);
    }

    /// Get controller 1 state.
    #[must_use]
    pub fn controller1(&self) -> ControllerState {
        self.bus.controller1()
    }

    /// Get controller 2 state.
    #[must_use]
    pub fn controller2(&self) -> ControllerState {
        self.bus.controller2()
    }

    /// Total CPU cycles executed since the last reset.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Total cycles executed (alias for [`Console::total_cycles`]).
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Completed frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether emulation is running (vs. paused).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pause emulation; [`Console::step`] and [`Console::step_frame`] become
    /// no-ops until [`Console::resume`].
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resume emulation after [`Console::pause`].
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Read-only access to the CPU, for debuggers.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable access to the CPU, for debuggers and test harnesses that
    /// force a specific entry state (e.g. `nestest`'s automation mode,
    /// which starts execution at `$C000` rather than the reset vector).
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// Read-only access to the PPU, for debuggers.
    #[must_use]
    pub fn ppu(&self) -> &rustynes_ppu::Ppu {
        self.bus.ppu()
    }

    /// Read-only access to the bus, for debuggers.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable access to the bus.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// iNES mapper number of the loaded cartridge.
    #[must_use]
    pub fn mapper_number(&self) -> u16 {
        self.bus.mapper_number()
    }

    /// Human-readable mapper name of the loaded cartridge.
    #[must_use]
    pub fn mapper_name(&self) -> &'static str {
        self.bus.mapper_name()
    }

    /// Peek at memory without triggering PPU register or controller shift
    /// side effects. For debuggers and memory-view UIs.
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        self.bus.debug_read(addr)
    }

    /// Disassemble instructions from `start` up to and including `end`,
    /// walking back to back through [`Console::peek_memory`] so the console's
    /// CPU/bus state is left untouched.
    ///
    /// A region that isn't actually code will desync the mapping from that
    /// point on, same as any other linear disassembler.
    #[must_use]
    pub fn disassemble_range(&self, start: u16, end: u16) -> Vec<(u16, String)> {
        let mut out = Vec::new();
        let mut addr = start;
        let mut view = DebugBusView { bus: &self.bus };
        while addr <= end {
            let (text, len) = rustynes_cpu::disassemble(&mut view, addr);
            out.push((addr, text));
            let Some(next) = addr.checked_add(len) else {
                break;
            };
            addr = next;
        }
        out
    }
}

/// Adapts [`NesBus::debug_read`] to [`rustynes_cpu::Bus`] for the
/// disassembler, which only ever reads.
struct DebugBusView<'a> {
    bus: &'a NesBus,
}

impl rustynes_cpu::Bus for DebugBusView<'_> {
    fn read(&mut self, addr: u16) -> u8 {
        self.bus.debug_read(addr)
    }

    fn write(&mut self, _addr: u16, _value: u8) {}
}
