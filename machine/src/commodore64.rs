//! The NTSC-free, PAL Commodore 64: a 6510, two 6526 CIAs, a 6569 VIC-II,
//! a 6581 SID, 64K of RAM, and the three ROM images, wired together behind
//! a single flat address space.
//!
//! Cycle order within a tick follows the chip-select priority a real C64's
//! bus arbitration gives: CIA1, then CIA2, then VIC-II (which may also
//! render this cycle and may assert BA), then SID, then finally the CPU
//! (which is skipped entirely for the tick if BA is low).

use phosphor_core::chips::{Cia6526, Sid6581, VicII};
use phosphor_core::core::machine::{InputButton, Machine};
use phosphor_core::core::{Bus, BusMaster, BusMasterComponent, bus::InterruptState};
use phosphor_core::cpu::{Cpu, Mos6510};
use phosphor_core::memory::{Memory, pla};

const CYCLES_PER_FRAME: u32 = 312 * 63;

/// PAL master clock: ~17.7 MHz / 18 = ~0.985 MHz phi2.
pub const PHI2_HZ: u32 = 985_248;

pub struct Commodore64 {
    pub cpu: Mos6510,
    pub cia1: Cia6526,
    pub cia2: Cia6526,
    pub vic: VicII,
    pub sid: Sid6581,
    pub memory: Memory,
    clock: u64,
}

impl Commodore64 {
    pub fn new(basic_rom: &[u8], kernal_rom: &[u8], char_rom: &[u8]) -> Self {
        Commodore64 {
            cpu: Mos6510::new(),
            cia1: Cia6526::new(),
            cia2: Cia6526::new(),
            vic: VicII::new(),
            sid: Sid6581::new(),
            memory: Memory::new(basic_rom, kernal_rom, char_rom),
            clock: 0,
        }
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// VIC-II's 16K window, selected by CIA2 port A bits 0..1 (inverted:
    /// the stored value is the bank's complement relative to bit pattern).
    fn vic_bank_base(&self) -> usize {
        let bits = !self.cia2.output_a() & 0x03;
        (bits as usize) * 0x4000
    }

    /// Advance every chip by one phi2 cycle, in hardware chip-select order.
    /// Returns true if this cycle retired a CPU instruction (fetch boundary).
    pub fn tick(&mut self) -> bool {
        self.cia1.clock();
        self.cia2.clock();

        let bank_base = self.vic_bank_base();
        let ram_window = &self.memory.ram[bank_base..bank_base + 0x4000];
        self.vic
            .clock(ram_window, &self.memory.char_rom, &self.memory.color_ram);

        self.sid.clock();

        let retired = if self.vic.ba_low() {
            false
        } else {
            let bus_ptr: *mut Self = self;
            unsafe {
                let bus = &mut *bus_ptr as &mut dyn Bus<Address = u16, Data = u8>;
                self.cpu.tick_with_bus(bus, BusMaster::Cpu(0))
            }
        };

        self.clock += 1;
        retired
    }

    pub fn run_frame(&mut self) {
        for _ in 0..CYCLES_PER_FRAME {
            self.tick();
        }
    }

    fn chip_io_read(&mut self, addr: u16) -> u8 {
        match addr {
            0xD000..=0xD3FF => self.vic.read((addr & 0x3F) as u8),
            0xD400..=0xD7FF => self.sid.read((addr & 0x1F) as u8),
            0xD800..=0xDBFF => self.memory.read_color_ram(addr - 0xD800),
            0xDC00..=0xDCFF => self.cia1.read((addr & 0x0F) as u8),
            0xDD00..=0xDDFF => self.cia2.read((addr & 0x0F) as u8),
            // DE00..DFFF: cartridge I/O1/I/O2, no cartridge modeled, open bus.
            _ => 0xFF,
        }
    }

    fn chip_io_write(&mut self, addr: u16, data: u8) {
        match addr {
            0xD000..=0xD3FF => self.vic.write((addr & 0x3F) as u8, data),
            0xD400..=0xD7FF => self.sid.write((addr & 0x1F) as u8, data),
            0xD800..=0xDBFF => self.memory.write_color_ram(addr - 0xD800, data),
            0xDC00..=0xDCFF => self.cia1.write((addr & 0x0F) as u8, data),
            0xDD00..=0xDDFF => self.cia2.write((addr & 0x0F) as u8, data),
            _ => {}
        }
    }
}

impl Bus for Commodore64 {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, master: BusMaster, addr: u16) -> u8 {
        if let BusMaster::Cpu(_) = master {
            if addr == 0x0000 {
                return self.cpu.port_dir;
            }
            if addr == 0x0001 {
                return self.cpu.read_port_data();
            }
        }
        let (loram, hiram, charen) = self.cpu.pla_bits();
        match pla::decode(addr, loram, hiram, charen) {
            pla::Bank::Ram => self.memory.ram[addr as usize],
            pla::Bank::BasicRom => self.memory.basic_rom[(addr - 0xA000) as usize],
            pla::Bank::KernalRom => self.memory.kernal_rom[(addr - 0xE000) as usize],
            pla::Bank::CharRom => self.memory.char_rom[(addr - 0xD000) as usize],
            pla::Bank::Io => self.chip_io_read(addr),
        }
    }

    fn write(&mut self, master: BusMaster, addr: u16, data: u8) {
        if let BusMaster::Cpu(_) = master {
            if addr == 0x0000 {
                self.cpu.port_dir = data;
                return;
            }
            if addr == 0x0001 {
                self.cpu.port_data = data;
                return;
            }
        }
        let (loram, hiram, charen) = self.cpu.pla_bits();
        // Writes always reach the underlying RAM; ROM banks are read-only
        // overlays, and $D000..$DFFF as I/O diverts entirely to the chips.
        if matches!(pla::decode(addr, loram, hiram, charen), pla::Bank::Io) {
            self.chip_io_write(addr, data);
        } else {
            self.memory.ram[addr as usize] = data;
        }
    }

    /// Satisfies the `Bus` trait contract; `tick()` reads `vic.ba_low()`
    /// directly rather than through this method, so nothing in this crate
    /// is actually gated by it.
    fn is_halted_for(&self, master: BusMaster) -> bool {
        matches!(master, BusMaster::Cpu(_)) && self.vic.ba_low()
    }

    fn check_interrupts(&self, target: BusMaster) -> InterruptState {
        match target {
            BusMaster::Cpu(_) => InterruptState {
                nmi: self.cia2.irq_pending(),
                irq: self.cia1.irq_pending() || self.vic.irq_pending(),
                firq: false,
            },
            BusMaster::Vic => InterruptState::default(),
        }
    }
}

/// Matrix row/col for each of the 64 C64 keyboard positions a frontend is
/// likely to want to drive; id is `row * 8 + col`.
const KEY_NAMES: [&str; 64] = [
    "Del", "Return", "CursorLR", "F7", "F1", "F3", "F5", "CursorUD", "3", "W", "A", "4", "Z", "S",
    "E", "LShift", "5", "R", "D", "6", "C", "F", "T", "X", "7", "Y", "G", "8", "B", "H", "U", "V",
    "9", "I", "J", "0", "M", "K", "O", "N", "Plus", "P", "L", "Minus", ".", "Colon", "At", ",",
    "Pound", "*", ";", "Home", "RShift", "Equals", "ArrowUp", "/", "1", "ArrowLeft", "Ctrl", "2",
    "Space", "Commodore", "Q", "RunStop",
];

fn key_id(row: usize, col: usize) -> u8 {
    (row * 8 + col) as u8
}

impl Machine for Commodore64 {
    fn display_size(&self) -> (u32, u32) {
        (phosphor_core::chips::vic_ii::WIDTH as u32, phosphor_core::chips::vic_ii::HEIGHT as u32)
    }

    fn run_frame(&mut self) {
        Commodore64::run_frame(self);
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        for (i, &px) in self.vic.framebuffer.iter().enumerate() {
            let o = i * 3;
            if o + 2 >= buffer.len() {
                break;
            }
            buffer[o] = (px >> 16) as u8;
            buffer[o + 1] = (px >> 8) as u8;
            buffer[o + 2] = px as u8;
        }
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        let row = (button / 8) as usize;
        let col = (button % 8) as usize;
        if row < 8 {
            self.cia1.set_key(row, col, pressed);
        }
    }

    fn input_map(&self) -> &[InputButton] {
        // Leaked once: a fixed 64-entry table for the lifetime of the process.
        // Matches the teacher's pattern of returning a 'static slice from
        // `input_map()` without per-call allocation.
        static MAP: std::sync::OnceLock<Vec<InputButton>> = std::sync::OnceLock::new();
        MAP.get_or_init(|| {
            (0..8)
                .flat_map(|row| (0..8).map(move |col| (row, col)))
                .map(|(row, col)| InputButton {
                    id: key_id(row, col),
                    name: KEY_NAMES[row * 8 + col],
                })
                .collect()
        })
    }

    fn reset(&mut self) {
        self.cpu = Mos6510::new();
        self.cpu.reset();
        self.cia1 = Cia6526::new();
        self.cia2 = Cia6526::new();
        self.vic = VicII::new();
        self.sid = Sid6581::new();
        self.clock = 0;
    }
}
