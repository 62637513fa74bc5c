/// Identifies who is accessing the bus.
///
/// The C64 has exactly one bus master the arbiter stalls: the CPU. VIC-II
/// does not go through this trait for its own video-matrix/character/sprite
/// fetches (it has a private banked read path) but is still named here so
/// `Bus::is_halted_for` and `check_interrupts` have a uniform shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusMaster {
    Cpu(usize),
    Vic,
}

/// Generic bus interface supporting halt/arbitration (BA line, in our case).
pub trait Bus {
    type Address: Copy + Into<u64>;
    type Data;

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// Read from I/O port address space (separate from memory on Z80-style CPUs).
    /// The 6510 has no separate I/O space; default maps to memory read.
    fn io_read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data {
        self.read(master, addr)
    }

    /// Write to I/O port address space. Default maps to memory write.
    fn io_write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data) {
        self.write(master, addr, data)
    }

    /// Check if the bus is halted for this master (BA line, on the C64).
    /// Returns true if the master must pause before the next bus cycle.
    fn is_halted_for(&self, master: BusMaster) -> bool;

    /// Generic interrupt query. CPUs pick what they need.
    fn check_interrupts(&self, target: BusMaster) -> InterruptState;
}

#[derive(Default, Clone, Copy, Debug)]
pub struct InterruptState {
    pub nmi: bool,
    pub irq: bool,
    pub firq: bool, // unused by the 6510; kept so the struct stays CPU-agnostic
}
