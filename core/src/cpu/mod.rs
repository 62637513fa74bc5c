use crate::core::component::BusMasterComponent;

/// Generic CPU interface
pub trait Cpu: BusMasterComponent + CpuStateTrait {
    /// Reset vector fetch
    fn reset(&mut self);

    /// Signal a specific interrupt line (implementation-defined)
    fn signal_interrupt(&mut self, int: crate::core::bus::InterruptState);

    /// Query if CPU is halted internally. The 6510 has no such state; always false.
    fn is_sleeping(&self) -> bool;
}

// Re-export state types
pub mod state;
pub use state::{CpuStateTrait, Mos6510State};

// The 6510 CPU
pub mod mos6510;
pub use mos6510::{Mos6510, StatusFlag};
