pub mod chips;
pub mod core;
pub mod cpu;
pub mod memory;

pub mod prelude {
    pub use crate::chips::{Cia6526, Sid6581, VicII};
    pub use crate::core::machine::{InputButton, Machine};
    pub use crate::core::{Bus, BusMaster, BusMasterComponent, Component, bus::InterruptState};
    pub use crate::cpu::Cpu;
    pub use crate::memory::Memory;
}
