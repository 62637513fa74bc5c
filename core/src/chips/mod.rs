pub mod cia6526;
pub mod sid6581;
pub mod vic_ii;

pub use cia6526::Cia6526;
pub use sid6581::Sid6581;
pub use vic_ii::VicII;
