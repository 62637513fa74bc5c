pub mod commodore64;

pub use commodore64::Commodore64;
