#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # onewire-core
//! Minimal no-std building blocks for 1-Wire communication through a bus master.
//!
//! [OneWire] describes the reset, bit and byte level operations a master (a bit-banged pin,
//! a UART trick or a bridge chip such as the DS2482) offers to a slave driver. Slave drivers
//! are written against this trait and never see the master's own register protocol.
//!
//! [OneWireCrc] computes the Dallas/Maxim CRC-8 used by ROM codes and scratchpads.

mod consts;
mod error;
mod traits;
mod utils;
pub use consts::ONEWIRE_SKIP_ROM_CMD;
pub use error::OneWireError;
pub use traits::{OneWire, OneWireStatus};
pub use utils::OneWireCrc;

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
