//! Core pallet count types

mod code;
mod mapping;
mod reference;

pub use code::{Code, CodeError};
pub use mapping::{Quantity, QuantityMap};
pub use reference::{ReferenceRow, ReferenceSheet};
