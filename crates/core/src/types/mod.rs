//! Shared type definitions.
//!
//! # Modules
//!
//! - [`id`] - Type-safe ID newtypes (`ShopId`, `ProductId`, `OrderId`, `CustomerId`)
//! - [`money`] - `Taka` money newtype over decimal arithmetic
//! - [`status`] - Status enums (`OrderStatus`, `ChatRole`)
//! - [`records`] - Business record structs fetched from the record store

pub mod id;
pub mod money;
pub mod records;
pub mod status;

pub use id::*;
pub use money::*;
pub use records::*;
pub use status::*;
