//! Core business logic - framework-agnostic session, cart, directory and bill
//! operations. Nothing here knows about the console.

pub mod bill;
pub mod cart;
pub mod directory;
pub mod input;
pub mod session;

pub use bill::Bill;
pub use cart::{Cart, DEFAULT_CART_CAPACITY};
pub use directory::DirectoryOutcome;
pub use session::Session;
