//! Use cases of the marketplace, written against the ports in `domains`.

pub mod accounts;
pub mod ads;

pub use accounts::AccountService;
pub use ads::AdService;
