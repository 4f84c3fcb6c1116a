pub mod assets;
pub mod cards;
pub mod checkouts;
pub mod core;
pub mod gateway;
pub mod holds;
pub mod ledger;
pub mod lifecycle;
pub mod utils;
