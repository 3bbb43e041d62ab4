pub mod config;
pub mod logging;

pub mod checksum;
pub mod client;
pub mod control;
pub mod copy;
pub mod error;
pub mod getter;
pub mod locator;
pub mod strategy;

pub use error::GetError;
pub use getter::{getter_for_scheme, Getter, Mode, Request, Retrieved, SmbGetter, Via};
pub use locator::Locator;
