pub mod agent;
pub mod collectors;
pub mod dispatch;
pub mod scheduler;

#[cfg(test)]
mod fakes;

pub use agent::Agent;
pub use dispatch::{CollectorDispatch, Sources};
