pub mod error;
pub mod net;
pub mod proto;
pub mod queue;
pub mod sim;
pub mod viz;

pub use error::SimError;

#[cfg(test)]
mod test;
