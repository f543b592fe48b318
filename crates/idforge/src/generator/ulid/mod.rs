mod basic;
mod mono;
#[cfg(test)]
mod tests;

pub use basic::*;
pub use mono::*;
