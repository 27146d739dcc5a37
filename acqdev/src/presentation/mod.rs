pub mod cli;

#[cfg(feature = "plot")]
pub mod plot;
