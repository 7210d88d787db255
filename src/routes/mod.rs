//! src/routes/mod.rs

mod beta_signup;
mod health_check;

pub use beta_signup::*;
pub use health_check::*;
