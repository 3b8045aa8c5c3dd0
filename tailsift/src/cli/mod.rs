pub mod check;
pub mod classify;
pub mod import;
pub mod run;
