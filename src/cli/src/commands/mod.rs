pub mod actions;
pub mod check;
pub mod matrix;
pub mod policy;
pub mod roles;
