//! Resume screening and the hiring pipeline an admitted application moves through.

pub mod applications;
pub mod jobs;
pub mod screening;
