pub mod inmate;

pub use inmate::{Inmate, NewInmate};
