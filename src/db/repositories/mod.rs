pub mod inmate;
pub mod user;
