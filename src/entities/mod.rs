pub mod prelude;

pub mod inmates;
pub mod posts;
pub mod users;
