mod admin;
mod forge;
mod initdb;
mod serve;

pub use admin::cmd_admin;
pub use forge::{FIXTURE_MOVIES, FIXTURE_USER, cmd_forge, seed_fixtures};
pub use initdb::cmd_initdb;
pub use serve::cmd_serve;
