//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run
//! inside a caller's transaction take `&mut Transaction` instead.

pub mod project_repo;
pub mod shoot_day_repo;

pub use project_repo::ProjectRepo;
pub use shoot_day_repo::ShootDayRepo;
