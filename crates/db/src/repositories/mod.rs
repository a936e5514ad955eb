//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods meant to run inside a
//! caller-owned transaction take `&mut PgConnection` instead.

pub mod form_repo;
pub mod question_repo;
pub mod response_repo;
pub mod revoked_token_repo;
pub mod user_repo;

pub use form_repo::FormRepo;
pub use question_repo::QuestionRepo;
pub use response_repo::ResponseRepo;
pub use revoked_token_repo::RevokedTokenRepo;
pub use user_repo::UserRepo;
