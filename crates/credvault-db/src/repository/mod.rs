//! SurrealDB repository implementations.

mod credential;
mod division;
mod org_unit;
mod user;

pub use credential::SurrealCredentialRepository;
pub use division::SurrealDivisionRepository;
pub use org_unit::SurrealOrgUnitRepository;
pub use user::SurrealUserRepository;
