mod meta;
pub use self::meta::{PaginatedResponse, Pagination, Response};

mod problem;
pub use self::problem::{ErrorEnvelope, ErrorTag, ProblemLink, UnknownErrorTag};

mod provider;
pub use self::provider::Provider;

mod user;
pub use self::user::User;

mod organization;
pub use self::organization::Organization;

mod repository;
pub use self::repository::{Branch, Repository};
