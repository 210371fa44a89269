pub mod revoked_token;
pub mod url_mapping;
pub mod user;

pub use revoked_token::Entity as RevokedTokenEntity;
pub use url_mapping::Entity as UrlMappingEntity;
pub use user::Entity as UserEntity;
