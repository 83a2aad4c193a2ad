pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod model;
pub mod role_store;
pub mod transport;

pub use api::{AdminClient, CachedEntity};
pub use config::{AdminClientConfig, ApiConfig, CacheConfig, ConfigError, LogConfig};
pub use editor::{group_permissions, EditorState, PermissionEditor, PermissionGroup, PermissionRow};
pub use error::AdminError;
pub use logging::init_logging;
pub use role_store::{InMemoryRoleStore, RolePermissionsApi};
pub use transport::{AdminTransport, ApiRequest, HttpTransport, Method};

pub use booking_admin_cache::{CacheTag, Mutation, QueryCache, TagId, TagType};
pub use booking_admin_normalize::{PaginatedResponse, PaginationParams};

#[cfg(feature = "mock")]
pub use role_store::MockRolePermissionsApi;
#[cfg(feature = "mock")]
pub use transport::MockAdminTransport;
