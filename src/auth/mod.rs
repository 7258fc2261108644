mod admins;
mod identity;
mod middleware;
mod session;

pub use admins::AdminList;
pub use identity::{IdentityProvider, UsersServiceClient};
pub use middleware::{AuthError, RequireSession};
pub use session::{
    SESSION_COOKIE, SESSION_MAX_AGE_DAYS, expired_session_cookie, session_cookie,
    session_token_from_headers,
};
