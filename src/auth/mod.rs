pub mod jwt;
pub mod middleware;
pub mod session;

pub use jwt::{Claims, JwtService};
pub use middleware::BearerSession;
pub use session::Session;
