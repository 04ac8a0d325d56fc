pub mod session_cookie;

pub use session_cookie::SessionCookieSigner;
