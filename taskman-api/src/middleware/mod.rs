/// Middleware for the API server
///
/// - `session`: session cookie validation and `Principal` injection

pub mod session;
