// Declare modules
pub mod implementation;
pub mod interface;

// Re-export the public API of the HTTP seam
pub use self::implementation::ReqwestRequester;
pub use self::interface::{ApiResponse, RequestOptions, Requester};
