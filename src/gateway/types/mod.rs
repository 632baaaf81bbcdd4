//! Gateway types module
//!
//! ## Input Types
//! - [`LenientDecimal`]: amount accepted as JSON number or numeric string
//! - [`PaymentInitiationRequest`], [`ProcessPaymentRequest`]: payment bodies
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: boundary error honoring [`ErrorFormat`]
//!
//! ## Submodules
//! - [`money`]: Money input type
//! - [`payment`]: Payment request bodies
//! - [`error`]: Boundary error mapping
//! - [`response`]: Response envelope and error codes

pub mod error;
pub mod money;
pub mod payment;
pub mod response;

// Re-export commonly used types at module root
pub use error::{ApiError, ApiResult, ErrorFormat, FailureBody};
pub use money::LenientDecimal;
pub use payment::{PaymentInitiationRequest, ProcessPaymentRequest};
pub use response::{ApiResponse, ErrorEnvelope, error_codes};
