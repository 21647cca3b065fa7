//! Swagger 2.0 to OpenAPI 3.0 conversion
//!
//! Documentation renderers consume OpenAPI 3.x, while plenty of services
//! still publish Swagger 2.0. This crate rewrites the legacy dialect's
//! host/parameter/response/reference conventions into their 3.0
//! equivalents. Already-3.x documents pass through untouched, so the
//! conversion is safe to run unconditionally.

mod swagger;

pub use swagger::{convert_to_openapi3, is_swagger2, rewrite_refs};
