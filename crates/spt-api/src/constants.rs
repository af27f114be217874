//! API routing constants.

/// Prefix of every versioned API route (e.g. `/api/v0`)
pub const API_PREFIX: &str = "/api/v0";

/// Extra request body allowance on top of the upload size limit, covering
/// multipart framing and the `action` field
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
