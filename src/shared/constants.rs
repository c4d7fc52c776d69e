/// Minimum length for report comments, rejection reasons and deletion justifications
pub const MIN_TEXT_LENGTH: u64 = 10;

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "session";

/// Where anonymous callers are sent when a route needs a session
pub const LOGIN_PATH: &str = "/login";

/// Public URL prefix for uploaded report photos
pub const UPLOADS_URL_PREFIX: &str = "/static/uploads";

/// Photo extensions accepted on report submission (lowercase)
pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Filter value meaning "do not filter"
pub const FILTER_ALL: &str = "All";

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - triages reports, sees reporter emails
pub const ROLE_ADMIN: &str = "admin";

/// Citizen role - submits and browses reports
pub const ROLE_CITIZEN: &str = "citizen";
