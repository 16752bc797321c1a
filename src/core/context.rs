//! Request-scoped context passed explicitly into core operations.

use crate::config::Settings;
use std::sync::Arc;

/// Who is acting, and under which settings.
///
/// Built once per incoming command from the authenticated staff member and the
/// shared settings; never stored globally.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Employee performing the operation, recorded for audit
    pub employee_id: i64,
    /// Restaurant settings, including the tier table
    pub settings: Arc<Settings>,
}

impl RequestContext {
    /// Creates a context for one request.
    #[must_use]
    pub const fn new(employee_id: i64, settings: Arc<Settings>) -> Self {
        Self {
            employee_id,
            settings,
        }
    }
}
