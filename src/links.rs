use chrono::DateTime;
use chrono::Utc;

/// A stored mapping from a short code to a target URL
#[derive(Clone, Debug)]
pub struct Link {
    /// Short code identifying the link, immutable once created
    pub code: String,

    /// Target URL visitors are redirected to, immutable once created
    pub url: String,

    /// Number of completed redirects for this code
    pub click_count: i64,

    /// Moment of the last completed redirect, if any
    pub last_clicked: Option<DateTime<Utc>>,

    /// Creation date
    pub created_at: DateTime<Utc>,
}
