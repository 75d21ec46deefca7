/// Policy switches for the lifecycle services.
///
/// Loaded from environment variables by the server binary; tests construct
/// it directly.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Refuse to manually close a tender that has no bids (default: `true`).
    pub close_requires_bids: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            close_requires_bids: true,
        }
    }
}

impl LifecycleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `TENDER_CLOSE_REQUIRES_BIDS` | `true`  |
    pub fn from_env() -> Self {
        let close_requires_bids: bool = std::env::var("TENDER_CLOSE_REQUIRES_BIDS")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("TENDER_CLOSE_REQUIRES_BIDS must be 'true' or 'false'");

        Self {
            close_requires_bids,
        }
    }
}
