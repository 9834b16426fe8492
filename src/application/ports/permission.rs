//! Input-simulation permission port

use async_trait::async_trait;

/// Port for checking whether synthesized key events are allowed
#[async_trait]
pub trait PermissionPort: Send + Sync {
    async fn is_granted(&self) -> bool;

    /// Best-effort prompt. The result reflects the state right after the
    /// call, not after the user has acted on any dialog.
    async fn request_prompt(&self) -> bool;

    /// Where the user can grant the permission.
    fn guidance_link(&self) -> &str;
}
