//! Input-simulation permission probe

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::ports::PermissionPort;
use crate::infrastructure::keystroke::{is_tool_available, EnigoKeySimulator, KeystrokeTool};

const MACOS_ACCESSIBILITY_LINK: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility";
const ENIGO_LINK: &str = "https://github.com/enigo-rs/enigo#runtime-dependencies";
const XDOTOOL_LINK: &str = "https://github.com/jordansissel/xdotool";
const WTYPE_LINK: &str = "https://github.com/atx/wtype";

/// Checks that the selected keystroke tool can actually inject keys.
///
/// On macOS creating an enigo handle triggers the accessibility check;
/// on Linux the external tools only need to be installed.
pub struct InputPermission {
    tool: KeystrokeTool,
}

impl InputPermission {
    pub fn new(tool: KeystrokeTool) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> KeystrokeTool {
        self.tool
    }

    async fn probe(&self) -> bool {
        match self.tool {
            KeystrokeTool::None => true,
            KeystrokeTool::Enigo => tokio::task::spawn_blocking(EnigoKeySimulator::probe)
                .await
                .unwrap_or(false),
            KeystrokeTool::Xdotool => is_tool_available("xdotool").await,
            KeystrokeTool::Wtype => is_tool_available("wtype").await,
        }
    }
}

#[async_trait]
impl PermissionPort for InputPermission {
    async fn is_granted(&self) -> bool {
        let granted = self.probe().await;
        debug!(tool = ?self.tool, granted, "input permission checked");
        granted
    }

    async fn request_prompt(&self) -> bool {
        info!(link = self.guidance_link(), "requesting permission to simulate key presses");
        self.probe().await
    }

    fn guidance_link(&self) -> &str {
        guidance_for(self.tool)
    }
}

fn guidance_for(tool: KeystrokeTool) -> &'static str {
    match tool {
        KeystrokeTool::Enigo | KeystrokeTool::None if cfg!(target_os = "macos") => {
            MACOS_ACCESSIBILITY_LINK
        }
        KeystrokeTool::Enigo | KeystrokeTool::None => ENIGO_LINK,
        KeystrokeTool::Xdotool => XDOTOOL_LINK,
        KeystrokeTool::Wtype => WTYPE_LINK,
    }
}
