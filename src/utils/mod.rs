/// Check if the current environment has the external tools the fallback
/// caption path relies on.
pub async fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available("yt-dlp").await {
        missing.push(
            "yt-dlp - required for the fallback caption path (primary scraping still works)"
                .to_string(),
        );
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nonexistent_command_is_reported_unavailable() {
        assert!(!check_command_available("definitely-not-a-real-binary-xyz").await);
    }
}
