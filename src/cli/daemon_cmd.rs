//! Client commands - send requests to a running daemon via IPC

use super::args::{Commands, DaemonAction};
use super::ipc::{create_ipc_client, EntrySummary, IpcClient, IpcRequest};
use super::presenter::Presenter;

/// Handle `pasteback daemon <action>`
pub async fn handle_daemon_command(
    action: DaemonAction,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = create_ipc_client();

    let request = match action {
        DaemonAction::Status => IpcRequest::Status,
        DaemonAction::Toggle => IpcRequest::Toggle,
        DaemonAction::Dismiss => IpcRequest::Dismiss,
    };

    let response = send(client.as_ref(), &request).await?;

    match action {
        DaemonAction::Status => presenter.daemon_status(&response),
        _ => presenter.info(&format!("Command sent: {}", request)),
    }

    Ok(())
}

/// Handle the history commands (`list`, `paste`, `delete`, `clear`)
pub async fn handle_history_command(command: Commands, presenter: &Presenter) -> Result<(), String> {
    let client = create_ipc_client();

    match command {
        Commands::List { json } => {
            let response = send(client.as_ref(), &IpcRequest::List).await?;
            if json {
                presenter.output(&response);
            } else {
                let entries: Vec<EntrySummary> = serde_json::from_str(&response)
                    .map_err(|e| format!("Unexpected reply from daemon: {}", e))?;
                presenter.entries(&entries);
            }
        }
        Commands::Paste { index } => {
            send(client.as_ref(), &IpcRequest::Paste(index)).await?;
            presenter.success(&format!("Pasting entry {}", index));
        }
        Commands::Delete { id } => {
            let id = id
                .parse()
                .map_err(|_| format!("Invalid entry id: {}", id))?;
            send(client.as_ref(), &IpcRequest::Delete(id)).await?;
            presenter.success("Entry deleted");
        }
        Commands::Clear => {
            send(client.as_ref(), &IpcRequest::Clear).await?;
            presenter.success("History cleared");
        }
        Commands::Config { .. } | Commands::Daemon { .. } => {}
    }

    Ok(())
}

/// Send one request and unwrap an `error:` reply into `Err`
async fn send(client: &dyn IpcClient, request: &IpcRequest) -> Result<String, String> {
    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: pasteback daemon".to_string());
    }

    let response = client
        .send(request)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    let response = response.trim();
    if let Some(message) = response.strip_prefix("error:") {
        return Err(message.trim().to_string());
    }

    Ok(response.to_string())
}
