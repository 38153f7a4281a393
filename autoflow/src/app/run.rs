//! Studio construction and the interactive simulation loop

use std::sync::Arc;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::app::options::AppOptions;
use crate::app::studio::Studio;
use crate::errors::FlowError;
use crate::genai::gemini::GeminiClient;
use crate::genai::offline::OfflineGenerator;
use crate::genai::Generator;
use crate::sim::session::{Sender, SimulationSession};
use crate::storage::blob::FileBlobStore;
use crate::storage::settings::GeneratorSettings;
use crate::storage::store::WorkspaceStore;

/// Input that restarts the simulation
pub const RESET_COMMAND: &str = "/reset";
/// Input that ends the simulation
pub const QUIT_COMMAND: &str = "/quit";

/// Gemini when a key is configured, otherwise the offline generator
pub fn build_generator(settings: &GeneratorSettings) -> Arc<dyn Generator> {
    match GeminiClient::new(settings) {
        Ok(client) => {
            info!("Using Gemini at {}", client.base_url());
            Arc::new(client)
        }
        Err(e) => {
            warn!("Generation capability unavailable, running offline: {}", e);
            Arc::new(OfflineGenerator)
        }
    }
}

/// Open the studio on the file-backed workspace of `options.layout`
pub async fn open_studio(options: &AppOptions) -> Studio {
    let blobs = Arc::new(FileBlobStore::new(options.layout.blobs_dir()));
    let store = WorkspaceStore::new(blobs);
    let generator = build_generator(&options.settings.generator);
    Studio::open(store, generator, options.simulation_options()).await
}

/// Drive a session from line-based input until EOF or `/quit`
pub async fn run_simulation<R, W>(session: &mut SimulationSession, input: R, output: &mut W) -> Result<(), FlowError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for message in session.transcript() {
        write_line(output, message.sender, &message.text).await?;
    }

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            QUIT_COMMAND => break,
            RESET_COMMAND => {
                session.reset();
                if let Some(greeting) = session.transcript().first() {
                    write_line(output, Sender::Bot, &greeting.text).await?;
                }
            }
            text => {
                let reply = session.send(text).await?;
                write_line(output, Sender::Bot, &reply).await?;
            }
        }
    }
    output.flush().await?;
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, sender: Sender, text: &str) -> Result<(), FlowError> {
    let label = match sender {
        Sender::Bot => "bot".cyan().bold(),
        Sender::User => "you".green().bold(),
    };
    output
        .write_all(format!("{}: {}\n", label, text).as_bytes())
        .await?;
    Ok(())
}
