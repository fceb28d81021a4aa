//! Interactive shell for the ticket server.
//!
//! # Usage
//!
//! ```bash
//! TICKET_SERVER_URL=http://localhost:8080 cargo run --bin ticket-shell
//! ```

use std::io::Write;
use ticket_reservation_client::{DEFAULT_SERVER_URL, Flow, TicketClient, shell};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_url =
        std::env::var("TICKET_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let client = TicketClient::new(base_url)?;
    tracing::info!(server = client.base_url(), "Ticket shell started");

    let mut stdout = std::io::stdout();
    writeln!(
        stdout,
        "Connected to {}. Enter a command or type 'help' for a list of commands",
        client.base_url()
    )?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, ">> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let flow = match shell::parse(&line) {
            Ok(command) => shell::execute(&client, command, &mut stdout).await?,
            Err(error) => {
                writeln!(stdout, "{error}")?;
                Flow::Continue
            }
        };
        if flow == Flow::Exit {
            break;
        }
    }

    Ok(())
}
