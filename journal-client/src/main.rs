mod api;
mod shell;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use api::JournalApi;

#[derive(Parser)]
#[command(name = "journal-client", about = "Write to and read from a journal server")]
struct Cli {
    /// Base URL of the journal server
    #[arg(long, env = "JOURNAL_SERVER_URL", default_value = "http://localhost:5000")]
    server: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive journal: list notes, then write one note per line
    Shell,
    /// Print all notes, most recent first
    List,
    /// Add a single note
    Add {
        #[arg(required = true)]
        content: Vec<String>,
    },
    /// Print a summary of today's notes
    Summary,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let api = JournalApi::new(&cli.server);
    let mut stdout = std::io::stdout();

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            println!("Connected to journal server at {}", cli.server);
            println!("Type a note and press enter. /summary for today's summary, /quit to exit.\n");
            let input = BufReader::new(tokio::io::stdin());
            shell::run(&api, input, &mut stdout, &mut std::io::stderr()).await?;
        }
        Command::List => {
            let notes = api.list_notes().await?;
            shell::render_notes(&notes, &mut stdout)?;
        }
        Command::Add { content } => {
            let content = content.join(" ");
            let Some(content) = shell::submission(&content) else {
                eprintln!("Nothing to add: note is blank");
                return Ok(());
            };
            let created = api.create_note(content).await?;
            println!("Created note {}", created.id);
        }
        Command::Summary => {
            println!("{}", api.summarize_today().await?);
        }
    }

    Ok(())
}
