use clap::Parser;
use color_eyre::Result;
use bdg_tui::{Config, Database, Profile, cli::{Cli, Commands}};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    // Load configuration with the determined profile
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_with_profile(profile)?,
    };

    // Initialize database
    let db_path = config.get_database_path();
    let db = Database::new(
        db_path.to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?
    )?;

    // Dispatch to appropriate command handler
    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = bdg_tui::tui::App::new(config, db)?;
            bdg_tui::tui::run_event_loop(app)?;
        }
        Commands::AddContact { name, month, day, year, notes } => {
            bdg_tui::cli::handle_add_contact(name, month, day, year, notes, &db)?;
        }
        Commands::AddGift { contact, idea, budget, notes, recurring } => {
            bdg_tui::cli::handle_add_gift(contact, idea, budget, notes, recurring, &db)?;
        }
        Commands::Upcoming { days } => {
            bdg_tui::cli::handle_upcoming(days, &db)?;
        }
        Commands::Export => {
            bdg_tui::cli::handle_export(&db)?;
        }
    }

    Ok(())
}
