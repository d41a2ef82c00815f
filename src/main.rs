mod api;
mod config;
mod controller;
mod decode;
mod diag;
mod error;
mod format;
mod profile;
mod tui;
mod ui;
mod voice;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use api::ApiClient;
use config::{ConfigFile, ResolvedConfig};
use controller::{Action, ChatController, Delivery};
use decode::Role;
use format::{Block, SectionLine};
use profile::SessionStore;
use ui::{ANSI_BOLD, ANSI_DIM, ANSI_RESET, ansi_fg};

#[derive(Parser, Debug)]
#[command(
    name = "mediassist",
    about = "Terminal chat client for the MediAssist medical-assistant service",
    long_about = None,
)]
struct Args {
    /// Question to send directly (omit to enter the interactive TUI)
    question: Option<String>,

    /// Profile to use from config file
    #[arg(short, long, env = "MEDIASSIST_PROFILE")]
    profile: Option<String>,

    /// Override backend base URL
    #[arg(long, env = "MEDIASSIST_BASE_URL")]
    base_url: Option<String>,

    /// Write a default config file to ~/.config/mediassist/config.toml and exit
    #[arg(long)]
    init: bool,

    /// List available profiles and exit
    #[arg(long)]
    profiles: bool,

    /// Forget the cached session profile and exit
    #[arg(long)]
    logout: bool,

    /// Generate shell completions and print to stdout (bash, zsh, fish, elvish)
    #[arg(long, value_name = "SHELL")]
    completions: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ── --init ────────────────────────────────────────────────────────────────
    if args.init {
        let path = ConfigFile::write_default_if_missing()?;
        println!("Config written to: {}", path.display());
        println!("Edit it, then run: mediassist");
        return Ok(());
    }

    // ── --completions ─────────────────────────────────────────────────────────
    if let Some(shell_name) = &args.completions {
        return generate_completions(shell_name);
    }

    // ── --logout ──────────────────────────────────────────────────────────────
    if args.logout {
        SessionStore::open_default().clear()?;
        println!("Sesión cerrada.");
        return Ok(());
    }

    let file = ConfigFile::load()?;

    // ── --profiles ────────────────────────────────────────────────────────────
    if args.profiles {
        print_profiles(&file);
        return Ok(());
    }

    let resolved = ResolvedConfig::resolve(&file, args.profile.as_deref(), args.base_url.as_deref());
    let store = SessionStore::open_default();
    let user = store.load();

    // ── One-shot mode (plain stdout, no TUI) ──────────────────────────────────
    if let Some(question) = args.question {
        return ask_once(question, resolved, user).await;
    }

    // ── Interactive TUI mode ──────────────────────────────────────────────────
    tui::run(resolved, store, user).await
}

// ── One-shot mode ─────────────────────────────────────────────────────────────

/// Send a single question with the cached profile and print the formatted
/// reply. Creates a fresh conversation so the exchange shows up in the TUI's
/// history afterwards.
async fn ask_once(
    question: String,
    resolved: ResolvedConfig,
    user: Option<profile::SessionProfile>,
) -> Result<()> {
    let Some(user) = user else {
        eprintln!("No hay sesión guardada. Ejecuta `mediassist` e inicia sesión primero.");
        std::process::exit(1);
    };

    println!();
    println!("  ⚕ mediassist  {}  ·  {}", resolved.profile_name, resolved.base_url);
    println!();

    let api = ApiClient::new(resolved.base_url.clone());
    let mut ctrl = ChatController::new(api, user, false);

    let (feedback_tx, _feedback_rx) = tokio::sync::mpsc::unbounded_channel();
    let (updates_tx, mut updates_rx) = tokio::sync::mpsc::unbounded_channel();
    let feedback = feedback_tx.downgrade();
    ctrl.handle(Action::Send(question), &feedback, &updates_tx).await;

    // Surface any alert (e.g. conversation creation failure) on stderr.
    while let Ok(update) = updates_rx.try_recv() {
        if let controller::Update::Alert(msg) = update {
            eprintln!("  ✗ {msg}");
        }
    }

    for entry in ctrl.transcript() {
        match entry.message.role {
            Role::User => {
                println!("  {ANSI_BOLD}tú{ANSI_RESET}  {}", entry.message.content);
                println!();
            }
            Role::Assistant if entry.delivery == Delivery::Failed => {
                println!("  ✗ {}", entry.message.content);
            }
            Role::Assistant => print_reply(&entry.message.content),
        }
    }

    Ok(())
}

/// Render formatter blocks with ANSI styling — same block contract the TUI
/// renders, minus the widgets.
fn print_reply(content: &str) {
    for block in format::format_reply(content) {
        match block {
            Block::Section(section) => {
                let fg = ansi_fg(section.color);
                println!("  {} {fg}{ANSI_BOLD}{}{ANSI_RESET}", section.icon, section.title);
                for line in &section.lines {
                    match line {
                        SectionLine::Bullet(text) => {
                            println!("     {fg}•{ANSI_RESET} {text}");
                        }
                        SectionLine::Text(text) => println!("     {text}"),
                    }
                }
                println!();
            }
            Block::Divider => println!("  {ANSI_DIM}────────────────────────────{ANSI_RESET}"),
            Block::Paragraph(text) => {
                let fg = ansi_fg(format::DEFAULT_COLOR);
                println!("  {fg}▌{ANSI_RESET} {text}");
            }
        }
    }
}

// ── Profiles listing (non-TUI) ────────────────────────────────────────────────

fn print_profiles(file: &ConfigFile) {
    let mut entries: Vec<(String, String, String)> = file
        .profiles
        .iter()
        .map(|(name, p)| (name.clone(), p.base_url.clone(), p.language.clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    println!();
    println!("  Profiles");
    for (name, base_url, language) in &entries {
        let marker = if *name == file.default_profile { " ←" } else { "" };
        println!("  {name}{marker}");
        println!("    base_url  {base_url}");
        println!("    language  {language}");
        println!();
    }
}

// ── Shell completions ─────────────────────────────────────────────────────────

fn generate_completions(shell_name: &str) -> Result<()> {
    use clap_complete::{Shell, generate};

    let shell: Shell = match shell_name.to_lowercase().as_str() {
        "bash"    => Shell::Bash,
        "zsh"     => Shell::Zsh,
        "fish"    => Shell::Fish,
        "elvish"  => Shell::Elvish,
        _ => {
            eprintln!("Unknown shell: {shell_name}");
            eprintln!("Supported: bash, zsh, fish, elvish");
            std::process::exit(1);
        }
    };

    let mut cmd = Args::command();
    generate(shell, &mut cmd, "mediassist", &mut std::io::stdout());
    Ok(())
}
