use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use onboard_core::{OnboardConfig, OutputFormat};
use onboard_scan::ScanOptions;

const CONFIG_FILE: &str = ".onboard.toml";

#[derive(Parser)]
#[command(
    name = "onboard",
    version,
    about = "Architecture overview for TypeScript/JavaScript workspaces",
    long_about = "Onboard scans a TypeScript/JavaScript workspace and reports its architecture:\n\
                   source files with their imports and exports, modules under src/, entrypoints,\n\
                   languages present and the package manifest.\n\n\
                   Examples:\n  \
                     onboard scan --path .                Scan the current workspace\n  \
                     onboard scan --format json           Machine-readable summary\n  \
                     onboard ai-scan --path .             Ask an LLM for an onboarding summary\n  \
                     onboard mcp --path .                 Serve both tools over MCP"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .onboard.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tree (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a workspace and print its architecture summary
    #[command(long_about = "Scan a workspace and print its architecture summary.\n\n\
        Walks the workspace (skipping node_modules, dist and .git), parses every\n\
        TypeScript/JavaScript source file with tree-sitter and reports imports,\n\
        exports, modules, entrypoints and languages. Honors tsconfig.json when present.\n\n\
        Examples:\n  onboard scan\n  onboard scan --path ../service --format markdown")]
    Scan {
        /// Workspace path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Scan a workspace and generate an AI onboarding summary
    #[command(
        long_about = "Scan a workspace and generate an AI onboarding summary.\n\n\
        Sends a compact digest of the scan to an OpenRouter-compatible chat endpoint.\n\
        Without an API key (OPENROUTER_API_KEY or [llm] api_key) a short offline\n\
        overview is printed instead, together with the reason.\n\n\
        Examples:\n  onboard ai-scan\n  onboard ai-scan --model openai/gpt-4o-mini --max-tokens 900"
    )]
    AiScan {
        /// Workspace path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Model identifier (overrides config and OPENROUTER_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Token budget for the completion (default: 600)
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// Start the MCP server for IDE integration
    #[command(
        long_about = "Start the MCP (Model Context Protocol) server for IDE integration.\n\n\
        Exposes scan_workspace and summarize_architecture over stdio for use by\n\
        AI coding agents and IDE extensions. Tool paths are confined to --path.\n\n\
        Example:\n  onboard mcp --path /my/project"
    )]
    Mcp {
        /// Workspace path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Create a default .onboard.toml configuration file
    #[command(long_about = "Create a default .onboard.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .onboard.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1monboard\x1b[0m v{version}: find your way around a TypeScript/JavaScript workspace\n");

        println!("Quick start:");
        println!("  \x1b[36monboard scan\x1b[0m              Summarize the current workspace");
        println!("  \x1b[36monboard ai-scan\x1b[0m           Ask an LLM for an onboarding summary");
        println!("  \x1b[36monboard init\x1b[0m              Create a .onboard.toml config file\n");

        println!("All commands:");
        println!("  \x1b[32mscan\x1b[0m      Files, imports, exports, modules and entrypoints");
        println!("  \x1b[32mai-scan\x1b[0m   AI architecture summary with offline fallback");
        println!("  \x1b[32mmcp\x1b[0m       Start MCP server for IDE integration");
        println!("  \x1b[32minit\x1b[0m      Create default configuration\n");
    } else {
        println!("onboard v{version}: find your way around a TypeScript/JavaScript workspace\n");

        println!("Quick start:");
        println!("  onboard scan              Summarize the current workspace");
        println!("  onboard ai-scan           Ask an LLM for an onboarding summary");
        println!("  onboard init              Create a .onboard.toml config file\n");

        println!("All commands:");
        println!("  scan      Files, imports, exports, modules and entrypoints");
        println!("  ai-scan   AI architecture summary with offline fallback");
        println!("  mcp       Start MCP server for IDE integration");
        println!("  init      Create default configuration\n");
    }

    println!("Run 'onboard <command> --help' for details.");
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("onboard=debug,onboard_scan=debug,onboard_summarize=debug,onboard_mcp=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<OnboardConfig> {
    let mut config = match explicit {
        Some(path) => OnboardConfig::from_file(path)?,
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                tracing::debug!(path = CONFIG_FILE, "loading configuration");
                OnboardConfig::from_file(default_path)?
            } else {
                OnboardConfig::default()
            }
        }
    };
    config.llm.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

async fn scan(path: &Path, options: ScanOptions) -> Result<onboard_core::ArchitectureSummary> {
    let root = path.to_path_buf();
    let summary =
        tokio::task::spawn_blocking(move || onboard_scan::scan_workspace_with(&root, &options))
            .await
            .into_diagnostic()??;
    Ok(summary)
}

const DEFAULT_CONFIG: &str = r#"# Onboard configuration

[llm]
# provider = "openrouter"
# model = "anthropic/claude-3-opus:latest"
# api_key = "sk-or-..."        # prefer OPENROUTER_API_KEY
# base_url = "https://openrouter.ai/api/v1"
# max_tokens = 600
# temperature = 0.2
# system_prompt = "You are a senior engineer onboarding a new teammate."

[scan]
# Names skipped during the walk, on top of node_modules, dist and .git
# exclude = ["coverage", "build"]
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        if !config.scan.exclude.is_empty() {
            eprintln!("Extra exclusions: {}", config.scan.exclude.join(", "));
        }
    }

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Scan { ref path }) => {
            let summary = scan(path, ScanOptions::from(&config.scan)).await?;
            let output = onboard_scan::render(&summary, cli.format)?;
            print!("{output}");
        }
        Some(Command::AiScan {
            ref path,
            ref model,
            max_tokens,
        }) => {
            let summary = scan(path, ScanOptions::from(&config.scan)).await?;

            let mut llm = config.llm.clone();
            if let Some(model) = model {
                llm.model = model.clone();
            }
            if let Some(max_tokens) = max_tokens {
                llm.max_tokens = Some(max_tokens);
            }

            let spinner = if std::io::stderr().is_terminal() && llm.wants_remote() {
                let pb = indicatif::ProgressBar::new_spinner();
                if let Ok(style) =
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                {
                    pb.set_style(style);
                }
                pb.set_message("Generating architecture summary...");
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let result = onboard_summarize::summarize_architecture(&summary, &llm).await;

            if let Some(pb) = spinner {
                if result.is_fallback() {
                    pb.finish_with_message("Fell back to offline overview");
                } else {
                    pb.finish_with_message("Done");
                }
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&result).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    println!("# Architecture summary\n");
                    println!("{}\n", result.summary);
                    match (&result.model, &result.reason) {
                        (Some(model), _) => println!("_Generated by `{model}` via {}._", result.provider),
                        (None, Some(reason)) => println!("_Offline overview: {reason}._"),
                        (None, None) => {}
                    }
                }
                OutputFormat::Text => {
                    if let Some(reason) = &result.reason {
                        eprintln!("note: {reason}");
                    }
                    println!("{}", result.summary);
                }
            }
        }
        Some(Command::Mcp { ref path }) => {
            onboard_mcp::server::run_server(path.clone(), config).await?;
        }
        Some(Command::Init) => {
            let path = Path::new(CONFIG_FILE);
            if path.exists() {
                miette::bail!(miette::miette!(
                    help = "Edit the existing file or remove it first",
                    "{CONFIG_FILE} already exists"
                ));
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created {CONFIG_FILE} with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "onboard", &mut std::io::stdout());
        }
    }

    Ok(())
}
