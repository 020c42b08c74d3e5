#![allow(clippy::multiple_crate_versions)]

//! tmux-statusline
//!
//! Renders one side of a tmux statusline to stdout, with subcommands for
//! configuration management, theme selection and environment diagnostics.
//!
//! Wire it up in `.tmux.conf`:
//!
//! ```text
//! set -g status-left  "#(tmux-statusline left)"
//! set -g status-right "#(tmux-statusline right)"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use dialoguer::Confirm;
use tmux_statusline::{
    config::{AutoDetect, ConfigLoader, ConfigSourceType, CreateConfigOptions},
    core::{GeneratorOptions, StatuslineGenerator},
    segments::Side,
    terminal::TerminalDetector,
};
use toml_edit::{DocumentMut, Item, Table, Value as TomlEditValue};

#[derive(Parser, Debug)]
#[command(name = "tmux-statusline")]
#[command(author, version, about = "Themed segment statusline for tmux", long_about = None)]
struct Cli {
    /// Statusline side to render ("left" or "right")
    #[arg(value_name = "SIDE")]
    side: Option<String>,

    /// Use a custom config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Override the theme
    #[arg(short = 't', long = "theme")]
    theme: Option<String>,

    /// Override the segment preset (e.g., ULW)
    #[arg(short = 'p', long = "preset")]
    preset: Option<String>,

    /// Disable colored output
    #[arg(long = "no-colors", action = clap::ArgAction::SetTrue)]
    no_colors: bool,

    /// Disable emoji output
    #[arg(long = "no-emoji", action = clap::ArgAction::SetTrue)]
    no_emoji: bool,

    /// Disable Nerd Font icons
    #[arg(long = "no-icons", action = clap::ArgAction::SetTrue)]
    no_icons: bool,

    /// Force emoji output
    #[arg(long = "force-emoji", action = clap::ArgAction::SetTrue)]
    force_emoji: bool,

    /// Force Nerd Font icons
    #[arg(long = "force-nerd-font", action = clap::ArgAction::SetTrue)]
    force_nerd_font: bool,

    /// Force plain-text mode
    #[arg(long = "force-text", action = clap::ArgAction::SetTrue)]
    force_text: bool,

    /// Enable debug output on stderr
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    debug: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Config file management (init / set / reset / path view)
    Config(ConfigArgs),
    /// Theme management
    Theme(ThemeArgs),
    /// Validate a config file
    Validate { file: Option<String> },
    /// Environment diagnostics
    Doctor,
}

#[derive(ClapArgs, Debug, Default)]
struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    action: Option<ConfigAction>,

    /// Config file path to operate on
    #[arg(short, long)]
    file: Option<String>,

    /// Reset config to defaults
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    reset: bool,

    /// Operate on the user-level config
    #[arg(short = 'g', long = "global", action = clap::ArgAction::SetTrue)]
    global: bool,

    /// Show what would happen without writing files
    #[arg(short = 'n', long = "dry-run", action = clap::ArgAction::SetTrue)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Set a config key
    Set(ConfigSetArgs),
    /// Initialize a config file
    Init(ConfigInitArgs),
}

#[derive(ClapArgs, Debug)]
struct ConfigSetArgs {
    /// Config key to set (dotted paths, e.g. segments.weather.location)
    key: String,

    /// Modify the user-level config
    #[arg(short = 'g', long = "global", action = clap::ArgAction::SetTrue)]
    global: bool,

    /// Value to write (supports `key value` and `key = value` forms)
    #[arg(value_name = "VALUE", num_args = 1.., trailing_var_arg = true)]
    value_parts: Vec<String>,
}

#[derive(ClapArgs, Debug, Default)]
struct ConfigInitArgs {
    /// Project path (defaults to the current directory)
    #[arg(value_name = "PROJECT_PATH")]
    path: Option<String>,

    /// Generate the user-level config instead
    #[arg(short = 'g', long = "global", action = clap::ArgAction::SetTrue)]
    global: bool,

    /// Theme to write into the new config
    #[arg(short = 't', long = "theme")]
    theme: Option<String>,

    /// Skip the overwrite confirmation
    #[arg(short = 'y', long = "force", alias = "yes", action = clap::ArgAction::SetTrue)]
    force: bool,
}

#[derive(ClapArgs, Debug, Default)]
struct ThemeArgs {
    /// Theme name to apply (classic / powerline)
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Config(args)) => handle_config(args).await?,
        Some(Commands::Theme(args)) => handle_theme(args).await?,
        Some(Commands::Validate { file }) => handle_validate(file.as_deref()).await?,
        Some(Commands::Doctor) => handle_doctor().await?,
        None => handle_run(&cli).await?,
    }

    Ok(())
}

async fn handle_run(cli: &Cli) -> Result<()> {
    let side = cli
        .side
        .as_deref()
        .ok_or_else(|| anyhow!("missing side argument (usage: tmux-statusline <left|right>)"))?
        .parse::<Side>()
        .map_err(|err| anyhow!(err))?;

    let mut loader = ConfigLoader::new();
    let mut config = loader.load(cli.config.as_deref()).await?;

    if cli.debug {
        config.debug = true;
    }

    // CLI arguments take precedence over the config file
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if let Some(preset) = &cli.preset {
        config.preset = Some(preset.clone());
    }

    apply_runtime_overrides(cli, &mut config);

    if config.debug {
        if let Some(source) = loader.get_config_source() {
            eprintln!("[debug] config source: {:?}", source.source_type);
            if let Some(path) = &source.path {
                eprintln!("[debug] config path: {}", path.display());
            }
        }
        eprintln!("[debug] side: {side}");
    }

    let mut options = GeneratorOptions::new();
    if let Some(preset) = &cli.preset {
        options = options.with_preset(preset.clone());
    }

    let generator = StatuslineGenerator::new(config, options);
    let statusline = generator.generate(side).await?;
    println!("{statusline}");
    Ok(())
}

async fn handle_config(args: &ConfigArgs) -> Result<()> {
    let mut loader = ConfigLoader::new();

    if let Some(action) = &args.action {
        match action {
            ConfigAction::Set(set_args) => {
                handle_config_set(&loader, args, set_args)?;
                return Ok(());
            }
            ConfigAction::Init(init_args) => {
                handle_config_init(&loader, args, init_args)?;
                return Ok(());
            }
        }
    }

    if args.global {
        bail!("--global requires the `config set` or `config init` subcommand");
    }

    if args.reset {
        if args.dry_run {
            let target = if let Some(path) = args.file.as_deref() {
                PathBuf::from(path)
            } else {
                loader
                    .user_config_path()
                    .ok_or_else(|| anyhow!("cannot determine user config path"))?
            };
            println!("🔍 (dry-run) would reset config to defaults: {}", target.display());
        } else {
            let written = loader.reset_to_defaults(args.file.as_deref()).await?;
            println!("✅ config reset to defaults: {}", written.display());
        }
        return Ok(());
    }

    loader.load(args.file.as_deref()).await?;
    if let Some(source) = loader.get_config_source() {
        match source.source_type {
            ConfigSourceType::Default => println!("using built-in default config"),
            ConfigSourceType::User => {
                if let Some(path) = &source.path {
                    println!("user config: {}", path.display());
                }
            }
            ConfigSourceType::Project => {
                if let Some(path) = &source.path {
                    println!("project config: {}", path.display());
                }
            }
            ConfigSourceType::Custom => {
                if let Some(path) = &source.path {
                    println!("custom config: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn handle_config_init(
    loader: &ConfigLoader,
    parent_args: &ConfigArgs,
    init_args: &ConfigInitArgs,
) -> Result<()> {
    let target_path = if init_args.global {
        loader
            .user_config_path()
            .ok_or_else(|| anyhow!("cannot determine user config path"))?
    } else {
        let project_path = match init_args.path.as_deref() {
            Some(path) if !path.is_empty() => {
                let candidate = PathBuf::from(path);
                if candidate.is_absolute() {
                    candidate
                } else {
                    std::env::current_dir()
                        .context("cannot determine current working directory")?
                        .join(candidate)
                }
            }
            _ => std::env::current_dir().context("cannot determine current working directory")?,
        };

        if !project_path.exists() && !parent_args.dry_run {
            bail!("project path does not exist: {}", project_path.display());
        }

        ConfigLoader::project_config_path_for(&project_path)
    };

    if target_path.exists() && !init_args.force && !parent_args.dry_run {
        match Confirm::new()
            .with_prompt("config file already exists, overwrite?")
            .default(false)
            .interact_opt()
        {
            Ok(Some(true)) => {}
            Ok(Some(false)) | Ok(None) => {
                println!("aborted");
                return Ok(());
            }
            Err(err) => {
                eprintln!("cannot read confirmation: {err}");
                eprintln!("pass --force to overwrite without confirmation.");
                return Ok(());
            }
        }
    }

    if parent_args.dry_run {
        println!("🔍 (dry-run) would create config file: {}", target_path.display());
        if target_path.exists() {
            println!("  - existing file would be overwritten (--force/-y skips confirmation)");
        } else if let Some(parent) = target_path.parent() {
            println!("  - would create directory: {}", parent.display());
        }
        println!(
            "  - theme: {}",
            init_args.theme.as_deref().unwrap_or("template default")
        );
        if init_args.global {
            println!("  - scope: user-level config");
        } else {
            println!("  - scope: project-level config");
        }
        return Ok(());
    }

    let result = ConfigLoader::create_default_config(CreateConfigOptions {
        target_path: Some(target_path.as_path()),
        theme: init_args.theme.as_deref(),
        force: init_args.force || target_path.exists(),
    })?;
    println!("✅ created config file: {}", result.path.display());

    if init_args.global {
        println!("note: this config applies to all projects");
    } else {
        println!("note: this config only applies to the containing project");
    }

    Ok(())
}

fn handle_config_set(
    loader: &ConfigLoader,
    parent_args: &ConfigArgs,
    set_args: &ConfigSetArgs,
) -> Result<()> {
    let (key, value_expr) = normalize_assignment(&set_args.key, &set_args.value_parts)?;
    let path_keys = parse_path_keys(&key)?;

    let use_global = if parent_args.file.is_some() {
        false
    } else {
        set_args.global || parent_args.global
    };

    let target_path = if let Some(custom) = parent_args.file.as_deref() {
        PathBuf::from(custom)
    } else if use_global {
        loader
            .user_config_path()
            .ok_or_else(|| anyhow!("cannot determine user config path"))?
    } else {
        loader.project_config_path()?
    };

    let scope_label = if parent_args.file.is_some() {
        "custom path"
    } else if use_global {
        "user-level"
    } else {
        "project-level"
    };

    let parsed_value = parse_value_expression(&value_expr);

    if parent_args.dry_run {
        println!("🔍 (dry-run) would update config file: {}", target_path.display());
        if !target_path.exists() {
            println!("  - a new config file would be created from the template");
        }
        println!("  - scope: {scope_label}");
        println!("  - set {key} = {value_expr}");
        return Ok(());
    }

    let mut created = false;
    if !target_path.exists() {
        ConfigLoader::create_default_config(CreateConfigOptions {
            target_path: Some(target_path.as_path()),
            ..Default::default()
        })?;
        created = true;
    }

    let mut document = load_document(&target_path)?;
    set_document_value(&mut document, &path_keys, parsed_value)?;

    fs::write(&target_path, document.to_string())
        .with_context(|| format!("cannot write config file: {}", target_path.display()))?;

    if created {
        println!("🆕 created config file: {}", target_path.display());
    }
    println!("✅ updated config: {key} = {value_expr}");
    println!("📄 config file: {} ({})", target_path.display(), scope_label);

    Ok(())
}

async fn handle_theme(args: &ThemeArgs) -> Result<()> {
    let mut loader = ConfigLoader::new();

    match args.name.as_deref() {
        Some(name) => {
            let path = loader.apply_theme(name).await?;
            println!("✅ applied theme: {name} ({})", path.display());
        }
        None => {
            let config = loader.load(None).await?;
            println!("current theme: {}", config.theme);
            if let Some(source) = loader.get_config_source() {
                if let Some(path) = &source.path {
                    println!("config file: {}", path.display());
                }
            }
            println!("apply one with: tmux-statusline theme <classic|powerline>");
        }
    }

    Ok(())
}

async fn handle_validate(file: Option<&str>) -> Result<()> {
    let mut loader = ConfigLoader::new();
    loader.load(file).await?;
    if let Some(source) = loader.get_config_source() {
        println!(
            "✅ config valid: {}",
            source
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in defaults".to_string())
        );
    }
    Ok(())
}

async fn handle_doctor() -> Result<()> {
    let detector = TerminalDetector::new();
    let capabilities = detector.detect(
        &AutoDetect::default(),
        &AutoDetect::default(),
        &AutoDetect::default(),
        false,
        false,
        false,
    );

    println!("🔍 environment diagnostics");
    println!("operating system: {}", std::env::consts::OS);
    println!(
        "terminal: {}",
        std::env::var("TERM").unwrap_or_else(|_| "unknown".to_string())
    );
    println!(
        "inside tmux: {}",
        bool_icon(std::env::var_os("TMUX").is_some())
    );
    println!("color support: {:?}", capabilities.color_support);
    println!("emoji support: {}", bool_icon(capabilities.supports_emoji));
    println!(
        "nerd font support: {}",
        bool_icon(capabilities.supports_nerd_font)
    );
    println!(
        "weather api key: {}",
        bool_icon(std::env::var_os("WEATHER_API_KEY").is_some())
    );

    let mut loader = ConfigLoader::new();
    match loader.load(None).await {
        Ok(_) => println!("config status: ✅ valid"),
        Err(err) => println!("config status: ❌ invalid ({err})"),
    }

    Ok(())
}

fn apply_runtime_overrides(cli: &Cli, config: &mut tmux_statusline::config::Config) {
    if cli.no_colors {
        config.style.enable_colors = AutoDetect::Bool(false);
    }
    if cli.no_emoji {
        config.style.enable_emoji = AutoDetect::Bool(false);
        config.terminal.force_emoji = false;
    }
    if cli.no_icons {
        config.style.enable_nerd_font = AutoDetect::Bool(false);
        config.terminal.force_nerd_font = false;
    }

    if cli.force_emoji {
        config.terminal.force_emoji = true;
    }
    if cli.force_nerd_font {
        config.terminal.force_nerd_font = true;
    }
    if cli.force_text {
        config.terminal.force_text = true;
        config.terminal.force_emoji = false;
        config.terminal.force_nerd_font = false;
    }
}

fn bool_icon(value: bool) -> &'static str {
    if value {
        "✅"
    } else {
        "⚪"
    }
}

fn normalize_assignment(raw_key: &str, value_parts: &[String]) -> Result<(String, String)> {
    let mut key = raw_key.trim().to_string();

    if key.is_empty() {
        bail!("config key cannot be empty");
    }

    let mut parts: Vec<String> = value_parts
        .iter()
        .map(|part| part.trim().to_string())
        .collect();

    if parts.is_empty() {
        // `key=value` as a single argument
        if let Some((k, v)) = key.split_once('=') {
            let normalized_key = k.trim().to_string();
            let normalized_value = v.trim().to_string();

            if normalized_key.is_empty() {
                bail!("config key cannot be empty");
            }
            if normalized_value.is_empty() {
                bail!("a value is required, e.g.: tmux-statusline config set preset ULW");
            }

            return Ok((normalized_key, normalized_value));
        }
        bail!("a value is required, e.g.: tmux-statusline config set preset ULW");
    }

    if key.ends_with('=') {
        key = key.trim_end_matches('=').trim().to_string();
    }

    if key.is_empty() {
        bail!("config key cannot be empty");
    }

    if parts[0] == "=" {
        parts.remove(0);
    } else if let Some(stripped) = parts.first().and_then(|part| part.strip_prefix('=')) {
        parts[0] = stripped.trim().to_string();
    }

    let value = parts.join(" ").trim().to_string();
    if value.is_empty() {
        bail!("a value is required, e.g.: tmux-statusline config set preset ULW");
    }

    Ok((key, value))
}

fn parse_value_expression(expr: &str) -> TomlEditValue {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return TomlEditValue::from(trimmed);
    }

    if let Some(value) = try_parse_toml_value(trimmed) {
        return value;
    }

    TomlEditValue::from(trimmed)
}

fn try_parse_toml_value(expr: &str) -> Option<TomlEditValue> {
    let snippet = format!("__value__ = {expr}");
    let mut document = snippet.parse::<DocumentMut>().ok()?;
    document
        .as_table_mut()
        .remove("__value__")
        .and_then(|item| item.into_value().ok())
}

fn parse_path_keys(path: &str) -> Result<Vec<String>> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        bail!("config key cannot be empty");
    }
    if trimmed.contains('[') || trimmed.contains(']') {
        bail!("array indices are not supported in config keys");
    }

    let mut keys = Vec::new();
    for part in trimmed.split('.') {
        let part = part.trim();
        if part.is_empty() {
            bail!("config key segment cannot be empty");
        }
        keys.push(part.to_string());
    }

    Ok(keys)
}

fn set_document_value(
    document: &mut DocumentMut,
    keys: &[String],
    value: TomlEditValue,
) -> Result<()> {
    set_in_table(document.as_table_mut(), keys, value, String::new())
}

fn set_in_table(
    table: &mut Table,
    keys: &[String],
    value: TomlEditValue,
    current_path: String,
) -> Result<()> {
    let Some((key, rest)) = keys.split_first() else {
        bail!("config key cannot be empty");
    };

    let mut path = current_path;
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(key);

    if rest.is_empty() {
        table.insert(key, Item::Value(value));
        return Ok(());
    }

    if !table.contains_key(key) {
        let mut implicit = Table::new();
        implicit.set_implicit(true);
        table.insert(key, Item::Table(implicit));
    }

    let item = table
        .get_mut(key)
        .ok_or_else(|| anyhow!("internal error: cannot access path {path}"))?;

    let Some(child_table) = item.as_table_mut() else {
        bail!(r#"path "{path}" already exists and is not a table"#);
    };

    set_in_table(child_table, rest, value, path)
}

fn load_document(path: &Path) -> Result<DocumentMut> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file: {}", path.display()))?;
    content
        .parse::<DocumentMut>()
        .map_err(|err| anyhow!("config file is not valid TOML: {} ({err})", path.display()))
}
