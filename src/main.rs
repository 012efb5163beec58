use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spiffform::config::FormConfig;
use spiffform::element::{FormElement, Handle};
use spiffform::error::{ConfigError, FormError, SerializeError};
use spiffform::form::Form;
use spiffform::serializer::FormDocument;
use spiffform::surface::MemoryCanvas;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "spiffform", about = "Build, check and normalize form documents")]
struct Cli {
    /// Message catalog (`en` or `de`).
    #[arg(long, env = "SPIFFFORM_LOCALE")]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the demo feedback form as JSON.
    Demo,
    /// List the element palette.
    Palette,
    /// Load a document, validate every element and report failures.
    Check { path: PathBuf },
    /// Load a document and print it back in canonical form.
    Normalize { path: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let mut config = FormConfig::from_env()?;
    if let Some(locale) = cli.locale {
        config = FormConfig::from_parts(&locale, config.hint_dismiss_ms, config.drop_slop_px)?;
    }

    match cli.command {
        Command::Demo => run_demo(config),
        Command::Palette => run_palette(config),
        Command::Check { path } => run_check(config, &path),
        Command::Normalize { path } => run_normalize(config, &path),
    }
}

fn run_demo(config: FormConfig) -> Result<ExitCode, CliError> {
    let mut form = Form::with_config(Box::new(MemoryCanvas::new()), config)?;
    form.set_title("Feedback");
    form.set_subtitle("Tell us what went wrong.");

    let mut complaint = FormElement::new(Handle::DropdownList);
    complaint.set_label("Complaint type");
    complaint.add_option("");
    complaint.add_option("Customer service");
    complaint.select_option(Some(1));
    form.append(complaint)?;

    let mut birth_date = FormElement::new(Handle::DatePicker);
    birth_date.set_label("Birth Date");
    form.append(birth_date)?;

    form.append(FormElement::new(Handle::NameField))?;

    let mut summary = FormElement::new(Handle::EntryField);
    summary.set_label("Complaint summary");
    summary.set_text("Stop sending me emails");
    form.append(summary)?;

    let mut details = FormElement::new(Handle::TextArea);
    details.set_label("Irrelevant text");
    form.append(details)?;

    form.append(FormElement::new(Handle::Checkbox))?;

    println!("{}", form.serialize()?.to_json()?);
    Ok(ExitCode::SUCCESS)
}

fn run_palette(config: FormConfig) -> Result<ExitCode, CliError> {
    let form = Form::with_config(Box::new(MemoryCanvas::new()), config)?;
    for (handle, name) in form.registry().palette(form.translator()) {
        println!("{handle:<14} {name}");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_check(config: FormConfig, path: &Path) -> Result<ExitCode, CliError> {
    let mut form = load(config, path)?;
    if form.validate_all() {
        println!("{}: ok", path.display());
        return Ok(ExitCode::SUCCESS);
    }
    for element in form.prefix().iter().chain(form.elements()) {
        if let Some(message) = element.error() {
            println!("{}: {} ({}): {message}", path.display(), element.label(), element.handle());
        }
    }
    Ok(ExitCode::FAILURE)
}

fn run_normalize(config: FormConfig, path: &Path) -> Result<ExitCode, CliError> {
    let form = load(config, path)?;
    println!("{}", form.serialize()?.to_json()?);
    Ok(ExitCode::SUCCESS)
}

fn load(config: FormConfig, path: &Path) -> Result<Form, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })?;
    let document = FormDocument::from_json(&text)?;
    let mut form = Form::with_config(Box::new(MemoryCanvas::new()), config)?;
    form.deserialize(&document)?;
    Ok(form)
}
