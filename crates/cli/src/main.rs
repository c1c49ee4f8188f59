use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use exporters::{ExportConfig, ExportFormat, Exporter};
use project::presets::{self, PresetKind};
use project::{ListField, PromptDb, PromptDocument, ScalarField};
use std::path::{Path, PathBuf};
use timeline::{format_clock, max_duration_at, remaining, total_duration, Adjustment, TimelineCommand, TOTAL_BUDGET};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "scene-composer")]
#[command(about = "Compose timed video-generation prompts and export them as YAML")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Prompt document to edit
    #[arg(short, long, global = true, default_value = "prompt.json")]
    file: PathBuf,

    /// Saved-prompt database (defaults to the app data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new prompt document
    New {
        /// Prompt name
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Print the timeline
    Show,

    /// Append a one-second sequence
    Add,

    /// Remove a sequence
    Remove {
        /// Sequence number (1-based)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        sequence: u32,
    },

    /// Set a sequence's duration in seconds
    Duration {
        /// Sequence number (1-based)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        sequence: u32,

        /// Requested duration; clamped to what fits
        #[arg(allow_hyphen_values = true)]
        seconds: i64,
    },

    /// Set a sequence's action description
    Action {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        sequence: u32,
        text: String,
    },

    /// Set a sequence's audio description
    Audio {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        sequence: u32,
        text: String,
    },

    /// Set a metadata field
    Meta {
        field: MetaField,

        /// New value
        #[arg(required_unless_present_any = ["preset", "list_presets"])]
        value: Option<String>,

        /// Fill the field from a named quick option
        #[arg(long, conflicts_with = "value")]
        preset: Option<String>,

        /// List the quick options for the field
        #[arg(long)]
        list_presets: bool,
    },

    /// Edit key elements
    Element {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Edit negative prompts
    Negative {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Edit element categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Export the prompt
    Export {
        /// Output format (yaml, json)
        #[arg(long, default_value = "yaml")]
        format: String,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save the document to the prompt store
    Save {
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List saved prompts
    List,

    /// Load a saved prompt into the document file
    Load { id: String },

    /// Overwrite a saved prompt with the document file
    Update { id: String },

    /// Delete a saved prompt
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum MetaField {
    Name,
    Style,
    Aspect,
    Environment,
    Camera,
}

impl MetaField {
    fn scalar(self) -> ScalarField {
        match self {
            MetaField::Name => ScalarField::PromptName,
            MetaField::Style => ScalarField::BaseStyle,
            MetaField::Aspect => ScalarField::AspectRatio,
            MetaField::Environment => ScalarField::RoomDescription,
            MetaField::Camera => ScalarField::CameraSetup,
        }
    }

    fn preset_kind(self) -> Option<PresetKind> {
        match self {
            MetaField::Name => None,
            MetaField::Style => Some(PresetKind::BaseStyle),
            MetaField::Aspect => Some(PresetKind::AspectRatio),
            MetaField::Environment => Some(PresetKind::Environment),
            MetaField::Camera => Some(PresetKind::Camera),
        }
    }
}

#[derive(Subcommand)]
enum ListAction {
    /// Append an entry
    Add { value: Option<String> },
    /// Replace entry N (1-based)
    Set { index: usize, value: String },
    /// Remove entry N (1-based)
    Remove { index: usize },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a category
    Add { name: String },
    /// Delete a category and its entries
    Remove { name: String },
    /// Append an entry to a category
    Push { name: String, value: Option<String> },
    /// Replace entry N (1-based) of a category
    Set {
        name: String,
        index: usize,
        value: String,
    },
    /// Remove entry N (1-based) of a category
    Drop { name: String, index: usize },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let file = cli.file.as_path();
    let db_path = cli.db.unwrap_or_else(project::default_db_path);

    match cli.command {
        Commands::New { name, force } => new_command(file, name, force),
        Commands::Show => show_command(file),
        Commands::Add => edit_timeline(file, TimelineCommand::Append),
        Commands::Remove { sequence } => edit_timeline(
            file,
            TimelineCommand::Remove {
                position: position(sequence),
            },
        ),
        Commands::Duration { sequence, seconds } => edit_timeline(
            file,
            TimelineCommand::SetDuration {
                position: position(sequence),
                duration: seconds,
            },
        ),
        Commands::Action { sequence, text } => edit_timeline(
            file,
            TimelineCommand::SetAction {
                position: position(sequence),
                text,
            },
        ),
        Commands::Audio { sequence, text } => edit_timeline(
            file,
            TimelineCommand::SetAudio {
                position: position(sequence),
                text,
            },
        ),
        Commands::Meta {
            field,
            value,
            preset,
            list_presets,
        } => meta_command(file, field, value, preset, list_presets),
        Commands::Element { action } => list_command(file, ListField::KeyElements, action),
        Commands::Negative { action } => list_command(file, ListField::NegativePrompts, action),
        Commands::Category { action } => category_command(file, action),
        Commands::Export { format, output } => export_command(file, &format, output),
        Commands::Save { name } => save_command(file, &db_path, name),
        Commands::List => list_saved_command(&db_path),
        Commands::Load { id } => load_command(file, &db_path, &id),
        Commands::Update { id } => update_command(file, &db_path, &id),
        Commands::Delete { id } => delete_command(&db_path, &id),
    }
}

fn position(sequence: u32) -> usize {
    sequence.saturating_sub(1) as usize
}

fn list_index(index: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .ok_or_else(|| anyhow!("entry numbers start at 1"))
}

fn read_document(path: &Path) -> Result<PromptDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading prompt document {}", path.display()))?;
    let doc = PromptDocument::from_json(&content)
        .with_context(|| format!("parsing prompt document {}", path.display()))?;
    Ok(doc)
}

fn write_document(path: &Path, doc: &PromptDocument) -> Result<()> {
    std::fs::write(path, doc.to_json()?)
        .with_context(|| format!("writing prompt document {}", path.display()))?;
    debug!("wrote {:?}", path);
    Ok(())
}

fn open_db(path: &Path) -> Result<PromptDb> {
    debug!("opening prompt store {:?}", path);
    PromptDb::open_or_create(path)
}

fn describe(adjustment: &Adjustment) -> String {
    match adjustment {
        Adjustment::Clamped {
            index,
            requested,
            applied,
        } => format!(
            "sequence {} set to {}s instead of {}s to fit the {}s timeline",
            index, applied, requested, TOTAL_BUDGET
        ),
        Adjustment::Shortened { indices } => format!(
            "shortened sequence(s) {:?} to stay within {}s",
            indices, TOTAL_BUDGET
        ),
        Adjustment::Truncated { dropped } => {
            format!("dropped {} trailing sequence(s) that no longer fit", dropped)
        }
        Adjustment::Rejected => "nothing changed".to_string(),
    }
}

fn new_command(file: &Path, name: Option<String>, force: bool) -> Result<()> {
    if file.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", file.display());
    }
    let mut doc = PromptDocument::default();
    if let Some(name) = name {
        doc.metadata.prompt_name = name;
    }
    write_document(file, &doc)?;
    info!("Created prompt document {:?}", file);
    Ok(())
}

fn show_command(file: &Path) -> Result<()> {
    let doc = read_document(file)?;
    let name = if doc.metadata.prompt_name.is_empty() {
        "(unnamed)"
    } else {
        doc.metadata.prompt_name.as_str()
    };
    println!("{} [{}]", name, doc.metadata.aspect_ratio);
    println!(
        "Used: {}s / {}s ({}s free)",
        total_duration(&doc.sequences),
        TOTAL_BUDGET,
        remaining(&doc.sequences)
    );
    for (i, seq) in doc.sequences.iter().enumerate() {
        let max = max_duration_at(&doc.sequences, i).max(1);
        println!(
            "  #{} {}  {}s (max {}s)",
            seq.index,
            seq.label(),
            seq.duration(),
            max
        );
        if !seq.action.is_empty() {
            println!("      action: {}", seq.action);
        }
        if !seq.audio.is_empty() {
            println!("      audio:  {}", seq.audio);
        }
    }
    Ok(())
}

fn edit_timeline(file: &Path, command: TimelineCommand) -> Result<()> {
    let mut doc = read_document(file)?;
    debug!("applying {:?}", command);
    let report = doc.apply(&command);
    for adjustment in &report {
        info!("{}", describe(adjustment));
    }
    write_document(file, &doc)?;
    info!(
        "Timeline: {} sequence(s), ends at {}",
        doc.sequences.len(),
        format_clock(total_duration(&doc.sequences))
    );
    Ok(())
}

fn meta_command(
    file: &Path,
    field: MetaField,
    value: Option<String>,
    preset: Option<String>,
    list_presets: bool,
) -> Result<()> {
    if list_presets {
        let kind = field
            .preset_kind()
            .ok_or_else(|| anyhow!("this field has no quick options"))?;
        for option in presets::presets_for(kind) {
            println!("{:<20} {}", option.name, option.value);
        }
        return Ok(());
    }

    let mut doc = read_document(file)?;
    match (preset, value) {
        (Some(preset), _) => {
            let kind = field
                .preset_kind()
                .ok_or_else(|| anyhow!("this field has no quick options"))?;
            if !doc.metadata.apply_preset(kind, &preset) {
                bail!("unknown preset '{}'", preset);
            }
            info!("Applied preset '{}'", preset);
        }
        (None, Some(value)) => doc.metadata.set_scalar(field.scalar(), value),
        (None, None) => bail!("a value or --preset is required"),
    }
    write_document(file, &doc)
}

fn list_command(file: &Path, field: ListField, action: ListAction) -> Result<()> {
    let mut doc = read_document(file)?;
    let meta = &mut doc.metadata;
    match action {
        ListAction::Add { value } => {
            meta.push_item(field);
            if let Some(value) = value {
                let last = meta.list_mut(field).len() - 1;
                meta.set_item(field, last, value);
            }
        }
        ListAction::Set { index, value } => {
            if !meta.set_item(field, list_index(index)?, value) {
                bail!("no entry {}", index);
            }
        }
        ListAction::Remove { index } => {
            if !meta.remove_item(field, list_index(index)?) {
                bail!("no entry {}", index);
            }
        }
    }
    write_document(file, &doc)
}

fn category_command(file: &Path, action: CategoryAction) -> Result<()> {
    let mut doc = read_document(file)?;
    let meta = &mut doc.metadata;
    match action {
        CategoryAction::Add { name } => match meta.add_category(&name) {
            Some(key) => info!("Added category '{}'", key),
            None => bail!("category name '{}' is empty or already in use", name),
        },
        CategoryAction::Remove { name } => {
            if !meta.remove_category(&name) {
                bail!("no category '{}'", name);
            }
        }
        CategoryAction::Push { name, value } => {
            let len = match meta.element_categories.get(name.as_str()) {
                Some(items) => items.len(),
                None => bail!("no category '{}'", name),
            };
            meta.push_category_item(&name);
            if let Some(value) = value {
                meta.set_category_item(&name, len, value);
            }
        }
        CategoryAction::Set { name, index, value } => {
            if !meta.set_category_item(&name, list_index(index)?, value) {
                bail!("no entry {} in category '{}'", index, name);
            }
        }
        CategoryAction::Drop { name, index } => {
            if !meta.remove_category_item(&name, list_index(index)?) {
                bail!("no entry {} in category '{}'", index, name);
            }
        }
    }
    write_document(file, &doc)
}

fn export_command(file: &Path, format: &str, output: Option<PathBuf>) -> Result<()> {
    let doc = read_document(file)?;
    let format: ExportFormat = format.parse()?;
    let exporter = Exporter::new(ExportConfig {
        format,
        output_path: output.clone(),
    });

    match exporter.export(&doc)? {
        Some(text) => print!("{}", text),
        None => info!("Exported to {:?}", output.unwrap_or_default()),
    }
    Ok(())
}

fn save_command(file: &Path, db_path: &Path, name: Option<String>) -> Result<()> {
    let doc = read_document(file)?;
    let db = open_db(db_path)?;
    let saved = db.save(&doc, name.as_deref())?;
    info!("Saved \"{}\"", saved.name);
    println!("{}", saved.id);
    Ok(())
}

fn list_saved_command(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    let prompts = db.list()?;
    if prompts.is_empty() {
        println!("No saved prompts.");
        return Ok(());
    }
    for prompt in prompts {
        println!(
            "{}  {:<30} {} sequence(s)  updated {}",
            prompt.id,
            prompt.name,
            prompt.sequences.len(),
            prompt.updated_at.format("%b %e, %Y %H:%M")
        );
    }
    Ok(())
}

fn load_command(file: &Path, db_path: &Path, id: &str) -> Result<()> {
    let db = open_db(db_path)?;
    let saved = db
        .get(id)?
        .ok_or_else(|| anyhow!("no saved prompt with id {}", id))?;
    let doc = PromptDocument::new(saved.metadata, saved.sequences)
        .with_context(|| format!("saved prompt \"{}\" has a broken timeline", saved.name))?;
    write_document(file, &doc)?;
    info!("Loaded \"{}\" into {:?}", saved.name, file);
    Ok(())
}

fn update_command(file: &Path, db_path: &Path, id: &str) -> Result<()> {
    let doc = read_document(file)?;
    let db = open_db(db_path)?;
    match db.update(id, &doc)? {
        Some(saved) => info!("Updated \"{}\"", saved.name),
        None => bail!("no saved prompt with id {}", id),
    }
    Ok(())
}

fn delete_command(db_path: &Path, id: &str) -> Result<()> {
    let db = open_db(db_path)?;
    if !db.delete(id)? {
        bail!("no saved prompt with id {}", id);
    }
    info!("Deleted {}", id);
    Ok(())
}
