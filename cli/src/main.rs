use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use snapdraw::config::{ConfigError, EditorConfig};
use snapdraw::persist::{LoadError, SaveError};
use snapdraw::route::connector_path;
use snapdraw::{Drawing, Editor, Endpoint, NoRedraw, Shape, ShapeId};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("failed to load drawing: {0}")]
    Load(#[from] LoadError),
    #[error("failed to save drawing: {0}")]
    Save(#[from] SaveError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("no shape with id {0}")]
    UnknownShape(ShapeId),
    #[error("shape {0} is not a connector")]
    NotAConnector(ShapeId),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "snapdraw", about = "Inspect and edit snapdraw drawing files")]
struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List shapes with their bounds and connections.
    Info(FileArgs),
    /// Print the rendered path of a connector.
    Route(ShapeArgs),
    /// Move a shape, carrying attached connectors along.
    Move(MoveArgs),
    /// Delete a shape, detaching connectors that pointed at it.
    Delete(ShapeArgs),
    /// Re-derive every connector endpoint from its target.
    Rebuild(FileArgs),
}

#[derive(Args, Debug)]
struct FileArgs {
    file: PathBuf,
}

#[derive(Args, Debug)]
struct ShapeArgs {
    file: PathBuf,
    id: ShapeId,
}

#[derive(Args, Debug)]
struct MoveArgs {
    file: PathBuf,
    id: ShapeId,
    #[arg(allow_negative_numbers = true)]
    dx: f64,
    #[arg(allow_negative_numbers = true)]
    dy: f64,
    /// Write the result here instead of overwriting the input.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Info(args) => run_info(&args.file, cli.json),
        Command::Route(args) => run_route(&args, cli.json),
        Command::Move(args) => run_move(&args),
        Command::Delete(args) => run_delete(&args),
        Command::Rebuild(args) => run_rebuild(&args.file),
    }
}

fn run_info(path: &Path, as_json: bool) -> Result<(), CliError> {
    let drawing = read_drawing(path)?;
    if as_json {
        let shapes: Vec<Value> = drawing.iter().map(shape_summary).collect();
        return print_json(&json!({ "next_id": drawing.next_id(), "shapes": shapes }));
    }

    println!("{} shapes, next id {}", drawing.len(), drawing.next_id());
    for shape in drawing.iter() {
        let b = shape.bounding_box();
        let mut line = format!(
            "{:>4}  {:<12} ({}, {}) .. ({}, {})",
            shape.id,
            format!("{:?}", shape.shape_type()),
            b.min_x,
            b.min_y,
            b.max_x,
            b.max_y
        );
        if let Some(links) = shape.links() {
            for conn in links.iter() {
                line.push_str(&format!("  {:?}->{}", conn.endpoint, conn.target_id));
            }
        }
        if let Some(label) = &shape.label {
            line.push_str(&format!("  \"{label}\""));
        }
        println!("{line}");
    }
    Ok(())
}

fn run_route(args: &ShapeArgs, as_json: bool) -> Result<(), CliError> {
    let drawing = read_drawing(&args.file)?;
    let shape = drawing.get(args.id).ok_or(CliError::UnknownShape(args.id))?;
    let connector = shape.connector().ok_or(CliError::NotAConnector(args.id))?;
    let path = connector_path(connector);

    if as_json {
        let points: Vec<[f64; 2]> = path.iter().map(|p| [p.x, p.y]).collect();
        return print_json(&json!({ "id": args.id, "path": points }));
    }
    for p in path {
        println!("{} {}", p.x, p.y);
    }
    Ok(())
}

fn run_move(args: &MoveArgs) -> Result<(), CliError> {
    let mut editor = open_editor(&args.file)?;
    if !editor.drawing().contains(args.id) {
        return Err(CliError::UnknownShape(args.id));
    }
    let touched = editor.move_shape(args.id, args.dx, args.dy);
    info!(id = args.id, touched = touched.len(), "shape moved");
    write_drawing(args.output.as_deref().unwrap_or(&args.file), editor.drawing())
}

fn run_delete(args: &ShapeArgs) -> Result<(), CliError> {
    let mut editor = open_editor(&args.file)?;
    if !editor.delete_shape(args.id) {
        return Err(CliError::UnknownShape(args.id));
    }
    write_drawing(&args.file, editor.drawing())
}

fn run_rebuild(path: &Path) -> Result<(), CliError> {
    // Loading already rebuilds; writing back persists the re-derived endpoints.
    let drawing = read_drawing(path)?;
    write_drawing(path, &drawing)
}

fn open_editor(path: &Path) -> Result<Editor<NoRedraw>, CliError> {
    let mut editor = Editor::new(EditorConfig::from_env()?, NoRedraw);
    editor.load_json(&read_file(path)?)?;
    Ok(editor)
}

fn read_drawing(path: &Path) -> Result<Drawing, CliError> {
    Ok(Drawing::from_json(&read_file(path)?)?)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn write_drawing(path: &Path, drawing: &Drawing) -> Result<(), CliError> {
    let json = drawing.to_json()?;
    fs::write(path, json).map_err(|source| CliError::Write { path: path.to_path_buf(), source })?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn shape_summary(shape: &Shape) -> Value {
    let b = shape.bounding_box();
    let connections: Vec<Value> = shape
        .links()
        .map(|links| {
            links
                .iter()
                .map(|c| {
                    let endpoint = match c.endpoint {
                        Endpoint::Start => "start",
                        Endpoint::End => "end",
                    };
                    json!({ "endpoint": endpoint, "target_id": c.target_id })
                })
                .collect()
        })
        .unwrap_or_default();
    json!({
        "id": shape.id,
        "shape_type": shape.shape_type(),
        "bounds": [b.min_x, b.min_y, b.max_x, b.max_y],
        "connections": connections,
        "label": shape.label,
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
