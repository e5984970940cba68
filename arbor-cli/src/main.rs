mod error;
mod render;
mod script;

use std::fs::File;
use std::path::{Path, PathBuf};

use arbor::prelude::*;
use clap::Parser;
use log::{debug, info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::error::CliError;
use crate::script::Step;

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Replay interactions against a JSON tree and print the visible rows")]
struct Cli {
    /// JSON file holding the array of root items
    data: PathBuf,

    /// JSON file with tree options (field names, action mapping, heights)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Comma separated steps: keys (`down`, `ctrl+space`), gestures
    /// (`click:ID`, `expanderClick:ID`) or moves (`move:ID:PARENT|-:INDEX`)
    #[arg(long, short, value_delimiter = ',')]
    input: Vec<String>,

    /// Hide nodes whose display text does not contain this string
    #[arg(long)]
    filter: Option<String>,

    /// Expand every node before running the steps
    #[arg(long)]
    expand_all: bool,

    /// Directory of `<id>.json` files served as lazily loaded children
    #[arg(long)]
    children_dir: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log: Option<PathBuf>,

    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(path) = &cli.log {
        let log_file = File::create(path)?;
        WriteLogger::init(cli.log_level, Config::default(), log_file)?;
    }

    let steps = script::parse(&cli.input)?;
    let roots: Vec<RawItem> = read_json(&cli.data).await?;
    let options = load_options(&cli).await?;
    let tree = Tree::from_data(roots, options);
    info!(
        "Loaded {} nodes from {}",
        tree.read(|model| model.node_count()),
        cli.data.display()
    );

    tree.resolve_pending_loads().await;
    if cli.expand_all {
        loop {
            tree.update(|model| model.expand_all());
            if tree.resolve_pending_loads().await == 0 {
                break;
            }
        }
    }
    if let Some(text) = &cli.filter {
        let matched = tree.update(|model| model.filter_nodes(text.as_str(), true));
        debug!("Filter {:?} matched {} nodes", text, matched);
    }

    for step in &steps {
        apply_step(&tree, step)?;
        tree.resolve_pending_loads().await;
        for event in tree.update(|model| model.drain_events()) {
            debug!("{}: {:?}", event.name(), event);
        }
    }

    let mut stdout = std::io::stdout().lock();
    tree.read(|model| render::render(model, &mut stdout))
}

async fn load_options(cli: &Cli) -> Result<TreeOptions, CliError> {
    let mut options = match &cli.options {
        Some(path) => {
            let json = read_file(path).await?;
            TreeOptions::from_json(&json)?
        }
        None => TreeOptions::default(),
    };
    if options.level_padding.is_none() {
        options = options.level_padding(2);
    }
    if let Some(dir) = cli.children_dir.clone() {
        options = options.get_children(move |node| {
            let path = dir.join(format!("{}.json", node.item_id()));
            ChildrenSource::pending(read_children(path))
        });
    }
    Ok(options)
}

async fn read_children(path: PathBuf) -> Result<Vec<RawItem>, LoadError> {
    debug!("Loading children from {}", path.display());
    let json = tokio::fs::read_to_string(&path).await?;
    Ok(serde_json::from_str(&json)?)
}

async fn read_file(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_json(path: &Path) -> Result<Vec<RawItem>, CliError> {
    let json = read_file(path).await?;
    serde_json::from_str(&json).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn lookup(model: &TreeModel, item_id: &str) -> Result<NodeId, CliError> {
    model
        .get_node_by_id(item_id)
        .ok_or_else(|| CliError::UnknownNode(item_id.to_string()))
}

fn apply_step(tree: &Tree, step: &Step) -> Result<(), CliError> {
    match step {
        Step::Key { code, modifiers } => {
            let target = tree.read(|model| {
                model
                    .focused_node()
                    .or_else(|| model.get_first_root(true))
            });
            let Some(target) = target else {
                warn!("Key {} ignored: tree has no visible rows", code);
                return Ok(());
            };
            let event = InputEvent {
                trigger: Trigger::Key(*code),
                modifiers: *modifiers,
            };
            tree.handle_input(target, &event, None);
        }
        Step::Mouse {
            gesture,
            target,
            modifiers,
        } => {
            let target = tree.read(|model| lookup(model, target))?;
            let event = InputEvent {
                trigger: Trigger::Mouse(*gesture),
                modifiers: *modifiers,
            };
            tree.handle_input(target, &event, None);
        }
        Step::Move {
            node,
            parent,
            index,
        } => {
            let (from, to) = tree.read(|model| -> Result<_, CliError> {
                let from = lookup(model, node)?;
                let to = match parent {
                    Some(parent) => DropTarget::child_of(lookup(model, parent)?, *index),
                    None => DropTarget::root(*index),
                };
                Ok((from, to))
            })?;
            let extra = ActionExtra::Move { from, to };
            let target = to.parent.unwrap_or(from);
            if !tree.handle_input(target, &InputEvent::mouse(MouseGesture::Drop), Some(&extra)) {
                warn!("Drop of {} was not handled", node);
            }
        }
    }
    Ok(())
}
