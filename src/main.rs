use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use intake_engine::{Advance, Flow, SubmissionStatus, Wizard, WizardError, local_progress, resolve};
use intake_state::DomainState;
use intake_store::{ApplicationStore, FsApplicationStore};

const DEFAULT_FLOW: &str = include_str!("../flows/incubator.json");

/// Intake - A configuration-driven application wizard
#[derive(Parser)]
#[command(name = "intake")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.intake)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Path to a flow file (default: the built-in incubator flow)
  #[arg(long, global = true)]
  flow: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate a flow and list its steps per section
  Check,

  /// Show the active steps for a state snapshot
  Outline {
    /// JSON file holding the domain state (default: empty)
    #[arg(long)]
    state: Option<PathBuf>,
  },

  /// Walk through the wizard with line commands on stdin
  Walk {
    /// Applicant whose application is loaded and saved
    #[arg(long)]
    user: String,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("intake=info,intake_engine=info,intake_store=info")),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();

  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".intake"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  match cli.command {
    Some(Commands::Check) => rt.block_on(check(cli.flow.as_deref())),
    Some(Commands::Outline { state }) => rt.block_on(outline(cli.flow.as_deref(), state.as_deref())),
    Some(Commands::Walk { user }) => rt.block_on(walk(cli.flow.as_deref(), &data_dir, user)),
    None => {
      println!("intake - use --help to see available commands");
      Ok(())
    }
  }
}

async fn load_flow(flow_file: Option<&Path>) -> Result<Flow> {
  let flow = match flow_file {
    Some(path) => {
      let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read flow file: {}", path.display()))?;
      Flow::from_json_str(&content)
        .with_context(|| format!("invalid flow file: {}", path.display()))?
    }
    None => Flow::from_json_str(DEFAULT_FLOW).context("invalid built-in flow")?,
  };

  info!(
    flow_id = %flow.flow_id(),
    steps = flow.steps().len(),
    "loaded flow"
  );
  Ok(flow)
}

async fn check(flow_file: Option<&Path>) -> Result<()> {
  let flow = load_flow(flow_file).await?;

  println!("{} ({})", flow.name(), flow.flow_id());
  for section in flow.sections() {
    println!("  {section}");
    for step in flow.steps().iter().filter(|s| s.section == section) {
      match &step.condition {
        Some(condition) => println!("    {:<24} {:<8} if {}", step.id, step.type_name(), condition),
        None => println!("    {:<24} {}", step.id, step.type_name()),
      }
    }
  }

  Ok(())
}

async fn outline(flow_file: Option<&Path>, state_file: Option<&Path>) -> Result<()> {
  let flow = load_flow(flow_file).await?;

  let state = match state_file {
    Some(path) => {
      let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read state file: {}", path.display()))?;
      serde_json::from_str::<DomainState>(&content)
        .with_context(|| format!("failed to parse state file: {}", path.display()))?
    }
    None => DomainState::new(),
  };

  let active = resolve(&flow, &state);
  for (index, step) in active.iter().enumerate() {
    println!(
      "{:>3}  {:<12} {:<24} {:>5.1}%  {}",
      index,
      step.section,
      step.id,
      local_progress(&active, step),
      if intake_engine::can_advance(step, &state) { "ok" } else { "incomplete" }
    );
  }

  Ok(())
}

/// A line command read by `walk`.
enum Command {
  Show,
  Set { path: String, value: Value },
  Add { collection: String, item: Value },
  Remove { collection: String, index: usize },
  Next,
  Back,
  Jump { step_id: String },
  Save,
  Quit,
}

impl Command {
  fn parse(line: &str) -> Result<Self> {
    let line = line.trim();
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match name {
      "show" => Command::Show,
      "next" => Command::Next,
      "back" => Command::Back,
      "save" => Command::Save,
      "quit" | "exit" => Command::Quit,
      "jump" => {
        if rest.is_empty() {
          bail!("usage: jump <step-id>");
        }
        Command::Jump {
          step_id: rest.to_string(),
        }
      }
      "set" => {
        let (path, value) = rest.split_once(' ').context("usage: set <path> <value>")?;
        Command::Set {
          path: path.to_string(),
          value: parse_value(value.trim()),
        }
      }
      "add" => {
        let (collection, item) = rest.split_once(' ').unwrap_or((rest, "{}"));
        if collection.is_empty() {
          bail!("usage: add <collection> [json]");
        }
        Command::Add {
          collection: collection.to_string(),
          item: serde_json::from_str(item.trim()).context("item must be JSON")?,
        }
      }
      "remove" => {
        let (collection, index) = rest
          .split_once(' ')
          .context("usage: remove <collection> <index>")?;
        Command::Remove {
          collection: collection.to_string(),
          index: index.trim().parse().context("index must be a number")?,
        }
      }
      other => bail!("unknown command: {other}"),
    };

    Ok(command)
  }
}

/// JSON when it parses, plain text otherwise.
fn parse_value(raw: &str) -> Value {
  serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

async fn walk(flow_file: Option<&Path>, data_dir: &Path, user_id: String) -> Result<()> {
  let flow = load_flow(flow_file).await?;
  let store = FsApplicationStore::new(data_dir.join("applications"));

  let mut wizard = Wizard::resume(flow, user_id, store)
    .await
    .context("failed to load saved application")?;
  print_view(&wizard)?;

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    if line.trim().is_empty() {
      continue;
    }

    let command = match Command::parse(&line) {
      Ok(command) => command,
      Err(e) => {
        eprintln!("{e:#}");
        continue;
      }
    };

    let outcome = match command {
      Command::Show => Ok(()),
      Command::Set { path, value } => wizard.set_field(&path, value),
      Command::Add { collection, item } => wizard.push_item(&collection, item).map(|_| ()),
      Command::Remove { collection, index } => wizard.remove_item(&collection, index).map(|_| ()),
      Command::Back => {
        if !wizard.back() {
          eprintln!("already at the first step");
        }
        Ok(())
      }
      Command::Jump { step_id } => {
        if !wizard.jump_to(&step_id) {
          eprintln!("step '{step_id}' is not active");
        }
        Ok(())
      }
      Command::Next => match wizard.forward().await {
        Ok(Advance::Moved { step_id, .. }) => {
          eprintln!("-> {step_id}");
          Ok(())
        }
        Ok(Advance::Blocked) => {
          eprintln!("cannot continue: {}", serde_json::to_string(&wizard.unmet())?);
          Ok(())
        }
        Ok(Advance::Submitted(record)) => {
          eprintln!("submitted application {}", record.application_id);
          Ok(())
        }
        Err(e) => Err(e),
      },
      Command::Save => wizard.save_draft().await.map(|record| {
        eprintln!("saved draft {}", record.application_id);
      }),
      Command::Quit => break,
    };

    if let Err(e) = outcome {
      report(&e);
    }
    print_view(&wizard)?;
  }

  if wizard.status() != SubmissionStatus::Succeeded {
    wizard
      .save_draft()
      .await
      .context("failed to save draft on exit")?;
  }

  Ok(())
}

fn print_view<S: ApplicationStore>(wizard: &Wizard<S>) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(&wizard.view())?);
  Ok(())
}

fn report(error: &WizardError) {
  match error {
    WizardError::Submission(_) => eprintln!("{error}; your answers are kept, try again"),
    _ => eprintln!("error: {error}"),
  }
}
