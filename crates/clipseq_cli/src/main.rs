//! clipseq - assemble one audio file from a sequence of clips and pauses.
//!
//! Thin layer over `clipseq_core`: loads the config, initializes tracing
//! and maps error categories to exit codes.

mod cli;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use clipseq_core::config::{ConfigError, ConfigManager, ConfigSection};
use clipseq_core::logging::{init_tracing, init_tracing_with_file, LogLevel};
use clipseq_core::models::StepKind;
use clipseq_core::orchestrator::{ErrorCategory, PipelineError, Runner};
use clipseq_core::sequence::{read_sequence, SequenceError};

use cli::{Cli, Command, ConfigAction};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut manager = ConfigManager::new(&cli.config);
    let loaded = manager.load_or_create();

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        manager.settings().logging.level
    };
    // Keep the guard alive so the file writer flushes on exit.
    let _guard = match &loaded {
        Ok(()) => init_tracing_with_file(level, &manager.logs_folder()),
        Err(_) => {
            init_tracing(level);
            None
        }
    };

    let result = loaded
        .with_context(|| format!("loading {}", cli.config.display()))
        .and_then(|()| dispatch(cli.command, &mut manager));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn dispatch(command: Command, manager: &mut ConfigManager) -> Result<()> {
    match command {
        Command::Run {
            sequence,
            output,
            scratch,
            name,
        } => run(manager, &sequence, output, scratch, name),
        Command::Plan { sequence } => plan(&sequence),
        Command::Config { action } => config(manager, action),
    }
}

fn run(
    manager: &ConfigManager,
    sequence: &Path,
    output: Option<PathBuf>,
    scratch: Option<PathBuf>,
    name: Option<String>,
) -> Result<()> {
    let mut settings = manager.settings().clone();
    if let Some(name) = name {
        settings.output.file_prefix = name;
    }

    let output_dir = match output {
        Some(dir) => dir,
        None => {
            manager.ensure_dirs_exist()?;
            manager.output_folder()
        }
    };
    let scratch_base = scratch.unwrap_or_else(|| manager.scratch_root());

    let runner = Runner::new(settings)?;
    let result = runner.run(sequence, &output_dir, &scratch_base)?;

    println!("{}", result.output_path.display());
    println!("duration: {:.3}s", result.audio_length_seconds);
    Ok(())
}

fn plan(sequence_path: &Path) -> Result<()> {
    let sequence = read_sequence(sequence_path)?;

    let (mut clips, mut pauses) = (0usize, 0usize);
    for (index, step) in sequence.steps.iter().enumerate() {
        let what = match &step.kind {
            StepKind::Clip { path } => {
                clips += 1;
                format!("clip   {}", path.display())
            }
            StepKind::Pause { seconds } if *seconds > 0.0 => {
                pauses += 1;
                format!("pause  {:.3}s", seconds)
            }
            StepKind::Pause { .. } | StepKind::Empty => "nothing".to_string(),
        };
        println!("{:>4}  {:<12} {}", index + 1, step.id, what);
    }

    for warning in &sequence.warnings {
        println!(
            "warning: line {} ({}): {}",
            warning.line, warning.step_id, warning.message
        );
    }
    println!(
        "{} step(s): {} clip(s), {} pause(s)",
        sequence.steps.len(),
        clips,
        pauses
    );
    Ok(())
}

fn config(manager: &mut ConfigManager, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = fs::read_to_string(manager.path())
                .with_context(|| format!("reading {}", manager.path().display()))?;
            print!("{}", content);
        }
        ConfigAction::SetOutput { dir } => {
            manager.settings_mut().paths.output_folder = dir.display().to_string();
            manager.update_section(ConfigSection::Paths)?;
            println!("output_folder = {}", dir.display());
        }
        ConfigAction::SetScratch { dir } => {
            manager.settings_mut().paths.scratch_root = dir.display().to_string();
            manager.update_section(ConfigSection::Paths)?;
            println!("scratch_root = {}", dir.display());
        }
    }
    Ok(())
}

/// 0 ok, 2 configuration, 3 input, 4 processing, 1 anything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<PipelineError>() {
            return match e.category() {
                ErrorCategory::Configuration => 2,
                ErrorCategory::Input => 3,
                ErrorCategory::Processing => 4,
            };
        }
        if cause.is::<ConfigError>() {
            return 2;
        }
        if cause.is::<SequenceError>() {
            return 3;
        }
    }
    1
}
