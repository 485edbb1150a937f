//! Runner: the blocking entry point that takes a sequence file to an
//! assembled audio file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use uuid::Uuid;

use super::errors::{PipelineError, PipelineResult, StepError};
use super::types::{Context, RunPaths, RunState};
use super::create_standard_pipeline;
use crate::config::{OutputSettings, Settings};
use crate::logging::{LogConfig, RunLoggerBuilder};
use crate::media::{FfmpegBackend, MediaBackend, MediaTools, OutputProfile};
use crate::models::ProcessingResult;

/// Shared log sink, wrapped into each run's logger.
pub type SharedLogCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Shared progress sink: (step_name, percent, message).
pub type SharedProgressCallback = Arc<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Runs sequences through the standard pipeline, one at a time.
pub struct Runner {
    settings: Settings,
    backend: Arc<dyn MediaBackend>,
    log_callback: Option<SharedLogCallback>,
    progress_callback: Option<SharedProgressCallback>,
}

impl Runner {
    /// Validate settings and resolve ffmpeg/ffprobe.
    ///
    /// Both failures are configuration errors; nothing is touched on disk.
    pub fn new(settings: Settings) -> PipelineResult<Self> {
        settings.validate().map_err(PipelineError::configuration)?;
        let tools = MediaTools::resolve(&settings.tools)
            .map_err(|e| PipelineError::configuration(e.to_string()))?;
        let backend = FfmpegBackend::new(tools, OutputProfile::from_settings(&settings.output));
        Ok(Self::with_backend(settings, Arc::new(backend)))
    }

    /// Use a specific media backend instead of resolving ffmpeg.
    pub fn with_backend(settings: Settings, backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            settings,
            backend,
            log_callback: None,
            progress_callback: None,
        }
    }

    pub fn with_log_callback(mut self, callback: SharedLogCallback) -> Self {
        self.log_callback = Some(callback);
        self
    }

    pub fn with_progress_callback(mut self, callback: SharedProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Assemble `sequence_path` into a new file in `output_dir`.
    ///
    /// The run's scratch area lives under `scratch_base` and is gone when
    /// this returns.
    pub fn run(
        &self,
        sequence_path: &Path,
        output_dir: &Path,
        scratch_base: &Path,
    ) -> PipelineResult<ProcessingResult> {
        let run_id = Uuid::new_v4().to_string();
        let started = Local::now();

        let paths = RunPaths {
            sequence: sequence_path.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            output_file: output_dir.join(output_file_name(
                &self.settings.output,
                started,
                &run_id,
            )),
            scratch_base: scratch_base.to_path_buf(),
        };

        let mut builder = RunLoggerBuilder::new(
            format!("run-{}", run_id),
            PathBuf::from(&self.settings.paths.logs_folder),
        )
        .config(LogConfig::from_settings(&self.settings.logging));
        if let Some(callback) = &self.log_callback {
            let callback = Arc::clone(callback);
            builder = builder.callback(Box::new(move |line| callback(line)));
        }
        let logger = Arc::new(
            builder
                .build()
                .map_err(|e| PipelineError::setup_failed(&run_id, format!("run log: {}", e)))?,
        );

        tracing::info!(run = %run_id, "Assembling {}", sequence_path.display());
        logger.info(&format!("Run {} started {}", run_id, started.to_rfc3339()));
        logger.info(&format!("Output file: {}", paths.output_file.display()));
        logger.info(&format!("Scratch base: {}", paths.scratch_base.display()));

        let mut ctx = Context::new(
            self.settings.clone(),
            &run_id,
            paths,
            Arc::clone(&self.backend),
            Arc::clone(&logger),
        );
        if let Some(callback) = &self.progress_callback {
            let callback = Arc::clone(callback);
            ctx = ctx.with_progress_callback(Box::new(move |step, percent, message| {
                callback(step, percent, message)
            }));
        }

        let mut state = RunState::new(&run_id);
        let outcome = create_standard_pipeline().run(&ctx, &mut state);

        if let Err(e) = state.release_scratch() {
            logger.warn(&format!("Could not remove scratch area: {}", e));
        }
        logger.json("Run summary", &state.summary());

        match outcome {
            Ok(_) => {
                let result = state.result.take().ok_or_else(|| {
                    PipelineError::step_failed(
                        &run_id,
                        "ConcatenateSegments",
                        StepError::invalid_output("result not recorded"),
                    )
                })?;
                logger.success(&format!(
                    "{} ({:.3}s)",
                    result.output_path.display(),
                    result.audio_length_seconds
                ));
                Ok(result)
            }
            Err(e) => {
                logger.error(&e.to_string());
                tracing::error!(run = %run_id, "{}", e);
                Err(e)
            }
        }
    }
}

/// `<prefix>-<YYYYmmdd-HHMMSS>-<run>.<ext>`, where `<run>` is the first
/// eight characters of the run id, so runs started in the same second
/// never share a file.
pub fn output_file_name(
    output: &OutputSettings,
    started: DateTime<Local>,
    run_id: &str,
) -> String {
    let prefix = output.file_prefix.trim();
    let prefix = if prefix.is_empty() { "sequence" } else { prefix };
    let run: String = run_id.chars().filter(|c| *c != '-').take(8).collect();
    format!(
        "{}-{}-{}.{}",
        prefix,
        started.format("%Y%m%d-%H%M%S"),
        run,
        output.extension.trim_start_matches('.')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::fake::FakeBackend;
    use crate::orchestrator::ErrorCategory;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            fs::create_dir_all(dir.path().join("out")).unwrap();
            Self { dir }
        }

        fn settings(&self) -> Settings {
            let mut settings = Settings::default();
            settings.paths.logs_folder = self.dir.path().join("logs").display().to_string();
            settings
        }

        fn clip(&self, name: &str) -> String {
            let path = self.dir.path().join(name);
            fs::write(&path, b"audio").unwrap();
            path.display().to_string()
        }

        fn sequence(&self, content: &str) -> PathBuf {
            let path = self.dir.path().join("sequence.csv");
            fs::write(&path, content).unwrap();
            path
        }

        fn out(&self) -> PathBuf {
            self.dir.path().join("out")
        }

        fn scratch(&self) -> PathBuf {
            self.dir.path().join("scratch")
        }

        fn scratch_is_empty(&self) -> bool {
            fs::read_dir(self.scratch())
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(true)
        }

        fn run(&self, backend: FakeBackend, sequence: &Path) -> PipelineResult<ProcessingResult> {
            Runner::with_backend(self.settings(), Arc::new(backend)).run(
                sequence,
                &self.out(),
                &self.scratch(),
            )
        }
    }

    #[test]
    fn output_name_uses_prefix_and_timestamp() {
        let started = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let mut output = OutputSettings::default();
        let run_id = "3f2a9c1e-77b4-4d2e-9a1b-0c8d5e6f7a8b";
        assert_eq!(
            output_file_name(&output, started, run_id),
            "sequence-20240309-070501-3f2a9c1e.mp3"
        );

        output.file_prefix = "podcast".to_string();
        output.extension = ".wav".to_string();
        assert_eq!(
            output_file_name(&output, started, run_id),
            "podcast-20240309-070501-3f2a9c1e.wav"
        );
    }

    #[test]
    fn clip_pause_clip_sums_durations() {
        let ws = Workspace::new();
        let seq = ws.sequence(&format!(
            "id,clip,pause\n1,{},\n2,,2.0\n3,{},\n",
            ws.clip("a.mp3"),
            ws.clip("b.mp3")
        ));

        let result = ws.run(FakeBackend::new(4.0), &seq).unwrap();

        assert!((result.audio_length_seconds - 10.0).abs() < 0.1);
        assert!(result.output_path.starts_with(ws.out()));
        assert!(result.output_path.exists());
        assert!(ws.scratch_is_empty());
    }

    #[test]
    fn invalid_pause_only_is_nothing_to_process() {
        let ws = Workspace::new();
        let seq = ws.sequence("1,,abc\n");

        let err = ws.run(FakeBackend::new(1.0), &seq).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.to_string().contains("nothing to process"));
        assert!(!ws.scratch().exists());
    }

    #[test]
    fn missing_clip_aborts_before_scratch() {
        let ws = Workspace::new();
        let seq = ws.sequence("1,/no/such/clip.mp3,\n2,,1.0\n");
        let backend = Arc::new(FakeBackend::new(1.0));

        let err = Runner::with_backend(ws.settings(), backend.clone())
            .run(&seq, &ws.out(), &ws.scratch())
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.to_string().contains("ValidateInputs"));
        assert!(!ws.scratch().exists());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn concat_failure_leaves_nothing_behind() {
        let ws = Workspace::new();
        let seq = ws.sequence(&format!("1,{},\n2,,1.5\n", ws.clip("a.mp3")));

        let err = ws
            .run(FakeBackend::new(1.0).failing_concat(), &seq)
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Processing);
        assert!(ws.scratch_is_empty());
        assert_eq!(fs::read_dir(ws.out()).unwrap().count(), 0);
    }

    #[test]
    fn failed_run_keeps_earlier_output() {
        let ws = Workspace::new();
        let seq = ws.sequence(&format!("1,{},\n2,,0.5\n", ws.clip("a.mp3")));

        let first = ws.run(FakeBackend::new(1.0), &seq).unwrap();
        let err = ws
            .run(FakeBackend::new(1.0).failing_concat(), &seq)
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Processing);
        assert!(first.output_path.exists());
        assert_eq!(fs::read_dir(ws.out()).unwrap().count(), 1);
    }

    #[test]
    fn back_to_back_runs_write_separate_files() {
        let ws = Workspace::new();
        let seq = ws.sequence(&format!("1,{},\n", ws.clip("a.mp3")));

        let first = ws.run(FakeBackend::new(1.0), &seq).unwrap();
        let second = ws.run(FakeBackend::new(1.0), &seq).unwrap();

        assert_ne!(first.output_path, second.output_path);
        assert!(first.output_path.exists());
        assert!(second.output_path.exists());
    }

    #[test]
    fn missing_sequence_file_is_input_error() {
        let ws = Workspace::new();
        let err = ws
            .run(FakeBackend::new(1.0), &ws.dir.path().join("absent.csv"))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn callbacks_receive_log_lines_and_progress() {
        let ws = Workspace::new();
        let seq = ws.sequence(&format!("1,{},\n", ws.clip("a.mp3")));
        let lines = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
        let steps = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
        let (line_sink, step_sink) = (lines.clone(), steps.clone());

        Runner::with_backend(ws.settings(), Arc::new(FakeBackend::new(1.0)))
            .with_log_callback(Arc::new(move |line| line_sink.lock().push(line.to_string())))
            .with_progress_callback(Arc::new(move |step, _, _| {
                step_sink.lock().push(step.to_string())
            }))
            .run(&seq, &ws.out(), &ws.scratch())
            .unwrap();

        assert!(lines.lock().iter().any(|l| l.contains("=== PlanSegments ===")));
        assert_eq!(
            *steps.lock(),
            vec![
                "ReadSequence",
                "ValidateInputs",
                "PlanSegments",
                "ConcatenateSegments",
                "Complete"
            ]
        );
    }

    #[test]
    fn bad_settings_are_configuration_errors() {
        let mut settings = Settings::default();
        settings.output.sample_rate = 0;
        let err = Runner::new(settings).err().unwrap();
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let mut settings = Settings::default();
        settings.tools.ffmpeg_path = "/no/such/ffmpeg".to_string();
        let err = Runner::new(settings).err().unwrap();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("ffmpeg"));
    }
}
