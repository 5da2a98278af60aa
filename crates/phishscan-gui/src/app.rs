//! Application state, model loading, single-URL detection and batch checks.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use phishscan_core::scan::{load_url_list, run_scan, ScanProgress};
use phishscan_core::{
    load_detector, load_model_config, resolve_model_path, CheckResult, Detector, FeatureVector,
    ModelConfig, OnnxClassifier, Outcome,
};

/// Model lifecycle. A detector is loaded once per model/config selection and
/// reused for every URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Ready,
}

type Selection = (PathBuf, Option<PathBuf>);

/// A URL list being checked on a background thread.
pub struct BatchRun {
    pub progress: Arc<ScanProgress>,
    started: Instant,
    rx: mpsc::Receiver<Vec<CheckResult>>,
}

pub struct DetectorApp {
    // Configuration
    pub model_path: PathBuf,
    pub config_path: Option<PathBuf>,

    // Model
    pub load_state: LoadState,
    pub detector: Option<Arc<Detector<OnnxClassifier>>>,
    pub load_duration: Option<f32>,
    pub error_message: Option<String>,
    loaded_from: Option<Selection>,

    // Single URL
    pub url_input: String,
    pub outcome: Option<Outcome>,
    pub features: Option<FeatureVector>,

    // Results
    pub history: Vec<CheckResult>,
    pub filter_text: String,
    pub batch: Option<BatchRun>,
    pub batch_duration: Option<f32>,

    load_rx: Option<mpsc::Receiver<(Selection, LoadOutcome)>>,
}

enum LoadOutcome {
    Success(Detector<OnnxClassifier>, f32),
    Error(String),
}

fn load(
    model_path: &Path,
    config_path: Option<&Path>,
) -> phishscan_core::Result<Detector<OnnxClassifier>> {
    let config = match config_path {
        Some(p) => load_model_config(p)?,
        None => ModelConfig::default(),
    };
    load_detector(model_path, &config)
}

impl DetectorApp {
    /// Build the app and start loading the default model right away, so a
    /// missing or broken artifact shows up before the first URL is typed.
    pub fn new() -> Self {
        let mut app = Self {
            model_path: resolve_model_path(None),
            config_path: None,
            load_state: LoadState::NotLoaded,
            detector: None,
            load_duration: None,
            error_message: None,
            loaded_from: None,
            url_input: String::new(),
            outcome: None,
            features: None,
            history: Vec::new(),
            filter_text: String::new(),
            batch: None,
            batch_duration: None,
            load_rx: None,
        };
        app.start_load();
        app
    }

    fn selection(&self) -> Selection {
        (self.model_path.clone(), self.config_path.clone())
    }

    /// Whether the picked model/config differ from the loaded detector.
    pub fn needs_load(&self) -> bool {
        self.loaded_from.as_ref() != Some(&self.selection())
    }

    pub fn start_load(&mut self) {
        if self.load_state == LoadState::Loading || !self.needs_load() {
            return;
        }

        self.error_message = None;
        self.load_duration = None;
        self.load_state = LoadState::Loading;

        let selection = self.selection();
        let (tx, rx) = mpsc::channel();
        self.load_rx = Some(rx);

        tracing::info!("loading model from {}", selection.0.display());
        std::thread::spawn(move || {
            let start = Instant::now();
            let outcome = match load(&selection.0, selection.1.as_deref()) {
                Ok(detector) => LoadOutcome::Success(detector, start.elapsed().as_secs_f32()),
                Err(e) => LoadOutcome::Error(format!("{e}")),
            };
            let _ = tx.send((selection, outcome));
        });
    }

    pub fn start_batch(&mut self, list: &Path) {
        let Some(detector) = self.detector.clone() else {
            self.error_message = Some("Load a model first".into());
            return;
        };
        if self.batch.is_some() {
            return;
        }

        let urls = match load_url_list(list) {
            Ok(urls) if urls.is_empty() => {
                self.error_message = Some(format!("No URLs in {}", list.display()));
                return;
            }
            Ok(urls) => urls,
            Err(e) => {
                self.error_message = Some(format!("{e}"));
                return;
            }
        };

        self.error_message = None;
        self.batch_duration = None;
        let progress = Arc::new(ScanProgress::new());
        let (tx, rx) = mpsc::channel();

        let worker_progress = Arc::clone(&progress);
        std::thread::spawn(move || {
            let results = run_scan(&*detector, &urls, &worker_progress);
            let _ = tx.send(results);
        });

        self.batch = Some(BatchRun {
            progress,
            started: Instant::now(),
            rx,
        });
    }

    pub fn cancel_batch(&self) {
        if let Some(run) = &self.batch {
            run.progress.cancel();
        }
    }

    /// Poll background work; called each frame.
    pub fn poll(&mut self) {
        if let Some(rx) = &self.load_rx {
            if let Ok((selection, outcome)) = rx.try_recv() {
                match outcome {
                    LoadOutcome::Success(detector, duration) => {
                        tracing::info!("model ready in {duration:.2}s");
                        self.detector = Some(Arc::new(detector));
                        self.load_duration = Some(duration);
                        self.loaded_from = Some(selection);
                        self.load_state = LoadState::Ready;
                    }
                    LoadOutcome::Error(msg) => {
                        tracing::error!("{msg}");
                        self.error_message = Some(msg);
                        self.load_state = if self.detector.is_some() {
                            LoadState::Ready
                        } else {
                            LoadState::NotLoaded
                        };
                    }
                }
                self.load_rx = None;
            }
        }

        if let Some(run) = &self.batch {
            if let Ok(results) = run.rx.try_recv() {
                let cancelled = run.progress.is_cancelled();
                self.batch_duration = Some(run.started.elapsed().as_secs_f32());
                if cancelled {
                    self.error_message =
                        Some(format!("Batch cancelled after {} URLs", results.len()));
                }
                self.history.extend(results);
                self.batch = None;
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.load_state == LoadState::Loading || self.batch.is_some()
    }

    pub fn batch_counts(&self) -> Option<(usize, usize, usize, usize)> {
        self.batch.as_ref().map(|run| {
            let p = &run.progress;
            (
                p.checked_urls.load(Ordering::Relaxed),
                p.total_urls.load(Ordering::Relaxed),
                p.phishing_count.load(Ordering::Relaxed),
                p.error_count.load(Ordering::Relaxed),
            )
        })
    }

    pub fn detect(&mut self) {
        let Some(detector) = &self.detector else {
            self.error_message = Some("Load a model first".into());
            return;
        };

        let submission = detector.submit_with_features(&self.url_input);
        let url = self.url_input.clone();
        match &submission.outcome {
            Outcome::Verdict(p) => self.history.push(CheckResult::new(url, Ok(*p))),
            Outcome::Error(msg) => self.history.push(CheckResult {
                url,
                label: None,
                confidence: None,
                error: Some(msg.clone()),
            }),
            Outcome::Warning(_) => {}
        }

        self.features = Some(submission.features).filter(|f| !f.is_empty());
        self.outcome = Some(submission.outcome);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.batch_duration = None;
    }
}

impl eframe::App for DetectorApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        self.poll();

        if self.is_busy() {
            ctx.request_repaint();
        }

        crate::ui::sidebar::draw_sidebar(ctx, self);
        crate::ui::detect_view::draw_detect_view(ctx, self);
    }
}
