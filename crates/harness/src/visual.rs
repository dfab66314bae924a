//! Visual regression: candidate screenshots against stored baselines.
//!
//! Baselines are explicit, named artifacts. A missing baseline is never an
//! implicit side effect of an assertion: `check` reports it as a distinct
//! [`VisualOutcome::BaselineCreated`] outcome, which the runner surfaces as
//! a skipped check, and `update_baseline` is the deliberate promotion path.

use std::path::{Path, PathBuf};

use image::{Pixel, RgbaImage};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use tekqa_common::{QaError, QaResult};

/// Measured difference between a candidate and its baseline.
#[derive(Debug, Clone)]
pub struct VisualDiff {
    /// Fraction of differing pixels, 0.0–1.0.
    pub diff_ratio: f64,
    pub diff_pixels: u64,
    pub total_pixels: u64,
    /// Diff image with differing pixels marked, when any differ.
    pub diff_image_path: Option<PathBuf>,
    pub candidate_hash: String,
    pub baseline_hash: String,
}

/// Result of a visual check.
#[derive(Debug, Clone)]
pub enum VisualOutcome {
    /// Within the allowed pixel-diff ratio.
    Match(VisualDiff),
    /// Outside the allowed ratio.
    Mismatch(VisualDiff),
    /// No baseline existed; the candidate was promoted to seed one and the
    /// check must be reported as skipped.
    BaselineCreated { baseline_path: PathBuf },
}

/// Configuration for visual comparisons.
#[derive(Debug, Clone)]
pub struct VisualConfig {
    pub baseline_dir: PathBuf,
    pub actual_dir: PathBuf,
    pub diff_dir: PathBuf,
    /// Allowed fraction of differing pixels, 0.0–1.0.
    pub max_diff_ratio: f64,
    /// Per-channel tolerance absorbing anti-aliasing and compression noise.
    pub pixel_tolerance: u8,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            baseline_dir: PathBuf::from("test-results/baselines"),
            actual_dir: PathBuf::from("test-results/screenshots"),
            diff_dir: PathBuf::from("test-results/diffs"),
            max_diff_ratio: 0.02,
            pixel_tolerance: 5,
        }
    }
}

pub struct VisualTester {
    config: VisualConfig,
}

impl VisualTester {
    pub fn new(config: VisualConfig) -> QaResult<Self> {
        std::fs::create_dir_all(&config.baseline_dir)?;
        std::fs::create_dir_all(&config.actual_dir)?;
        std::fs::create_dir_all(&config.diff_dir)?;
        Ok(Self { config })
    }

    /// Where the candidate screenshot for `name` should be written.
    pub fn candidate_path(&self, name: &str) -> PathBuf {
        self.config.actual_dir.join(format!("{name}.png"))
    }

    /// Compare the named candidate against its baseline.
    pub fn check(&self, name: &str, ratio_override: Option<f64>) -> QaResult<VisualOutcome> {
        let max_ratio = ratio_override.unwrap_or(self.config.max_diff_ratio);
        let candidate_path = self.candidate_path(name);
        let baseline_path = self.config.baseline_dir.join(format!("{name}.png"));

        if !candidate_path.exists() {
            return Err(QaError::Driver(format!(
                "candidate screenshot not found: {}",
                candidate_path.display()
            )));
        }

        if !baseline_path.exists() {
            info!(name, "no baseline yet; promoting candidate to seed it");
            std::fs::copy(&candidate_path, &baseline_path)?;
            return Ok(VisualOutcome::BaselineCreated { baseline_path });
        }

        let candidate_hash = hash_file(&candidate_path)?;
        let baseline_hash = hash_file(&baseline_path)?;

        // Identical bytes need no pixel walk.
        if candidate_hash == baseline_hash {
            debug!(name, "screenshots are byte-identical");
            let img = image::open(&candidate_path)?;
            let total = (img.width() as u64) * (img.height() as u64);
            return Ok(VisualOutcome::Match(VisualDiff {
                diff_ratio: 0.0,
                diff_pixels: 0,
                total_pixels: total,
                diff_image_path: None,
                candidate_hash,
                baseline_hash,
            }));
        }

        let candidate = image::open(&candidate_path)?.to_rgba8();
        let baseline = image::open(&baseline_path)?.to_rgba8();

        if candidate.dimensions() != baseline.dimensions() {
            warn!(
                name,
                candidate = ?candidate.dimensions(),
                baseline = ?baseline.dimensions(),
                "screenshot dimensions differ; non-overlapping area counts as diff"
            );
        }

        // Union canvas: pixels outside the overlap count as differing.
        let width = candidate.width().max(baseline.width());
        let height = candidate.height().max(baseline.height());
        let total_pixels = (width as u64) * (height as u64);

        let mut diff_img = RgbaImage::new(width, height);
        let mut diff_pixels = 0u64;

        for y in 0..height {
            for x in 0..width {
                let within_both = x < candidate.width()
                    && y < candidate.height()
                    && x < baseline.width()
                    && y < baseline.height();
                let differs = if within_both {
                    pixels_differ(
                        candidate.get_pixel(x, y),
                        baseline.get_pixel(x, y),
                        self.config.pixel_tolerance,
                    )
                } else {
                    true
                };

                if differs {
                    diff_pixels += 1;
                    diff_img.put_pixel(x, y, image::Rgba([255, 0, 0, 255]));
                } else {
                    let channels = candidate.get_pixel(x, y).channels();
                    diff_img.put_pixel(
                        x,
                        y,
                        image::Rgba([channels[0] / 2, channels[1] / 2, channels[2] / 2, 128]),
                    );
                }
            }
        }

        let diff_ratio = diff_pixels as f64 / total_pixels as f64;

        let diff_image_path = if diff_pixels > 0 {
            let path = self.config.diff_dir.join(format!("{name}-diff.png"));
            diff_img.save(&path)?;
            Some(path)
        } else {
            None
        };

        let diff = VisualDiff {
            diff_ratio,
            diff_pixels,
            total_pixels,
            diff_image_path,
            candidate_hash,
            baseline_hash,
        };

        if diff_ratio <= max_ratio {
            Ok(VisualOutcome::Match(diff))
        } else {
            warn!(
                name,
                ratio = format!("{:.4}", diff_ratio),
                allowed = format!("{:.4}", max_ratio),
                "visual regression detected"
            );
            Ok(VisualOutcome::Mismatch(diff))
        }
    }

    /// Promote the named candidate to be the new baseline.
    pub fn update_baseline(&self, name: &str) -> QaResult<()> {
        let candidate_path = self.candidate_path(name);
        if !candidate_path.exists() {
            return Err(QaError::BaselineMissing(format!(
                "cannot update baseline for '{name}': no candidate at {}",
                candidate_path.display()
            )));
        }
        let baseline_path = self.config.baseline_dir.join(format!("{name}.png"));
        std::fs::copy(&candidate_path, &baseline_path)?;
        info!(name, "baseline updated");
        Ok(())
    }

    /// Promote every candidate currently on disk.
    pub fn update_all_baselines(&self) -> QaResult<Vec<String>> {
        let mut updated = Vec::new();
        for entry in std::fs::read_dir(&self.config.actual_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "png").unwrap_or(false) {
                if let Some(name) = path.file_stem() {
                    let name = name.to_string_lossy().to_string();
                    self.update_baseline(&name)?;
                    updated.push(name);
                }
            }
        }
        updated.sort();
        Ok(updated)
    }

    /// Names of all stored baselines.
    pub fn list_baselines(&self) -> QaResult<Vec<String>> {
        let mut baselines = Vec::new();
        for entry in std::fs::read_dir(&self.config.baseline_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "png").unwrap_or(false) {
                if let Some(name) = path.file_stem() {
                    baselines.push(name.to_string_lossy().to_string());
                }
            }
        }
        baselines.sort();
        Ok(baselines)
    }
}

fn pixels_differ(a: &image::Rgba<u8>, b: &image::Rgba<u8>, tolerance: u8) -> bool {
    a.channels()
        .iter()
        .zip(b.channels())
        .any(|(ca, cb)| (*ca as i32 - *cb as i32).unsigned_abs() > tolerance as u32)
}

fn hash_file(path: &Path) -> QaResult<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}
