/*!
 * # hansub - Korean-aware subtitle timing and editing
 *
 * A Rust library that turns generated narrative text into timed subtitles
 * and keeps them correct while they are edited.
 *
 * ## Features
 *
 * - Korean particle (josa) selection from Hangul syllable structure
 * - Sentence and line segmentation that never separates a word from its particle
 * - Reading-speed timing, rescaled to an exact target duration
 * - Conflict-free timeline editing: move, split, merge, undo/redo
 * - Export to SRT, WebVTT, ASS and JSON; import from SRT and JSON
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `particles`: Particle selection and normalization
 * - `segmenter`: Sentence, line and chunk segmentation
 * - `timing`: Duration estimation and allocation
 * - `generator`: Sections of text to timed entries
 * - `timeline`: The edit session:
 *   - `timeline::store`: Ordered entry store and conflict resolution
 *   - `timeline::history`: Undo/redo command log
 *   - `timeline::events`: Broadcast notifications
 *   - `timeline::editor`: Session facade used by callers
 * - `alignment`: Timing correction sources
 * - `export`: Subtitle formats
 * - `validation`: Advisory warnings
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod alignment;
pub mod app_config;
pub mod errors;
pub mod export;
pub mod generator;
pub mod language_utils;
pub mod particles;
pub mod segmenter;
pub mod subtitle;
pub mod timeline;
pub mod timing;
pub mod validation;

// Re-export main types for easier usage
pub use alignment::{AlignmentSource, JitterAlignment};
pub use app_config::Config;
pub use errors::{AppError, EditError, EditResult, ImportError};
pub use export::{ExportFormat, Exporter};
pub use generator::{GenerationRequest, Section, SubtitleGenerator};
pub use particles::{ParticleCategory, ParticleSelector};
pub use segmenter::TextSegmenter;
pub use subtitle::{SubtitleEntry, SubtitleStyle};
pub use timeline::{SubtitleEditor, Timeline, TimelineEvent};
pub use timing::TimingAllocator;
pub use validation::validate_subtitles;
