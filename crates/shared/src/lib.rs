// Public modules
pub mod classifier;
pub mod composer;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fonts;
pub mod io;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod scorer;
pub mod selector;

// Re-export commonly used types
pub use classifier::{Category, Rejection};
pub use composer::{render, Background, RenderDegradation, RenderedFrame, FRAME_HEIGHT, FRAME_WIDTH};
pub use config::Config;
pub use error::{CurationError, FontError};
pub use fonts::{FontFace, FontSet};
pub use io::{get_default_data_dir, list_batch_files, load_batch, load_raw_stories, save_batch, save_frame};
pub use layout::{wrap_lines, TextMeasure};
pub use manifest::FrameManifest;
pub use models::{CuratedStory, CurationBatch, NormalizedStory, RawStory};
pub use pipeline::{curate, curate_with_report, CurationReport};
pub use scorer::CurationScore;
