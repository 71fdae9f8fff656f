//! Frame composition for vertical short-form video.
//!
//! Layout, top to bottom: headline block, separator rule, summary block,
//! then a footer line near the bottom edge. All text is centered
//! horizontally inside an 80px margin.

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, warn};

use crate::fonts::{FontFace, FontSet, FontSubstitution};
use crate::layout::wrap_lines;
use crate::models::CuratedStory;

pub const FRAME_WIDTH: u32 = 1080;
pub const FRAME_HEIGHT: u32 = 1920;

const MARGIN: u32 = 80;
const TEXT_WIDTH: f32 = (FRAME_WIDTH - 2 * MARGIN) as f32;

const HEADLINE_SIZE: f32 = 60.0;
const HEADLINE_TOP: i32 = 200;
const HEADLINE_LINE_STEP: i32 = 80;
const SHADOW_OFFSET: i32 = 2;

const SEPARATOR_GAP: i32 = 40;
const SEPARATOR_THICKNESS: u32 = 3;

const SUMMARY_SIZE: f32 = 35.0;
const SUMMARY_GAP: i32 = 80;
const SUMMARY_LINE_STEP: i32 = 50;

const FOOTER_SIZE: f32 = 25.0;
const FOOTER_OFFSET: i32 = 100;
/// Space kept free between the last summary line and the footer
const FOOTER_CLEARANCE: i32 = 30;

const BACKGROUND_COLOR: Rgb<u8> = Rgb([0x1a, 0x1a, 0x1a]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const SHADOW_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const SEPARATOR_COLOR: Rgb<u8> = Rgb([0xff, 0x6b, 0x35]);
const FOOTER_COLOR: Rgb<u8> = Rgb([0xcc, 0xcc, 0xcc]);

/// Opacity of the black overlay laid over background images
const OVERLAY_ALPHA: u16 = 150;

/// Background image data handed to [`render`]
#[derive(Debug, Clone, Copy)]
pub enum Background<'a> {
    /// Already-decoded pixels
    Pixels(&'a DynamicImage),
    /// Encoded image bytes (JPEG, PNG, ...)
    Encoded(&'a [u8]),
}

/// A non-fatal problem that changed how a frame looks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDegradation {
    FontFallback(FontSubstitution),
    BackgroundUnavailable { reason: String },
}

#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub image: RgbImage,
    pub story: CuratedStory,
    pub degradations: Vec<RenderDegradation>,
}

impl RenderedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Where every piece of text goes on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub headline: Vec<PlacedLine>,
    pub separator_y: i32,
    pub summary: Vec<PlacedLine>,
    pub footer: PlacedLine,
}

fn centered(face: &FontFace, size: f32, text: &str, y: i32) -> PlacedLine {
    let width = face.measure(text, size);
    PlacedLine {
        text: text.to_string(),
        x: ((FRAME_WIDTH as f32 - width) / 2.0).round() as i32,
        y,
    }
}

/// Compute text positions for `story` without drawing anything.
pub fn compose_layout(story: &CuratedStory, fonts: &FontSet) -> FrameLayout {
    let mut y = HEADLINE_TOP;
    let mut headline = Vec::new();
    for line in wrap_lines(&story.headline, &fonts.headline.at(HEADLINE_SIZE), TEXT_WIDTH) {
        headline.push(centered(&fonts.headline, HEADLINE_SIZE, &line, y));
        y += HEADLINE_LINE_STEP;
    }

    let separator_y = y + SEPARATOR_GAP;

    let footer_y = FRAME_HEIGHT as i32 - FOOTER_OFFSET;
    let summary_limit = footer_y - FOOTER_CLEARANCE;

    let mut y = separator_y + SUMMARY_GAP;
    let mut summary = Vec::new();
    let lines = wrap_lines(&story.summary, &fonts.body.at(SUMMARY_SIZE), TEXT_WIDTH);
    let total = lines.len();
    for line in lines {
        if y + SUMMARY_SIZE as i32 > summary_limit {
            debug!(
                sequence_id = story.sequence_id,
                drawn = summary.len(),
                total,
                "summary does not fit above footer"
            );
            break;
        }
        summary.push(centered(&fonts.body, SUMMARY_SIZE, &line, y));
        y += SUMMARY_LINE_STEP;
    }

    let footer = centered(&fonts.body, FOOTER_SIZE, &footer_text(story), footer_y);

    FrameLayout {
        headline,
        separator_y,
        summary,
        footer,
    }
}

/// Render `story` onto a fresh 1080x1920 canvas.
///
/// Never fails: an unusable background falls back to a solid fill and font
/// substitutions made by `fonts` are carried into the frame's degradations.
pub fn render(
    story: &CuratedStory,
    background: Option<Background<'_>>,
    fonts: &FontSet,
) -> RenderedFrame {
    let mut degradations: Vec<RenderDegradation> = fonts
        .substitutions
        .iter()
        .cloned()
        .map(RenderDegradation::FontFallback)
        .collect();

    let mut image = match background.map(prepare_background) {
        Some(Ok(image)) => image,
        Some(Err(reason)) => {
            warn!(
                sequence_id = story.sequence_id,
                "Could not use background image: {}", reason
            );
            degradations.push(RenderDegradation::BackgroundUnavailable { reason });
            solid_canvas()
        }
        None => solid_canvas(),
    };

    let layout = compose_layout(story, fonts);
    paint(&mut image, &layout, fonts);

    RenderedFrame {
        image,
        story: story.clone(),
        degradations,
    }
}

fn paint(image: &mut RgbImage, layout: &FrameLayout, fonts: &FontSet) {
    for line in &layout.headline {
        fonts.headline.draw(
            image,
            SHADOW_COLOR,
            line.x + SHADOW_OFFSET,
            line.y + SHADOW_OFFSET,
            HEADLINE_SIZE,
            &line.text,
        );
        fonts
            .headline
            .draw(image, TEXT_COLOR, line.x, line.y, HEADLINE_SIZE, &line.text);
    }

    let rule = Rect::at(MARGIN as i32, layout.separator_y - (SEPARATOR_THICKNESS / 2) as i32)
        .of_size(FRAME_WIDTH - 2 * MARGIN, SEPARATOR_THICKNESS);
    draw_filled_rect_mut(image, rule, SEPARATOR_COLOR);

    for line in &layout.summary {
        fonts
            .body
            .draw(image, TEXT_COLOR, line.x, line.y, SUMMARY_SIZE, &line.text);
    }

    let footer = &layout.footer;
    fonts
        .body
        .draw(image, FOOTER_COLOR, footer.x, footer.y, FOOTER_SIZE, &footer.text);
}

fn solid_canvas() -> RgbImage {
    RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, BACKGROUND_COLOR)
}

fn prepare_background(background: Background<'_>) -> Result<RgbImage, String> {
    let decoded;
    let source = match background {
        Background::Pixels(image) => image,
        Background::Encoded(bytes) => {
            decoded = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
            &decoded
        }
    };

    if source.width() == 0 || source.height() == 0 {
        return Err("background image is empty".to_string());
    }

    let mut canvas = source
        .resize_to_fill(FRAME_WIDTH, FRAME_HEIGHT, FilterType::Lanczos3)
        .to_rgb8();
    darken(&mut canvas);

    Ok(canvas)
}

/// Composite a black overlay at [`OVERLAY_ALPHA`] over the whole image
fn darken(image: &mut RgbImage) {
    let keep = 255 - OVERLAY_ALPHA;
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = (*channel as u16 * keep / 255) as u8;
        }
    }
}

/// Footer line: source attribution and capture date
pub fn footer_text(story: &CuratedStory) -> String {
    format!(
        "स्रोत: {} | {}",
        source_display_name(&story.source_id),
        story.captured_at.format("%d/%m/%Y")
    )
}

/// Human-readable name for a source id
pub fn source_display_name(source_id: &str) -> String {
    match source_id.to_lowercase().as_str() {
        "aajtak" => "Aaj Tak".to_string(),
        "amarujala" => "Amar Ujala".to_string(),
        "indiatoday" => "India Today".to_string(),
        _ => title_case(source_id),
    }
}

fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                result.extend(ch.to_uppercase());
            } else {
                result.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(ch);
            at_word_start = true;
        }
    }

    result
}
