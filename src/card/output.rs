use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::card::options::{CardOptions, OutputType, DEFAULT_CARD_HEIGHT, DEFAULT_CARD_WIDTH};
use crate::card::postprocess::{convert_hex_colors, remove_animations};
use crate::card::renderer::CardRenderer;
use crate::error::{Error, Result};
use crate::models::StatsResult;

static SVG_WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r#"width=['"](\d+)px['"]"#).unwrap());
static SVG_HEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"height=['"](\d+)px['"]"#).unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Binary(Vec<u8>),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(text) => text.as_bytes(),
            Body::Binary(bytes) => bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedResponse {
    pub content_type: &'static str,
    pub body: Body,
    pub status: u16,
}

/// What goes on the card.
#[derive(Debug, Clone, Copy)]
pub enum CardContent<'a> {
    Stats(&'a StatsResult),
    Error(&'a str),
}

/// Turns an SVG document into PNG bytes.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>>;
}

/// Pipes the SVG through an external converter speaking the `rsvg-convert`
/// command line (`-w W -h H -f png`, SVG on stdin, PNG on stdout).
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: String,
}

impl CommandRasterizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Rasterizer for CommandRasterizer {
    async fn rasterize(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .arg("-w")
            .arg(width.to_string())
            .arg("-h")
            .arg(height.to_string())
            .arg("-f")
            .arg("png")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::ConversionFailure(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(svg.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ConversionFailure(stderr.trim().to_string()));
        }
        Ok(output.stdout)
    }
}

/// Produces the final response body in the requested format.
#[derive(Clone)]
pub struct OutputGenerator {
    renderer: CardRenderer,
    rasterizer: Arc<dyn Rasterizer>,
}

impl OutputGenerator {
    pub fn new(renderer: CardRenderer, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self { renderer, rasterizer }
    }

    pub fn renderer(&self) -> &CardRenderer {
        &self.renderer
    }

    pub async fn generate_output(
        &self,
        content: CardContent<'_>,
        options: &CardOptions,
        status: u16,
    ) -> GeneratedResponse {
        if options.output == OutputType::Json {
            return GeneratedResponse {
                content_type: OutputType::Json.content_type(),
                body: Body::Text(json_body(content)),
                status,
            };
        }

        let svg = match content {
            CardContent::Stats(stats) => self.renderer.render(stats, options),
            CardContent::Error(message) => self.renderer.render_error(message, options),
        };
        let mut svg = convert_hex_colors(&svg);
        if options.disable_animations {
            svg = remove_animations(&svg);
        }

        if options.output == OutputType::Svg {
            return GeneratedResponse {
                content_type: OutputType::Svg.content_type(),
                body: Body::Text(svg),
                status,
            };
        }

        let (width, height) = svg_dimensions(&svg);
        let sanitized = remove_animations(svg.trim()).replace('\n', " ");
        let failure = match self.rasterizer.rasterize(&sanitized, width, height).await {
            Ok(png) if !png.is_empty() => {
                return GeneratedResponse {
                    content_type: OutputType::Png.content_type(),
                    body: Body::Binary(png),
                    status,
                }
            }
            Ok(_) => Error::ConversionFailure("Empty PNG buffer generated".to_string()),
            Err(e @ Error::ConversionFailure(_)) => e,
            Err(e) => Error::ConversionFailure(e.to_string()),
        };

        tracing::warn!("PNG conversion failed: {}", failure);
        GeneratedResponse {
            content_type: OutputType::Svg.content_type(),
            body: Body::Text(self.renderer.render_error(&failure.to_string(), options)),
            status: 500,
        }
    }
}

fn json_body(content: CardContent<'_>) -> String {
    let error = |message: &str| serde_json::json!({ "error": message }).to_string();
    match content {
        CardContent::Stats(stats) => serde_json::to_string(stats).unwrap_or_else(|e| error(&e.to_string())),
        CardContent::Error(message) => error(message),
    }
}

/// Pixel size declared on the root element, defaulting to 495x195.
pub fn svg_dimensions(svg: &str) -> (u32, u32) {
    let read = |pattern: &Regex, fallback: f64| {
        pattern
            .captures(svg)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .unwrap_or(fallback as u32)
    };
    (read(&SVG_WIDTH, DEFAULT_CARD_WIDTH), read(&SVG_HEIGHT, DEFAULT_CARD_HEIGHT))
}
