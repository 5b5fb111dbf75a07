//! Scripted demo host.
//!
//! A scenario lays out a column of images inside a scrollable [`Viewport`],
//! scrolls it step by step and plays the "network": every image that is
//! currently requesting a URL gets a load or failure notification depending on
//! whether the URL is listed in `broken_urls`. Each step records the render plan
//! of every image.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::Path;
use std::rc::Rc;

use lazyimg_ui::{ElementId, Event, Rectangle, SharedObserver, Viewport};
use serde::{Deserialize, Serialize};

use crate::component::{ErrorEvent, ImageComponent, ImageEvent, LoadEvent};
use crate::compose::RenderPlan;
use crate::config::ImageConfig;
use crate::constants::MAX_SETTLE_ROUNDS;
use crate::error::ConfigError;
use crate::overlay::OverlayTrigger;
use crate::props::ImageProps;
use crate::provider::ConfigProvider;

/// One image of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImage {
    #[serde(flatten)]
    pub props: ImageProps,
    /// Position in page coordinates
    pub bounds: Rectangle,
    /// Pointer rests over the image for the whole run
    #[serde(default)]
    pub hover: bool,
}

/// A scripted run of the demo host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: ImageConfig,
    pub viewport: Rectangle,
    pub images: Vec<ScenarioImage>,
    /// URLs whose loads fail
    #[serde(default)]
    pub broken_urls: BTreeSet<String>,
    /// Vertical scroll offsets, one step each; empty means a single step at the initial offset
    #[serde(default)]
    pub scroll: Vec<f32>,
}

/// Message produced by the components' `on_load`/`on_error` handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DemoMessage {
    Loaded { index: usize, src: String },
    Failed { index: usize, src: String },
}

/// State of every image after one scroll step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub step: usize,
    pub scroll_y: f32,
    pub plans: Vec<RenderPlan>,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub frames: Vec<Frame>,
    pub messages: Vec<DemoMessage>,
}

impl ScenarioReport {
    /// The last recorded plan of image `index`.
    pub fn final_plan(&self, index: usize) -> Option<&RenderPlan> {
        self.frames.last().and_then(|frame| frame.plans.get(index))
    }

    /// Messages emitted for image `index`, in order.
    pub fn messages_for(&self, index: usize) -> impl Iterator<Item = &DemoMessage> {
        self.messages.iter().filter(move |message| match message {
            DemoMessage::Loaded { index: i, .. } | DemoMessage::Failed { index: i, .. } => *i == index,
        })
    }
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scenario = Self::from_json_str(&json)?;
        log::info!("Loaded scenario from {:?} ({} images)", path, scenario.images.len());
        Ok(scenario)
    }

    /// A small gallery exercising lazy loading, fallbacks, source sets and overlays.
    pub fn builtin() -> Result<Self, ConfigError> {
        let config = ImageConfig::new().with_root_margin("50px 0px")?;
        let tile = |row: u8| Rectangle::new(0.0, f32::from(row) * 300.0, 400.0, 280.0);
        let image = |props: ImageProps, row: u8| ScenarioImage {
            props,
            bounds: tile(row),
            hover: false,
        };

        let images = vec![
            image(
                ImageProps::new("photos/cover.jpg")
                    .with_alternative("image/webp", "photos/cover.webp")
                    .with_alternative("image/png", "photos/cover.png")
                    .with_alt("Gallery cover")
                    .gallery(true),
                0,
            ),
            ScenarioImage {
                hover: true,
                ..image(
                    ImageProps::new("photos/beach.jpg").with_overlay("Preview", OverlayTrigger::Hover),
                    1,
                )
            },
            image(
                ImageProps::new("photos/missing.jpg")
                    .with_fallback("photos/fallback.jpg")
                    .with_placeholder("blur:missing"),
                2,
            ),
            image(
                ImageProps::new("photos/gone.jpg")
                    .with_fallback("photos/also-gone.jpg")
                    .with_error("Could not load photo"),
                3,
            ),
            image(ImageProps::new("photos/eager.jpg").lazy(false), 6),
        ];

        Ok(Self {
            config,
            viewport: Rectangle::new(0.0, 0.0, 400.0, 600.0),
            images,
            broken_urls: ["photos/missing.jpg", "photos/gone.jpg", "photos/also-gone.jpg"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            scroll: vec![0.0, 600.0, 1200.0, 1800.0],
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        if self.viewport.area() <= 0.0 {
            return Err(ConfigError::invalid_scenario("viewport has no area"));
        }
        if let Some(bad) = self.scroll.iter().find(|y| !y.is_finite()) {
            return Err(ConfigError::invalid_scenario(format!("scroll offset {} is not finite", bad)));
        }
        Ok(())
    }

    /// Play the scenario.
    pub fn run(&self) -> Result<ScenarioReport, ConfigError> {
        self.validate()?;

        let provider = Rc::new(ConfigProvider::new(self.config.clone()));
        let viewport = Rc::new(RefCell::new(Viewport::new(self.viewport)));
        let observer: SharedObserver = viewport.clone();

        let mut images = Vec::with_capacity(self.images.len());
        for (index, entry) in self.images.iter().enumerate() {
            let id = ElementId::next();
            viewport.borrow_mut().place(id, entry.bounds);

            let mut image = ImageComponent::new(entry.props.clone(), Rc::clone(&provider))
                .on_load(move |event: LoadEvent| DemoMessage::Loaded {
                    index,
                    src: event.src.unwrap_or_default(),
                })
                .on_error(move |event: ErrorEvent| DemoMessage::Failed {
                    index,
                    src: event.src.unwrap_or_default(),
                });
            image.root().attach(id);
            image.mount(Some(Rc::clone(&observer)));
            if entry.hover && image.wires_pointer_events() {
                image.dispatch(Event::PointerEntered.into());
            }
            images.push(image);
        }

        let steps = if self.scroll.is_empty() {
            vec![self.viewport.y]
        } else {
            self.scroll.clone()
        };

        let mut frames = Vec::with_capacity(steps.len());
        let mut messages = Vec::new();
        for (step, scroll_y) in steps.into_iter().enumerate() {
            log::debug!("Step {}: scrolling to y={}", step, scroll_y);
            viewport.borrow_mut().scroll_to(self.viewport.x, scroll_y);
            // Taken in its own statement: dispatching releases observations,
            // which borrows the viewport again.
            let hits = viewport.borrow_mut().take_intersections();
            for hit in hits {
                if let Some(image) = images.iter_mut().find(|image| image.root().get() == Some(hit.target)) {
                    image.dispatch(Event::Intersected(hit).into());
                }
            }

            self.settle(&mut images, &mut messages);
            frames.push(Frame {
                step,
                scroll_y,
                plans: images.iter().map(ImageComponent::render).collect(),
            });
        }

        for image in &mut images {
            image.unmount();
        }
        Ok(ScenarioReport { frames, messages })
    }

    /// Answer pending requests until nothing is requesting any more.
    fn settle(&self, images: &mut [ImageComponent<DemoMessage>], messages: &mut Vec<DemoMessage>) {
        for _ in 0..MAX_SETTLE_ROUNDS {
            let mut answered = false;
            for image in images.iter_mut() {
                let Some(url) = image.pending_request().map(str::to_string) else {
                    continue;
                };
                let event = if self.broken_urls.contains(&url) {
                    ImageEvent::from(ErrorEvent::for_source(url).with_reason("404 Not Found"))
                } else {
                    ImageEvent::from(LoadEvent::for_source(url))
                };
                messages.extend(image.dispatch(event));
                answered = true;
            }
            if !answered {
                break;
            }
        }
    }
}
