use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use formats::{FeatureCollection, MatchRow, TournamentFile, TournamentRecord, VenueTable, read_match_rows};
use foundation::time::Time;
use insights::{InsightsReport, RegionFilter, ReportOptions, SortOrder};
use scene::regions::RegionRegistry;
use story::config::StoryConfig;
use story::focus::{Intersection, NavAction, ScrollDirection};
use story::tournament::build_tournaments;
use story::{Story, StoryMachine, build_narrative_steps};
use tracing::{info, warn};

mod console;
mod datasets;
mod dom;
mod error;

use datasets::{Dataset, candidate_urls};
use dom::DomPresenter;
use error::ShellError;

/// Raw rows kept for the insights charts.
struct Datasets {
    rows: Vec<MatchRow>,
    cups: Vec<TournamentRecord>,
}

struct Loaded {
    machine: StoryMachine,
    presenter: DomPresenter,
    data: Datasets,
}

thread_local! {
    static APP: RefCell<Option<Loaded>> = const { RefCell::new(None) };
}

fn now_ms() -> Time {
    Time(
        web_sys::window()
            .and_then(|w| w.performance())
            .map_or(0.0, |p| p.now()),
    )
}

fn with_loaded<R>(f: impl FnOnce(&mut Loaded) -> R) -> Option<R> {
    APP.with(|app| app.borrow_mut().as_mut().map(f))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    console::install(tracing::Level::INFO);
    Ok(())
}

/// Fetch the datasets under `base_url`, draw the map and build the story.
/// `config_json` overrides the default [`StoryConfig`].
#[wasm_bindgen]
pub fn load_story(base_url: String, config_json: Option<String>) {
    spawn_local(async move {
        match load(&base_url, config_json.as_deref()).await {
            Ok(loaded) => {
                info!(target: "story_web", steps = loaded.machine.step_count(), "story ready");
                APP.with(|app| *app.borrow_mut() = Some(loaded));
            }
            Err(err) => {
                tracing::error!(target: "story_web", %err, "story failed to load");
            }
        }
    });
}

/// One intersection batch: parallel arrays of step indices and their
/// bounding-box tops, plus the page scroll offset.
#[wasm_bindgen]
pub fn observe_steps(indices: &[u32], tops: &[f64], scroll_y: f64) {
    let batch: Vec<Intersection> = indices
        .iter()
        .zip(tops)
        .map(|(&i, &top)| Intersection {
            step_index: i as usize,
            top_px: top,
            is_intersecting: true,
        })
        .collect();
    let now = now_ms();
    with_loaded(|app| app.machine.observe(&batch, scroll_y, now, &mut app.presenter));
}

#[wasm_bindgen]
pub fn tick(now_ms: f64) {
    with_loaded(|app| app.machine.tick(Time(now_ms), &mut app.presenter));
}

/// Keydown handler; also unlocks audio. Returns whether the page should
/// call `preventDefault`.
#[wasm_bindgen]
pub fn on_key(key: &str) -> bool {
    let mid = web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .map_or(0.0, |h| h * 0.5);
    with_loaded(|app| {
        let centers = app.presenter.step_centers();
        let outcome = app.machine.key_down(key, &centers, mid, &mut app.presenter);
        match outcome.action {
            NavAction::ScrollToStep(i) => app.presenter.scroll_to_step(i),
            NavAction::ScrollToTop => {
                if let Some(w) = web_sys::window() {
                    w.scroll_to_with_x_and_y(0.0, 0.0);
                }
            }
            NavAction::None => {}
        }
        outcome.prevent_default
    })
    .unwrap_or(false)
}

/// Pointerdown anywhere on the page.
#[wasm_bindgen]
pub fn on_gesture() {
    with_loaded(|app| app.machine.unlock_audio(&mut app.presenter));
}

/// The start button: unlocks audio and scrolls past the intro.
#[wasm_bindgen]
pub fn on_start() {
    with_loaded(|app| {
        let action = app.machine.start(&mut app.presenter);
        if let Some(i) = action.scroll_to {
            app.presenter.scroll_to_step(i);
        }
    });
}

#[wasm_bindgen]
pub fn on_resize() {
    with_loaded(|app| app.machine.on_resize(&mut app.presenter));
}

#[wasm_bindgen]
pub fn step_count() -> usize {
    with_loaded(|app| app.machine.step_count()).unwrap_or(0)
}

/// Focus a step directly, as if scrolled to going forward.
#[wasm_bindgen]
pub fn focus_step(index: usize) {
    let now = now_ms();
    with_loaded(|app| {
        app.machine
            .focus(index, ScrollDirection::Forward, now, &mut app.presenter)
    });
}

#[wasm_bindgen]
pub fn teardown(now_ms: f64) {
    with_loaded(|app| app.machine.teardown(Time(now_ms), &mut app.presenter));
    APP.with(|app| app.borrow_mut().take());
}

/// Chart data for the insights block as JSON. `region` is a confederation
/// key or `"ALL"`; `order` is `"asc"` or `"desc"`.
#[wasm_bindgen]
pub fn insights_json(region: &str, order: &str, min_matches: Option<u32>) -> Result<String, JsValue> {
    let options = ReportOptions {
        region: RegionFilter::parse(region),
        order: SortOrder::parse(order),
        min_matches,
    };
    with_loaded(|app| {
        let config = app.machine.story().config().insights;
        let report = InsightsReport::build(&app.data.rows, &app.data.cups, &config, options);
        serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
    })
    .unwrap_or_else(|| Err(JsValue::from_str("story not loaded")))
}

async fn load(base_url: &str, config_json: Option<&str>) -> Result<Loaded, ShellError> {
    let config = match config_json {
        Some(json) => StoryConfig::from_json_str(json)?,
        None => StoryConfig::default(),
    };
    let window = web_sys::window().ok_or(ShellError::NoDocument)?;
    let document = window.document().ok_or(ShellError::NoDocument)?;

    let countries = FeatureCollection::from_geojson_str(&fetch_first(base_url, Dataset::Countries).await?)?;
    let file = TournamentFile::from_json_str(&fetch_first(base_url, Dataset::Tournaments).await?)?;
    let rows = read_match_rows(&fetch_first(base_url, Dataset::Matches).await?)?;
    let venues = match fetch_first(base_url, Dataset::Venues).await {
        Ok(text) => VenueTable::from_json_str(&text)?,
        Err(err) if Dataset::Venues.is_optional() => {
            warn!(target: "story_web", %err, "continuing without global venues");
            VenueTable::new()
        }
        Err(err) => return Err(err),
    };

    let registry = RegionRegistry::from_features(&countries);
    let tournaments = build_tournaments(&file, &rows, &venues, &config);
    let steps = build_narrative_steps(&tournaments);
    info!(
        target: "story_web",
        regions = registry.len(),
        tournaments = tournaments.len(),
        matches = rows.len(),
        "datasets loaded"
    );

    let mut presenter = DomPresenter::new(document, config.view_box, config.colors.clone());
    let story = Story::new(config, tournaments, registry, steps);
    presenter.draw_regions(story.registry(), story.projection());
    story::Presenter::set_camera(&mut presenter, &story.world_fit());

    let scroll_origin = window.scroll_y().unwrap_or(0.0);
    Ok(Loaded {
        machine: StoryMachine::new(story).with_scroll_origin(scroll_origin),
        presenter,
        data: Datasets {
            rows,
            cups: file.cups,
        },
    })
}

async fn fetch_text(url: &str) -> Result<String, ShellError> {
    let fetch_err = |message: String| ShellError::Fetch {
        url: url.to_string(),
        message,
    };
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    if !resp.ok() {
        return Err(fetch_err(format!("HTTP {}", resp.status())));
    }
    resp.text().await.map_err(|e| fetch_err(e.to_string()))
}

/// First candidate location of `dataset` that answers.
async fn fetch_first(base_url: &str, dataset: Dataset) -> Result<String, ShellError> {
    for url in candidate_urls(base_url, dataset) {
        match fetch_text(&url).await {
            Ok(text) => return Ok(text),
            Err(err) => tracing::debug!(target: "story_web", %err, "trying next candidate"),
        }
    }
    Err(ShellError::NotFound(dataset.name()))
}
