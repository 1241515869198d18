use std::{error::Error, future::Future, time::Duration};

use futures::{
    future::{FutureExt, LocalBoxFuture},
    stream::FuturesUnordered,
    StreamExt,
};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::grid::{
    blocked::{CampusPolicy, OpenWeek, WindowPolicy},
    builder::{build_grid, layout},
    models::Section,
    slots::SlotTable,
};

use super::{
    fetch_guard::{FetchGuard, FetchToken, SectionStore},
    helpers::{diff_renderings, faculty_stats, filter_sections, log_all_sections, overall_stats, FacultyStats, OverallStats},
    models::{Args, Config, OutputFormat, SectionPage, View},
    publisher::GridPublisher,
    render::{render_details, render_html, render_text, Palette},
    schedule_getter::SectionGetter,
};

#[derive(Serialize, Debug)]
struct StatsReport {
    overall: OverallStats,
    faculty: Option<FacultyStats>,
}

pub fn title_for(view: &View, owner: Option<&str>) -> String {
    let base = match view {
        View::Student { .. } => "My Weekly Schedule".to_owned(),
        View::Faculty { .. } => "My Teaching Schedule".to_owned(),
        View::Level {
            level_id,
            group_id: Some(group_id),
        } => format!("Level {} / Group {}", level_id, group_id),
        View::Level { level_id, .. } => format!("Level {}", level_id),
        View::All { .. } => "All Sections".to_owned(),
    };
    match owner {
        Some(owner) if !owner.is_empty() => format!("{} - {}", base, owner),
        _ => base,
    }
}

/// Filters the fetched sections and renders them in the requested format.
pub fn render_page(sections: &[Section], owner: Option<&str>, args: &Args) -> Result<String, Box<dyn Error>> {
    let shown = filter_sections(sections, args.search.as_deref(), args.faculty.as_deref());
    log_all_sections(&shown);
    let title = title_for(&args.view, owner);

    let rendered = match args.format {
        OutputFormat::Text | OutputFormat::Html => {
            let table = SlotTable::standard();
            let grid = build_grid(&shown);
            if !grid.unplaced().is_empty() {
                warn!(
                    "{} sections have no usable day or start time and are not shown",
                    grid.unplaced().len()
                );
            }
            let policy: &dyn WindowPolicy = if args.view.is_builder() {
                &CampusPolicy
            } else {
                &OpenWeek
            };
            let palette = if args.view.is_builder() {
                Palette::Status
            } else {
                Palette::Course
            };
            let rows = layout(&grid, &table, policy);
            if args.format == OutputFormat::Html {
                render_html(&rows, &table, &title, palette)
            } else {
                render_text(&rows, &table, &title)
            }
        }
        OutputFormat::Details => render_details(&shown, &title),
        OutputFormat::Stats => {
            let report = StatsReport {
                overall: overall_stats(sections),
                faculty: args
                    .faculty
                    .as_deref()
                    .and_then(|faculty| faculty_stats(&shown, faculty)),
            };
            serde_json::to_string_pretty(&report)? + "\n"
        }
    };
    info!("Rendered {} sections as {:?}", shown.len(), args.format);
    Ok(rendered)
}

type Fetched = (FetchToken, Result<SectionPage, Box<dyn Error>>);

async fn fetch_page<SG: SectionGetter>(schedule_getter: &SG, view: &View, token: FetchToken) -> Fetched {
    let result = schedule_getter.get_sections(view).await;
    (token, result)
}

/// Fetches once, renders, publishes.
pub async fn run<SG: SectionGetter, GP: GridPublisher>(
    schedule_getter: SG,
    publisher: &mut GP,
    args: &Args,
) -> Result<(), Box<dyn Error>> {
    let guard = FetchGuard::default();
    let mut store = SectionStore::default();
    let (token, page) = fetch_page(&schedule_getter, &args.view, guard.issue()).await;
    store.accept(&token, page?);
    let rendered = render_page(store.sections(), store.owner(), args)?;
    publisher.publish(&rendered)
}

/// Keeps the view fresh until `shutdown` resolves.
///
/// A fetch starts on every poll tick while no other fetch is running, and on
/// every message from `reload` (whoever edits the schedule announces it
/// there). A reload supersedes and drops the fetch in progress, so only the
/// most recently started one is allowed to land. A new rendering is
/// published when it differs from the last one published.
pub async fn watch<SG, GP, S>(
    schedule_getter: SG,
    publisher: &mut GP,
    args: &Args,
    config: &Config,
    mut reload: mpsc::Receiver<()>,
    shutdown: S,
) -> Result<(), Box<dyn Error>>
where
    SG: SectionGetter,
    GP: GridPublisher,
    S: Future<Output = ()>,
{
    let guard = FetchGuard::default();
    let mut store = SectionStore::default();
    let mut previous: Option<String> = None;
    let mut in_flight: FuturesUnordered<LocalBoxFuture<'_, Fetched>> = FuturesUnordered::new();
    let mut reload_open = true;

    let mut ticker = time::interval(Duration::from_secs(config.poll_interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(
        "Watching {:?}, polling every {}s",
        args.view, config.poll_interval_secs
    );
    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                guard.cancel();
                info!("Stopping, {} fetches dropped", in_flight.len());
                break;
            }
            _ = ticker.tick() => {
                if in_flight.is_empty() {
                    in_flight.push(fetch_page(&schedule_getter, &args.view, guard.issue()).boxed_local());
                } else {
                    debug!("Previous fetch still running, skipping this poll");
                }
            }
            signal = reload.recv(), if reload_open => match signal {
                Some(()) => {
                    info!("Reload requested");
                    if !in_flight.is_empty() {
                        debug!("Dropping {} superseded fetches", in_flight.len());
                        in_flight.clear();
                    }
                    in_flight.push(fetch_page(&schedule_getter, &args.view, guard.issue()).boxed_local());
                }
                None => {
                    debug!("Reload channel closed, polling only");
                    reload_open = false;
                }
            },
            Some((token, result)) = in_flight.next() => match result {
                Ok(page) => {
                    if !store.accept(&token, page) {
                        continue;
                    }
                    let rendered = render_page(store.sections(), store.owner(), args)?;
                    let changed = match &previous {
                        Some(old) => match diff_renderings(old, &rendered) {
                            Some(diff) => {
                                info!("Schedule changed:\n{}", diff);
                                true
                            }
                            None => false,
                        },
                        None => true,
                    };
                    if changed {
                        publisher.publish(&rendered)?;
                        previous = Some(rendered);
                    } else {
                        debug!("No changes in fetch {}", token.generation());
                    }
                }
                Err(err) if token.is_current() => warn!("Fetch {} failed: {}", token.generation(), err),
                Err(err) => debug!("Stale fetch {} failed: {}", token.generation(), err),
            },
        }
    }
    Ok(())
}
