use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use structopt::StructOpt;

use crate::api::AppState;
use crate::cache::PersistentCache;
use crate::client::RoutesClient;
use crate::config::IcyRouteConfig;
use crate::directions::{self, DirectionsProvider};
use crate::models::{DriverExperience, RouteRequest, SearchResults};
use crate::planner::{DemoCatalog, RoutePlanner};
use crate::view::{Command, MapSession, MapSurface, SceneMap, SessionOptions, compare, route_cards};
use crate::weather::{OpenMeteoClient, WeatherSampler};
use crate::web;

const NO_SAFE_ROUTES: &str = "❌ No safe routes found for your experience level. Consider adjusting your settings or choosing expert mode.";

#[derive(StructOpt, Debug, Clone, PartialEq)]
#[structopt(name = "icyroute", about = "Winter route planning with ice-risk scoring")]
pub struct Cli {
    /// Config file to read instead of the default location
    #[structopt(long = "config", global = true, parse(from_os_str))]
    pub config: Option<PathBuf>,

    // no subcommand runs `serve`
    #[structopt(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(StructOpt, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Run the routes backend and serve the web UI
    Serve,
    /// Search through a running backend and print the route cards and comparison
    Plan(PlanArgs),
    /// List the bundled winter-storm demo scenarios
    Demos,
}

#[derive(StructOpt, Debug, Clone, PartialEq)]
pub struct PlanArgs {
    pub origin: String,
    pub destination: String,

    /// beginner, intermediate or expert
    #[structopt(long = "experience", default_value = "intermediate")]
    pub experience: DriverExperience,

    /// Rank the least icy routes first
    #[structopt(long = "avoid-icy")]
    pub avoid_icy: bool,

    /// Backend to search through, defaults to the local server port
    #[structopt(long = "server")]
    pub server: Option<String>,

    /// Keep a prompt open for show, hide, toggle, focus, compare and demo commands
    #[structopt(long = "interactive")]
    pub interactive: bool,
}

impl PlanArgs {
    #[must_use]
    pub fn request(&self) -> RouteRequest {
        RouteRequest {
            driver_experience: self.experience,
            avoid_icy: self.avoid_icy,
            ..RouteRequest::new(self.origin.as_str(), self.destination.as_str())
        }
    }
}

fn open_cache(config: &IcyRouteConfig) -> Option<PersistentCache> {
    match PersistentCache::open(&config.cache.location) {
        Ok(cache) => Some(cache),
        Err(e) => {
            tracing::warn!("Cache at {} unavailable: {e:#}", config.cache.location);
            None
        }
    }
}

pub async fn run(command: CliCommand, config: IcyRouteConfig) -> Result<()> {
    match command {
        CliCommand::Demos => {
            for (i, demo) in DemoCatalog::bundled()?.list().iter().enumerate() {
                println!(
                    "{}. {} -> {}  ({}, {})",
                    i + 1,
                    demo.origin,
                    demo.destination,
                    demo.event,
                    demo.date
                );
            }
            Ok(())
        }
        CliCommand::Serve => serve(config).await,
        CliCommand::Plan(args) => plan(args, config).await,
    }
}

async fn serve(config: IcyRouteConfig) -> Result<()> {
    let cache = open_cache(&config);
    let directions = directions::from_config(&config, cache.clone())?;

    let mut sampler = WeatherSampler::new(Arc::new(OpenMeteoClient::new(&config.weather)?));
    if let Some(cache) = cache {
        sampler = sampler.with_cache(cache);
    }

    let planner = RoutePlanner::new(
        directions,
        sampler,
        DemoCatalog::bundled()?,
        config.weather.sample_interval_km,
    );
    web::run(AppState::new(planner), &config.server).await
}

async fn plan(args: PlanArgs, config: IcyRouteConfig) -> Result<()> {
    let request = args.request();
    let server = args
        .server
        .unwrap_or_else(|| format!("http://localhost:{}", config.server.port));
    let client = RoutesClient::new(
        server,
        Duration::from_secs(config.server.request_timeout_seconds.into()),
    )?;
    let directions: Arc<dyn DirectionsProvider> = directions::from_config(&config, open_cache(&config))?;
    let mut session = MapSession::new(
        SceneMap::new(),
        directions,
        SessionOptions::from(&config.view),
    );

    search(&client, &mut session, &request).await;
    if args.interactive {
        interact(&client, &mut session).await?;
    }
    Ok(())
}

async fn search(client: &RoutesClient, session: &mut MapSession<SceneMap>, request: &RouteRequest) {
    let reply = client.search(request).await;
    if show_search(session, request, reply).await == SearchOutcome::Routes {
        print_results(session);
    }
}

/// What a finished search left in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    Failed,
    NoSafeRoutes,
    Routes,
}

/// Hand a search reply to the session. A failed search clears the previous
/// one, so later commands never act on stale routes.
async fn show_search<M: MapSurface>(
    session: &mut MapSession<M>,
    request: &RouteRequest,
    reply: crate::Result<SearchResults>,
) -> SearchOutcome {
    let results = match reply {
        Ok(results) => results,
        Err(e) => {
            session.dispose();
            eprintln!("{}", e.user_message());
            return SearchOutcome::Failed;
        }
    };

    if let Some(event) = &results.winter_event {
        println!("❄️  {} ({})", event.description, event.date);
    }
    if let Some(note) = &results.analysis_note {
        println!("{note}");
    }

    session
        .begin(results.routes, &request.origin, &request.destination)
        .await;
    if session.routes().is_empty() {
        println!("{NO_SAFE_ROUTES}");
        return SearchOutcome::NoSafeRoutes;
    }
    SearchOutcome::Routes
}

fn print_results<M: MapSurface>(session: &MapSession<M>) {
    for card in route_cards(session.routes(), session.displays()) {
        println!("{card}");
    }
    print_comparison(session);
}

fn print_comparison<M: MapSurface>(session: &MapSession<M>) {
    match compare(session.routes()) {
        Ok(comparison) => println!("{comparison}"),
        Err(e) => println!("{}", e.user_message()),
    }
}

fn print_status(session: &MapSession<SceneMap>) {
    let scene = session.surface();
    let viewport = scene
        .viewport()
        .map(|v| format!("zoom {} around {}", v.zoom, v.bounds.center().format_coordinates()))
        .unwrap_or_else(|| "not fitted".to_string());
    println!(
        "{} of {} routes drawn, {} markers shown, viewport {viewport}",
        scene.attached_path_count(),
        session.routes().len(),
        scene.visible_marker_tags().len(),
    );
}

async fn interact(client: &RoutesClient, session: &mut MapSession<SceneMap>) -> Result<()> {
    println!("Commands: show, hide, toggle N, focus N, compare, demo N, quit");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit" | "q") {
            return Ok(());
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if let Some(request) = command.demo_request() {
            search(client, session, &request).await;
        } else if command == Command::Compare {
            print_comparison(session);
        } else {
            command.apply(session);
            print_status(session);
        }
    }
}
