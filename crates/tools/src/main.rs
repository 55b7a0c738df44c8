use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use formats::Topology;
use foundation::math::{Rotation, Vec2};
use render::{ViewerConfig, draw_globe, to_svg};
use reqwest::Client;
use runtime::InputEvent;
use scene::{ShapeSet, pick_screen};
use tools::session::{ViewOverrides, build_globe, parse_script, replay};
use tools::source::BoundarySource;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render and hit-test the interactive globe headlessly"
)]
struct Args {
    /// Viewer config JSON (same schema the web viewer accepts)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Boundary document URL (default: GLOBE_WORLD_URL, then the config's data.url)
    #[arg(long)]
    url: Option<String>,

    /// Read boundaries from a local TopoJSON or GeoJSON file instead
    #[arg(long)]
    input: Option<PathBuf>,

    /// Topology object to expand (e.g. countries, land)
    #[arg(long)]
    object: Option<String>,

    /// Directory for cached downloads
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug, Clone, Copy)]
struct ViewArgs {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Rotation λ in degrees (the view centres on longitude -λ)
    #[arg(long, allow_negative_numbers = true)]
    lambda: Option<f64>,

    /// Rotation φ in degrees (the view centres on latitude -φ)
    #[arg(long, allow_negative_numbers = true)]
    phi: Option<f64>,

    /// Globe radius in pixels
    #[arg(long)]
    scale: Option<f64>,
}

impl ViewArgs {
    fn overrides(self, config: &ViewerConfig) -> ViewOverrides {
        let [lambda0, phi0] = config.controls.initial_rotation;
        let rotation = (self.lambda.is_some() || self.phi.is_some()).then(|| {
            Rotation::new(self.lambda.unwrap_or(lambda0), self.phi.unwrap_or(phi0))
        });
        ViewOverrides {
            width: self.width,
            height: self.height,
            rotation,
            scale: self.scale,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the globe to SVG
    Render {
        #[command(flatten)]
        view: ViewArgs,

        /// Pointer position to hover before drawing, as x,y
        #[arg(long, value_parser = parse_point)]
        hover: Option<Vec2>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the shape under a pixel
    Pick {
        #[command(flatten)]
        view: ViewArgs,

        #[arg(allow_negative_numbers = true)]
        x: f64,

        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Run a JSON event script, then draw the final frame
    Replay {
        /// JSON array of input events
        script: PathBuf,

        #[command(flatten)]
        view: ViewArgs,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List topology objects and their feature counts
    Inspect,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    ViewerConfig::from_json_str(&text).with_context(|| format!("parse {}", path.display()))
}

fn write_output(out: Option<&Path>, svg: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, svg).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), bytes = svg.len(), "wrote svg");
        }
        None => print!("{svg}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(url) = args.url.or_else(|| env::var("GLOBE_WORLD_URL").ok()) {
        config.data.url = url;
    }
    if let Some(object) = args.object {
        config.data.object = object;
    }

    let source = BoundarySource {
        input: args.input,
        url: config.data.url.clone(),
        cache_dir: args.cache_dir,
    };
    let client = Client::new();
    let text = source.load_text(&client).await?;

    if let Command::Inspect = args.command {
        return inspect(&text, &config.data.object);
    }

    let collection = formats::load_boundaries(&text, &config.data.object)
        .context("decode boundary document")?;
    let shapes = ShapeSet::from_features(&collection);
    info!(
        features = collection.len(),
        shapes = shapes.len(),
        "boundaries ready"
    );

    match args.command {
        Command::Render { view, hover, out } => {
            let mut globe = build_globe(&config, view.overrides(&config), shapes);
            if let Some(p) = hover {
                let _ = globe.handle(InputEvent::PointerMove { x: p.x, y: p.y });
            }
            let svg = to_svg(&draw_globe(&globe, &config.style));
            write_output(out.as_deref(), &svg)?;
        }
        Command::Pick { view, x, y } => {
            let globe = build_globe(&config, view.overrides(&config), shapes);
            let opts = scene::PickOptions {
                tolerance_px: config.controls.hover_tolerance_px,
            };
            let hit = pick_screen(
                globe.shapes(),
                &globe.projection(),
                globe.canvas(),
                Vec2::new(x, y),
                opts,
            );
            match hit.and_then(|id| globe.shapes().get(id)) {
                Some(shape) => println!(
                    "{}\t{}",
                    shape.feature_id().unwrap_or("-"),
                    shape.name().unwrap_or("<unnamed>")
                ),
                None => println!("none"),
            }
        }
        Command::Replay { script, view, out } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("read {}", script.display()))?;
            let events = parse_script(&text)?;
            let mut globe = build_globe(&config, view.overrides(&config), shapes);
            let summary = replay(&mut globe, &events);
            info!(
                events = summary.events,
                redraws = summary.redraws,
                hovered = globe.hovered_shape().and_then(|s| s.name()),
                "replay finished"
            );
            let svg = to_svg(&draw_globe(&globe, &config.style));
            write_output(out.as_deref(), &svg)?;
        }
        Command::Inspect => {}
    }

    Ok(())
}

fn inspect(text: &str, object: &str) -> Result<()> {
    let topology = match Topology::from_json_str(text) {
        Ok(topology) => topology,
        Err(formats::FormatError::NotATopology(kind)) => {
            let collection =
                formats::load_boundaries(text, object).context("decode boundary document")?;
            println!(
                "{kind}\tfeatures={}\tareal={}",
                collection.len(),
                collection.areal_count()
            );
            return Ok(());
        }
        Err(err) => return Err(err).context("decode topology"),
    };

    println!(
        "Topology\tarcs={}\tquantized={}",
        topology.arc_count(),
        topology.transform().is_some()
    );
    for name in topology.object_names() {
        let collection = topology
            .feature(name)
            .with_context(|| format!("decode object {name}"))?;
        println!(
            "{name}\tfeatures={}\tareal={}",
            collection.len(),
            collection.areal_count()
        );
    }
    Ok(())
}
