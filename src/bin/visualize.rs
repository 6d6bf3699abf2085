use anyhow::{Context, Result};
use arctext::{
    EngineConfig, FontShaper, StoryComponent, layout_story, render::render_story, write_back_cache,
};
use chrono::Local;
use clap::Parser;
use log::{info, warn};
use std::{fs, path::PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Render a story's emotional arc with its text laid along the curve", long_about = None)]
struct Args {
    /// Story components JSON file
    story: PathBuf,

    /// Engine configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Output directory for the debug render
    #[arg(short, long, default_value = "figs")]
    out_dir: PathBuf,

    /// Font size used to measure and stamp the descriptor text
    #[arg(long, default_value_t = 28.0)]
    font_px: f32,

    /// Also write the fitted geometry back into the story JSON
    #[arg(long)]
    update_story: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        EngineConfig::load_from_file(&args.config)?
    } else {
        warn!(
            "config file {} not found; using defaults",
            args.config.display()
        );
        EngineConfig::default()
    };

    let raw = fs::read_to_string(&args.story)
        .with_context(|| format!("reading story file {}", args.story.display()))?;
    let mut components: Vec<StoryComponent> =
        serde_json::from_str(&raw).context("parsing story components")?;
    info!("loaded {} story components", components.len());

    let shaper = FontShaper::system(args.font_px)?;
    let layout = layout_story(&components, &shaper, &config)?;

    for segment in &layout.segments {
        if let Some(placement) = &segment.placement {
            info!(
                "segment ending at component {}: {} glyph(s), {:?}",
                segment.component_index,
                placement.glyphs.len(),
                placement.status
            );
        }
    }

    fs::create_dir_all(&args.out_dir)?;
    let stem = args
        .story
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "story".to_string());
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let png_path = args.out_dir.join(format!("{stem}_{timestamp}.png"));
    render_story(&layout, &config, args.font_px, &png_path)?;
    info!("wrote {}", png_path.display());

    let layout_path = args.out_dir.join(format!("{stem}_{timestamp}.json"));
    fs::write(&layout_path, serde_json::to_string_pretty(&layout)?)?;
    info!("wrote {}", layout_path.display());

    if args.update_story {
        write_back_cache(&mut components, &layout);
        fs::write(&args.story, serde_json::to_string_pretty(&components)?)?;
        info!("updated geometry cache in {}", args.story.display());
    }

    Ok(())
}
