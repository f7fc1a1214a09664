use clap::Parser;
use color_eyre::Result;
use pitchboard::cli::Args;
use pitchboard::config::AppConfig;
use pitchboard::dashboard::compute_dashboard;
use pitchboard::dataset::{Dataset, LoadOptions};

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    let config = AppConfig::load_or_default(args.config.as_deref())?;

    let options = LoadOptions::from(&args);
    let dataset = Dataset::load(&args.path, &options)?;

    if args.list_nationalities {
        for nationality in dataset.distinct_nationalities()? {
            println!("{nationality}");
        }
        return Ok(());
    }

    let mut selections = config.selections();
    if let Some(nationality) = args.nationality {
        selections.nationality = nationality;
    }
    if let Some(skill) = args.skill {
        selections.skill = skill;
    }
    if let Some(club_metric) = args.club_metric {
        selections.club_metric = club_metric;
    }
    selections.player_a = args.player_a;
    selections.player_b = args.player_b;

    let view = compute_dashboard(&dataset, &selections, &config.dashboard_options())?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{json}");
    Ok(())
}
