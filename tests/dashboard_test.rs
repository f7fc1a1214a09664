use color_eyre::Result;
use pitchboard::dashboard::{compute_dashboard, DashboardOptions, Selections, Skill};
use pitchboard::dataset::Dataset;
use polars::prelude::*;

fn sample_dataset() -> Result<Dataset> {
    let frame = df!(
        "Name" => &["Neymar", "Coutinho", "Casemiro", "Willian", "H. Kane", "D. Alli"],
        "Nationality" => &["Brazil", "Brazil", "Brazil", "Brazil", "England", "England"],
        "Club" => &["PSG", "Liverpool", "Real Madrid", "Chelsea", "Spurs", "Spurs"],
        "Age" => &[25i64, 25, 25, 28, 23, 21],
        "Overall" => &[92i64, 86, 85, 83, 86, 84],
        "Potential" => &[94i64, 89, 88, 83, 90, 89],
        "Preferred Positions" => &[Some("LW ST"), Some("CM CAM"), Some("CDM"), None, Some("ST"), Some("CAM")],
        // Strings on purpose: the raw file mixes numbers and junk
        "Ball control" => &["95", "89", "83", "87", "84", "85"],
        "Dribbling" => &["96", "90", "62+2", "88", "75", "84"],
        "Finishing" => &["89", "76", "59", "70", "91", "77"],
        "Acceleration" => &["94", "88", "67", "89", "68", "80"],
        "Sprint speed" => &["90", "81", "70", "85", "71", "76"],
        "Stamina" => &["81", "77", "86", "79", "83", "88"],
        "Strength" => &["53", "54", "86", "65", "84", "68"],
    )?;
    Dataset::from_frame(frame)
}

#[test]
fn default_selections_produce_all_views() -> Result<()> {
    let dataset = sample_dataset()?;
    let view = compute_dashboard(&dataset, &Selections::default(), &DashboardOptions::default())?;

    assert_eq!(view.nationality, "Brazil");
    assert_eq!(view.skill, "Dribbling");

    // Four Brazilian rows in the table, skill column included
    assert_eq!(view.players_table.rows.len(), 4);
    assert!(view.players_table.columns.contains(&"Dribbling".to_string()));

    // Top players sorted descending; Casemiro's "62+2" coerced to missing
    // and therefore last
    assert_eq!(view.top_players.len(), 4);
    assert_eq!(view.top_players.labels[0], "Neymar");
    assert_eq!(view.top_players.values[0], 96.0);
    assert_eq!(view.top_players.labels[3], "Casemiro");
    assert!(view.top_players.values[3].is_nan());

    // Position tokens: LW ST / CM CAM / CDM / missing
    let total: u64 = view.positions.iter().map(|p| p.count).sum();
    assert_eq!(total, 6);
    assert!(view.positions.iter().any(|p| p.position == "Unknown"));

    // Age histogram over the 4 Brazilian ages
    let binned: u32 = view.age_histogram.counts.iter().sum();
    assert_eq!(binned, 4);

    assert_eq!(view.potential_vs_age.points.len(), 4);

    // Correlation matrix: symmetric, unit diagonal, all fixed columns present
    let matrix = &view.skill_correlation;
    assert_eq!(matrix.columns.len(), 10);
    for i in 0..matrix.columns.len() {
        assert_eq!(matrix.values[i][i], 1.0);
        for j in 0..matrix.columns.len() {
            let a = matrix.values[i][j];
            let b = matrix.values[j][i];
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }

    // No player pair selected
    assert!(view.head_to_head.is_none());
    Ok(())
}

#[test]
fn top_players_scenario_two_best_dribblers() -> Result<()> {
    // Dribbling [96, 90, missing, 88] for Brazil: top 2 must be the two
    // highest, in that order
    let dataset = sample_dataset()?;
    let mut selections = Selections::default();
    selections.skill = Skill::Dribbling;
    let view = compute_dashboard(&dataset, &selections, &DashboardOptions::default())?;
    assert_eq!(&view.top_players.labels[..2], &["Neymar", "Coutinho"]);
    assert_eq!(&view.top_players.values[..2], &[96.0, 90.0]);
    Ok(())
}

#[test]
fn unmatched_nationality_yields_empty_views() -> Result<()> {
    let dataset = sample_dataset()?;
    let selections = Selections {
        nationality: "Atlantis".to_string(),
        ..Selections::default()
    };
    let view = compute_dashboard(&dataset, &selections, &DashboardOptions::default())?;
    assert!(view.players_table.rows.is_empty());
    assert!(view.top_players.is_empty());
    assert!(view.positions.is_empty());
    assert!(view.age_histogram.counts.is_empty());
    assert!(view.potential_vs_age.points.is_empty());
    assert!(view.club_performance.is_empty());
    Ok(())
}

#[test]
fn head_to_head_compares_selected_players() -> Result<()> {
    let dataset = sample_dataset()?;
    let selections = Selections {
        player_a: Some("Neymar".to_string()),
        player_b: Some("Coutinho".to_string()),
        ..Selections::default()
    };
    let view = compute_dashboard(&dataset, &selections, &DashboardOptions::default())?;
    let radar = view.head_to_head.expect("both players exist");
    assert_eq!(radar.attributes.len(), 6);
    assert_eq!(radar.players[0].name, "Neymar");
    assert_eq!(radar.players[0].values[0], 95.0); // Ball control
    assert_eq!(radar.players[1].values[1], 90.0); // Dribbling
    Ok(())
}

#[test]
fn head_to_head_unknown_player_renders_placeholder() -> Result<()> {
    let dataset = sample_dataset()?;
    let selections = Selections {
        player_a: Some("Neymar".to_string()),
        player_b: Some("NonexistentPlayer".to_string()),
        ..Selections::default()
    };
    let view = compute_dashboard(&dataset, &selections, &DashboardOptions::default())?;
    assert!(view.head_to_head.is_none());
    Ok(())
}

#[test]
fn club_performance_respects_min_group_size() -> Result<()> {
    let dataset = sample_dataset()?;
    let selections = Selections {
        nationality: "England".to_string(),
        ..Selections::default()
    };
    // Spurs has two English players; min size 2 keeps it, 3 drops it
    let options = DashboardOptions {
        min_club_group_size: 2,
        ..DashboardOptions::default()
    };
    let view = compute_dashboard(&dataset, &selections, &options)?;
    assert_eq!(view.club_performance.len(), 1);
    assert_eq!(view.club_performance[0].group, "Spurs");
    assert_eq!(view.club_performance[0].count, 2);
    assert!((view.club_performance[0].mean - 85.0).abs() < 1e-9);

    let options = DashboardOptions {
        min_club_group_size: 3,
        ..DashboardOptions::default()
    };
    let view = compute_dashboard(&dataset, &selections, &options)?;
    assert!(view.club_performance.is_empty());
    Ok(())
}

#[test]
fn base_table_unchanged_after_computation() -> Result<()> {
    let dataset = sample_dataset()?;
    assert_eq!(
        dataset.frame().column("Dribbling")?.dtype(),
        &DataType::String
    );
    let _ = compute_dashboard(&dataset, &Selections::default(), &DashboardOptions::default())?;
    // Coercion must never write back into the shared base table
    assert_eq!(
        dataset.frame().column("Dribbling")?.dtype(),
        &DataType::String
    );
    Ok(())
}

#[test]
fn view_serializes_to_json() -> Result<()> {
    let dataset = sample_dataset()?;
    let view = compute_dashboard(&dataset, &Selections::default(), &DashboardOptions::default())?;
    let json = serde_json::to_string(&view)?;
    assert!(json.contains("\"players_table\""));
    assert!(json.contains("\"skill_correlation\""));
    // NaN values must serialize as null, not break the payload
    assert!(json.contains("null"));
    Ok(())
}
