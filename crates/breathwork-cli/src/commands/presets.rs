use breathwork_core::timer::builtin_presets;
use breathwork_core::{Config, PatternConfig};
use serde::Serialize;

#[derive(Serialize)]
struct PresetRow {
    name: String,
    source: &'static str,
    description: String,
    pattern: PatternConfig,
}

fn rows(config: &Config) -> Vec<PresetRow> {
    let mut rows: Vec<PresetRow> = builtin_presets()
        .into_iter()
        .filter(|p| !config.presets.contains_key(p.name))
        .map(|p| PresetRow {
            name: p.name.to_string(),
            source: "builtin",
            description: p.description.to_string(),
            pattern: PatternConfig {
                total: config.pattern.total,
                ..PatternConfig::from(p.phases)
            },
        })
        .collect();
    rows.extend(config.presets.iter().map(|(name, pattern)| PresetRow {
        name: name.clone(),
        source: "user",
        description: String::new(),
        pattern: *pattern,
    }));
    rows
}

fn format_pattern(p: &PatternConfig) -> String {
    format!("{}/{}/{}/{}", p.inhale, p.hold_full, p.exhale, p.hold_empty)
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let rows = rows(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let default = config.default_preset.as_deref();
    for row in &rows {
        let marker = if Some(row.name.as_str()) == default { "*" } else { " " };
        println!(
            "{marker} {:<10} {:<16} {:<8} {}",
            row.name,
            format_pattern(&row.pattern),
            row.source,
            row.description
        );
    }
    Ok(())
}
