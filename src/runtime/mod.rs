use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::config::RankingConfig;
use crate::io;
use crate::operators::{self, Aggregator, Row};

mod manifest;
pub use manifest::Manifest;

/// Outcome of one pass over the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRun {
    pub lines_read: usize,
    pub matched_rows: usize,
    pub ignored_rows: usize,
    pub regions: usize,
    /// Rendered ranking entries, best rank first.
    pub ranking: Vec<String>,
}

/// Read the configured input file, rank it and write the manifest if one is
/// requested.
pub fn run_ranking(config: &RankingConfig) -> Result<RankingRun> {
    info!("Running pipeline: {}", config.name);
    info!("Reading input from: {}", config.input.path);

    let lines = io::read_data_source(&config.input.path)?;
    let run = rank_lines(lines, config)
        .with_context(|| format!("Failed to rank {}", config.input.path))?;

    info!(
        "Ranked {} regions ({} rows matched, {} ignored, {} lines read)",
        run.regions, run.matched_rows, run.ignored_rows, run.lines_read
    );

    if let Some(manifest_path) = &config.output.manifest {
        let manifest = Manifest {
            pipeline_name: config.name.clone(),
            input_path: config.input.path.clone(),
            base_year: config.years.base,
            target_year: config.years.target,
            lines_read: run.lines_read,
            matched_rows: run.matched_rows,
            ignored_rows: run.ignored_rows,
            regions: run.regions,
            ranking: run.ranking.clone(),
        };
        manifest.write_to_file(manifest_path)?;
        info!("Manifest written to: {}", manifest_path);
    }

    Ok(run)
}

/// Aggregate the lines in order, then finalize and render the ranking once the
/// source is drained.
pub fn rank_lines<I>(lines: I, config: &RankingConfig) -> Result<RankingRun>
where
    I: IntoIterator<Item = Result<String>>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} lines")?,
    );

    let mut aggregator = Aggregator::new(config.years);
    let mut lines_read = 0;
    for line in lines {
        let line = line?;
        lines_read += 1;
        let row = Row::parse(&line, &config.columns);
        if !aggregator.push(row) {
            debug!("line {}: ignored", lines_read);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let matched_rows = aggregator.matched_rows();
    let ignored_rows = aggregator.ignored_rows();
    for (region, aggregate) in aggregator.table().iter() {
        debug!(
            "{}: {} => {}",
            region, aggregate.base_population, aggregate.target_population
        );
    }

    let table = aggregator.into_table();
    if table.is_empty() {
        info!(
            "No rows for {} or {}, ranking is empty",
            config.years.base, config.years.target
        );
    }
    let regions = table.len();
    let ranking = operators::finalize(table);

    Ok(RankingRun {
        lines_read,
        matched_rows,
        ignored_rows,
        regions,
        ranking: operators::render_ranking(&ranking),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn lines(input: &[&str]) -> Vec<Result<String>> {
        input.iter().map(|l| Ok(l.to_string())).collect()
    }

    #[test]
    fn ranks_two_regions() {
        let run = rank_lines(
            lines(&["2010,A,_,100", "2015,A,_,200", "2010,B,_,50", "2015,B,_,25"]),
            &RankingConfig::default(),
        )
        .unwrap();
        assert_eq!(
            run.ranking,
            vec!["1位B:50=>25 変化率:0.5", "2位A:100=>200 変化率:2"]
        );
        assert_eq!(run.lines_read, 4);
        assert_eq!(run.matched_rows, 4);
        assert_eq!(run.regions, 2);
    }

    #[test]
    fn empty_input_gives_empty_ranking() {
        let run = rank_lines(lines(&[]), &RankingConfig::default()).unwrap();
        assert!(run.ranking.is_empty());
        assert_eq!(run.lines_read, 0);
        assert_eq!(
            operators::emit(&run.ranking, OutputFormat::Json).unwrap(),
            "[]"
        );
    }

    #[test]
    fn header_and_other_years_are_skipped() {
        let run = rank_lines(
            lines(&[
                "集計年,都道府県名,10〜14歳の人口,15〜19歳の人口",
                "1995,北海道,1,2",
                "2010,北海道,237155,258530",
                "2015,北海道,219245,231747",
                "",
            ]),
            &RankingConfig::default(),
        )
        .unwrap();
        assert_eq!(run.ignored_rows, 3);
        assert_eq!(run.matched_rows, 2);
        assert_eq!(run.regions, 1);
        assert_eq!(
            run.ranking,
            vec!["1位北海道:258530=>231747 変化率:0.8964027385603218"]
        );
    }

    #[test]
    fn missing_base_year_renders_infinity() {
        let run = rank_lines(
            lines(&["2015,A,_,10", "2010,B,_,10"]),
            &RankingConfig::default(),
        )
        .unwrap();
        assert_eq!(
            run.ranking,
            vec!["1位B:10=>0 変化率:0", "2位A:0=>10 変化率:Infinity"]
        );
    }

    #[test]
    fn read_error_stops_the_run() {
        let input = vec![
            Ok("2010,A,_,1".to_string()),
            Err(anyhow::anyhow!("disk gone")),
        ];
        assert!(rank_lines(input, &RankingConfig::default()).is_err());
    }

    #[test]
    fn runs_from_file_and_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("popu-pref.csv");
        std::fs::write(&input, "2010,A,_,100\n2015,A,_,200\n2010,B,_,50\n2015,B,_,25\n").unwrap();
        let manifest_path = dir.path().join("out/manifest.json");

        let mut config = RankingConfig::default();
        config.input.path = input.to_string_lossy().to_string();
        config.output.manifest = Some(manifest_path.to_string_lossy().to_string());

        let run = run_ranking(&config).unwrap();
        assert_eq!(run.ranking.len(), 2);

        let manifest: Manifest =
            serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
        assert_eq!(manifest.base_year, 2010);
        assert_eq!(manifest.target_year, 2015);
        assert_eq!(manifest.lines_read, 4);
        assert_eq!(manifest.regions, 2);
        assert_eq!(manifest.ranking, run.ranking);
    }

    #[test]
    fn missing_input_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RankingConfig::default();
        config.input.path = dir.path().join("nope.csv").to_string_lossy().to_string();

        let err = run_ranking(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to open input file"));
    }
}
