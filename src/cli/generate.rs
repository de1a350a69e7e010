use serde::Serialize;
use tracing::info;

use super::Generate;
use crate::{
    errors::Result,
    framework::Config,
    square::{
        daily::{seed_from_date, today},
        PuzzleGrid, SquareGenerator,
    },
};

#[derive(Serialize)]
struct Output<'a> {
    date: Option<chrono::NaiveDate>,
    #[serde(flatten)]
    grid: &'a PuzzleGrid,
}

pub fn generate(config: &Config, args: &Generate) -> Result {
    let date = match args.seed {
        Some(_) => None,
        None => Some(args.date.unwrap_or_else(today)),
    };
    let seed = args
        .seed
        .or_else(|| date.map(|date| seed_from_date(date, args.size)))
        .unwrap_or_default();

    let words = config.words_list()?;
    let grid = SquareGenerator::new(&words)
        .with_max_attempts(config.generator.max_attempts)
        .generate_or_fallback(args.size, seed);

    info!(seed, fallback = grid.is_fallback(), "generated");

    if args.json {
        let output = Output { date, grid: &grid };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{grid}");
        println!("{}", grid.border());
    }

    Ok(())
}
