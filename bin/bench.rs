use airport_index::logging::init_logging;
use airport_index::AirportIndex;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::time::Instant;

fn per_second(count: u64, secs: f64) -> f64 {
    count as f64 / secs.max(f64::EPSILON)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("bench")
        .about("Time an airport index build and a batch of lookups")
        .arg(
            Arg::new("path")
                .long("path")
                .help("Airports CSV (.csv, .csv.gz or .csv.zst)")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("lookups")
                .long("lookups")
                .help("Number of lookups to time after the build")
                .value_parser(clap::value_parser!(u64))
                .default_value("1000000"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"))?;

    let path = matches
        .get_one::<PathBuf>("path")
        .ok_or_else(|| anyhow::anyhow!("Provide --path <file>"))?;
    let lookups = matches.get_one::<u64>("lookups").copied().unwrap_or(0);

    let start = Instant::now();
    let index = AirportIndex::from_path(path).await?;
    let build_secs = start.elapsed().as_secs_f64();

    let mut codes: Vec<String> = index.iter().map(|a| a.iata_code.to_ascii_lowercase()).collect();
    codes.sort_unstable();
    codes.push("???".to_string());

    let start = Instant::now();
    let mut hits = 0u64;
    for i in 0..lookups {
        let code = &codes[(i as usize) % codes.len()];
        if index.get(code).is_some() {
            hits += 1;
        }
    }
    let lookup_secs = start.elapsed().as_secs_f64();

    println!(
        "source={} airports={} build={:.3}s airports/sec={:.0}\nlookups={} hits={} lookups/sec={:.0}",
        path.display(),
        index.len(),
        build_secs,
        per_second(index.len() as u64, build_secs),
        lookups,
        hits,
        per_second(lookups, lookup_secs)
    );
    Ok(())
}
