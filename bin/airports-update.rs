use airport_index::fetch::{fetch_dataset, http_client, FetchOptions, DEFAULT_OUT_DIR, DEFAULT_URL};
use airport_index::logging::init_logging;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("airports-update")
        .about("Download the OurAirports CSV and refresh airports-latest.csv")
        .arg(
            Arg::new("out")
                .long("out")
                .help("Output directory for airports CSV files")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(DEFAULT_OUT_DIR),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .help("OurAirports CSV URL")
                .default_value(DEFAULT_URL),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"))?;

    let mut options = FetchOptions::default();
    if let Some(out) = matches.get_one::<PathBuf>("out") {
        options.out_dir = out.clone();
    }
    if let Some(url) = matches.get_one::<String>("url") {
        options.url = url.clone();
    }

    let client = http_client()?;
    let report = fetch_dataset(&client, &options).await?;

    println!(
        "saved={} latest={} bytes={} crc32=0x{:08x}",
        report.path.display(),
        report.latest.display(),
        report.bytes,
        report.crc32
    );
    Ok(())
}
