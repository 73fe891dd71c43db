use airport_index::{default_index, lookup_iata, AirportIndex, SharedIndex};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Explicit index from a known file
    let path = Path::new("./data/airports-latest.csv");
    let index = AirportIndex::from_path(path).await?;
    if let Some(jfk) = index.get("jfk") {
        println!(
            "{} ({}) at {:.4},{:.4} elevation={:?}",
            jfk.name, jfk.iata_code, jfk.latitude_deg, jfk.longitude_deg, jfk.elevation_ft
        );
    }

    // Injectable handle that can be reloaded later
    let shared = SharedIndex::new(index);
    shared.reload_from_path(path).await?;
    println!("shared handle holds {} airports", shared.snapshot().len());

    // Process-wide default, honours AIRPORTS_CSV_PATH
    if let Err(err) = default_index().await {
        eprintln!("default index unavailable: {err}");
    }
    match lookup_iata("LHR").await {
        Some(lhr) => println!("{} in {}", lhr.name, lhr.municipality),
        None => println!("LHR not found"),
    }
    Ok(())
}
