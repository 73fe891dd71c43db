use airport_index::{AirportIndex, LoadError};
use async_compression::tokio::write::{GzipEncoder, ZstdEncoder};
use std::{fs::File, io::Write, path::Path};
use tokio::io::AsyncWriteExt;

const SAMPLE: &str = r#""id","ident","type","name","latitude_deg","longitude_deg","elevation_ft","continent","iso_country","iso_region","municipality","scheduled_service","icao_code","iata_code","gps_code","local_code","home_link","wikipedia_link","keywords"
3622,"KJFK","large_airport","John F Kennedy International Airport",40.639447,-73.779317,13,"NA","US","US-NY","New York","yes","KJFK","JFK","KJFK","JFK","https://www.jfkairport.com/","https://en.wikipedia.org/wiki/John_F._Kennedy_International_Airport","Manhattan, New York City, NYC, Idlewild"
2434,"EGLL","large_airport","London Heathrow Airport",51.4706,-0.461941,83,"EU","GB","GB-ENG","London","yes","EGLL","LHR","EGLL",,"http://www.heathrowairport.com/","https://en.wikipedia.org/wiki/Heathrow_Airport","LON, Londres"
6523,"00A","heliport","Total RF Heliport",40.070985,-74.933689,11,"NA","US","US-PA","Bensalem","no",,,"K00A","00A",,,
4185,"LFPG","large_airport","Charles de Gaulle International Airport",49.012798,2.55,392,"EU","FR","FR-IDF","Paris","yes","LFPG","CDG","LFPG",,"http://www.aeroportsdeparis.fr/","https://en.wikipedia.org/wiki/Charles_de_Gaulle_Airport","PAR, Aéroport Roissy-Charles de Gaulle"
26434,"VHHH","large_airport","Hong Kong International Airport",22.308901,113.915001,,"AS","HK","HK-U-A","Hong Kong","1","VHHH","hkg","VHHH",,"http://www.hongkongairport.com/","https://en.wikipedia.org/wiki/Hong_Kong_International_Airport","Chek Lap Kok Airport"
"#;

fn write_plain(path: &Path) -> anyhow::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(SAMPLE.as_bytes())?;
    Ok(())
}

fn assert_sample(index: &AirportIndex) {
    assert_eq!(index.len(), 4);

    let jfk = index.get("jfk").expect("JFK indexed");
    assert_eq!(jfk.id, 3622);
    assert_eq!(jfk.icao_code, "KJFK");
    assert_eq!(jfk.elevation_ft, Some(13));
    assert!(jfk.has_scheduled_service);
    assert_eq!(jfk.keywords, "Manhattan, New York City, NYC, Idlewild");

    let cdg = index.get("CDG").expect("CDG indexed");
    assert_eq!(cdg.municipality, "Paris");
    assert!((cdg.longitude_deg - 2.55).abs() < 1e-9);

    let hkg = index.get("HKG").expect("lowercase source code is uppercased");
    assert_eq!(hkg.iata_code, "HKG");
    assert_eq!(hkg.elevation_ft, None);
    assert!(hkg.has_scheduled_service);

    // The heliport has no IATA code
    assert!(index.iter().all(|a| a.ident != "00A"));
}

#[tokio::test]
async fn builds_from_plain_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = dir.path().join("airports-latest.csv");
    write_plain(&csv_path)?;

    let index = AirportIndex::from_path(&csv_path).await?;
    assert_sample(&index);
    Ok(())
}

#[tokio::test]
async fn builds_from_gzip_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let gz_path = dir.path().join("airports.csv.gz");

    let mut encoder = GzipEncoder::new(tokio::fs::File::create(&gz_path).await?);
    encoder.write_all(SAMPLE.as_bytes()).await?;
    encoder.shutdown().await?;

    let index = AirportIndex::from_path(&gz_path).await?;
    assert_sample(&index);
    Ok(())
}

#[tokio::test]
async fn builds_from_zstd_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let zst_path = dir.path().join("airports.csv.zst");

    let mut encoder = ZstdEncoder::new(tokio::fs::File::create(&zst_path).await?);
    encoder.write_all(SAMPLE.as_bytes()).await?;
    encoder.shutdown().await?;

    let index = AirportIndex::from_path(&zst_path).await?;
    assert_sample(&index);
    Ok(())
}

#[tokio::test]
async fn missing_file_is_a_load_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let err = AirportIndex::from_path(dir.path().join("absent.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }));
    assert!(err.to_string().contains("absent.csv"));
    Ok(())
}

#[tokio::test]
async fn empty_file_is_a_load_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = dir.path().join("empty.csv");
    File::create(&csv_path)?;

    let err = AirportIndex::from_path(&csv_path).await.unwrap_err();
    assert!(matches!(err, LoadError::MissingHeader));
    Ok(())
}
