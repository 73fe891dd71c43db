use clap::{Arg, Command};
use std::io::{self, Write};

const HEADER: &str = "id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,continent,\
iso_country,iso_region,municipality,scheduled_service,icao_code,iata_code,gps_code,\
local_code,home_link,wikipedia_link,keywords";

const TYPES: [&str; 4] = ["small_airport", "medium_airport", "large_airport", "heliport"];

/// Three uppercase letters for `n`, cycling through the 17,576 combinations.
fn iata_for(n: u64) -> String {
    let n = n % (26 * 26 * 26);
    let letter = |k: u64| char::from(b'A' + k as u8);
    [letter(n / 676), letter(n / 26 % 26), letter(n % 26)]
        .iter()
        .collect()
}

fn main() -> anyhow::Result<()> {
    let matches = Command::new("gen")
        .about("Emit a synthetic OurAirports-shaped CSV on stdout")
        .arg(
            Arg::new("rows")
                .long("rows")
                .value_parser(clap::value_parser!(u64))
                .required(true),
        )
        .arg(
            Arg::new("iata_every")
                .long("iata-every")
                .help("Give every Nth row an IATA code")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("5"),
        )
        .arg(
            Arg::new("with_header")
                .long("with-header")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let rows: u64 = matches.get_one("rows").copied().unwrap_or_default();
    let iata_every: u64 = matches.get_one("iata_every").copied().unwrap_or(5);
    let with_header = matches.get_flag("with_header");

    let mut out = io::BufWriter::new(io::stdout().lock());

    if with_header {
        writeln!(&mut out, "{HEADER}")?;
    }

    // Deterministic rows; every row quotes the name and keywords to exercise the quoting path
    for i in 0..rows {
        let id = i + 1;
        let kind = TYPES[(i % TYPES.len() as u64) as usize];
        let iata = if i % iata_every == 0 {
            iata_for(i / iata_every)
        } else {
            String::new()
        };
        let lat = -90.0 + (i % 18_000) as f64 / 100.0;
        let lon = -180.0 + (i % 36_000) as f64 / 100.0;
        let elevation = if i % 7 == 0 {
            String::new()
        } else {
            (i % 9_000).to_string()
        };
        let scheduled = if i % 3 == 0 { "yes" } else { "no" };

        writeln!(
            &mut out,
            "{id},GEN{id:07},{kind},\"Airport {id}, Synthetic\",{lat:.4},{lon:.4},{elevation},XX,\
XX,XX-00,Town {id},{scheduled},GEN{id:07},{iata},,,,,\"gen, row {id}\""
        )?;
        if i % 10_000 == 0 {
            out.flush()?;
        }
    }

    out.flush()?;
    Ok(())
}
