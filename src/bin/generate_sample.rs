use anyhow::Result;
use rust_xlsxwriter::Workbook;

use courtside::data::columns::STAT_SUFFIXES;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One output cell, typed so the xlsx keeps numbers numeric.
enum Cell {
    Text(String),
    Int(i64),
    Number(f64),
}

impl Cell {
    fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Number(v) => format!("{v}"),
        }
    }
}

/// Baseline per-minute production rates used to derive plausible stat lines.
fn rate_for(suffix: &str) -> f64 {
    match suffix {
        "PTS" => 0.45,
        "DR" => 0.15,
        "OR" => 0.08,
        "REB" => 0.23,
        "AST" => 0.10,
        "STL" => 0.04,
        "BLK" => 0.03,
        "BLKON" => 0.02,
        "FOUL" => 0.09,
        "FOULON" => 0.08,
        "TO" => 0.07,
        "FGM" => 0.17,
        "FGA" => 0.38,
        "2PM" => 0.12,
        "2PA" => 0.25,
        "3PM" => 0.05,
        "3PA" => 0.13,
        "FTM" => 0.09,
        "FTA" => 0.12,
        _ => 0.0,
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let players: [(&str, &str, &str, &str, &str); 10] = [
        ("Alice", "Anderson", "Female", "Melbourne Falcons", "Senior"),
        ("Bree", "Okafor", "Female", "Melbourne Falcons", "Senior"),
        ("Carla", "Nguyen", "Female", "Geelong Gulls", "Junior"),
        ("Daniela", "Rossi", "Female", "Geelong Gulls", "Senior"),
        ("Ethan", "Walker", "Male", "Ballarat Miners", "Senior"),
        ("Felix", "Hart", "Male", "Ballarat Miners", "Junior"),
        ("Giorgos", "Pappas", "Male", "Bendigo Braves", "Senior"),
        ("Hugo", "Lindqvist", "Male", "Bendigo Braves", "Senior"),
        ("Isla", "McArthur", "Female", "Melbourne Falcons", "Junior"),
        ("Jack", "O'Neill", "Male", "Geelong Gulls", "Senior"),
    ];
    let seasons = [2019i64, 2020, 2021, 2022, 2023];

    // Header: identity/context columns, then the raw, per-minute, and
    // per-40-minute stat families.
    let mut headers: Vec<String> = [
        "FIBA ID Number",
        "First Name",
        "Family Name",
        "Gender",
        "Club Name",
        "Competition Name",
        "Equivalent Competition",
        "Level",
        "Season",
        "GP",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for prefix in ["", "scaled", "adjusted"] {
        for suffix in STAT_SUFFIXES {
            headers.push(format!("{prefix}{suffix}"));
        }
    }

    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for (p_idx, (first, family, gender, club, level)) in players.iter().enumerate() {
        let (competition, equivalent) = if *level == "Senior" {
            ("Victorian Championship", "Championship")
        } else {
            ("Metro League", "Division 1")
        };

        for &season in &seasons {
            // Not every player appears in every season.
            if rng.next_f64() < 0.25 {
                continue;
            }

            let gp = 8 + (rng.next_f64() * 16.0) as i64;
            let minutes = gp as f64 * (14.0 + rng.next_f64() * 18.0);

            let mut row = vec![
                Cell::Int(100_000 + p_idx as i64),
                Cell::Text(first.to_string()),
                Cell::Text(family.to_string()),
                Cell::Text(gender.to_string()),
                Cell::Text(club.to_string()),
                Cell::Text(competition.to_string()),
                Cell::Text(equivalent.to_string()),
                Cell::Text(level.to_string()),
                Cell::Int(season),
                Cell::Int(gp),
            ];

            // Per-minute rates for this season, then the three families.
            let rates: Vec<f64> = STAT_SUFFIXES
                .iter()
                .map(|suffix| {
                    if *suffix == "MIN" {
                        1.0
                    } else {
                        (rate_for(suffix) * (1.0 + rng.gauss(0.0, 0.2))).max(0.0)
                    }
                })
                .collect();

            for &rate in &rates {
                row.push(Cell::Number((rate * minutes).round()));
            }
            for &rate in &rates {
                row.push(Cell::Number((rate * 1000.0).round() / 1000.0));
            }
            for &rate in &rates {
                row.push(Cell::Number((rate * 40.0 * 100.0).round() / 100.0));
            }

            rows.push(row);
        }
    }

    // ---- CSV ----
    let csv_path = "sample_stats.csv";
    let mut wtr = csv::Writer::from_path(csv_path)?;
    wtr.write_record(&headers)?;
    for row in &rows {
        wtr.write_record(row.iter().map(Cell::text))?;
    }
    wtr.flush()?;

    // ---- XLSX ----
    let xlsx_path = "sample_stats.xlsx";
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header.as_str())?;
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32 + 1, c as u16);
            match cell {
                Cell::Text(s) => worksheet.write_string(r, c, s)?,
                Cell::Int(i) => worksheet.write_number(r, c, *i as f64)?,
                Cell::Number(v) => worksheet.write_number(r, c, *v)?,
            };
        }
    }
    workbook.save(xlsx_path)?;

    println!(
        "Wrote {} stat lines ({} columns each) to {csv_path} and {xlsx_path}",
        rows.len(),
        headers.len()
    );
    Ok(())
}
