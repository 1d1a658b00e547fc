//! SkyStation Headless Accounting Harness
//!
//! Runs hourly accounting cycles against a demo (or loaded) station and
//! validates the engine's invariants after every cycle. Runs entirely
//! in-process: no storage layer, no scheduler, no rendering.
//!
//! Usage:
//!   cargo run -p skystation-simtest
//!   cargo run -p skystation-simtest -- --hours 336 --seed 7 --verbose
//!   cargo run -p skystation-simtest -- --station station.json --settings settings.json --dump

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use skystation_logic::accounting::{run_accounting_cycle, AccountingContext};
use skystation_logic::air::{AirComposition, AirQuality};
use skystation_logic::biobox::{BioBox, BioBoxMode};
use skystation_logic::constants::humans::{LIFE_EXPECTANCY_MAX, LIFE_EXPECTANCY_MIN};
use skystation_logic::events::{EventLog, GameEvent};
use skystation_logic::modules::{BioModule, HabModule, LabModule};
use skystation_logic::people::{Activity, ActivityKind, Person, Skill};
use skystation_logic::peripherals::{Peripheral, PeripheralType};
use skystation_logic::resources::{
    Antenna, Battery, Ingredient, SolarPanel, StorageBox, Tank, TankType,
};
use skystation_logic::settings::AccountingSettings;
use skystation_logic::station::Station;
use skystation_logic::truss::Truss;
use skystation_logic::wallet::Player;

// ── Options ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "skystation-simtest")]
#[command(about = "Run hourly accounting cycles and check the station invariants")]
struct Options {
    /// Number of hourly cycles to run
    #[arg(long, default_value = "168")]
    hours: u32,

    /// Seed for the accounting random source
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Load the station from a JSON file instead of the demo station
    #[arg(long)]
    station: Option<PathBuf>,

    /// Load accounting settings from a JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the final station as JSON
    #[arg(long)]
    dump: bool,

    /// Show every check and per-cycle problem, and trace the phases
    #[arg(short, long)]
    verbose: bool,
}

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug)]
enum HarnessError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for HarnessError {
    fn from(e: std::io::Error) -> Self {
        HarnessError::Io(e)
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        HarnessError::Json(e)
    }
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarnessError::Io(e) => write!(f, "IO error: {}", e),
            HarnessError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for HarnessError {}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, HarnessError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

// ── Logging ─────────────────────────────────────────────────────────────

/// Engine `log` records are forwarded into the subscriber. `RUST_LOG`
/// wins over `--verbose` when set.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let options = Options::parse();
    init_logging(options.verbose);
    println!("=== SkyStation Accounting Harness ===\n");

    let settings = match &options.settings {
        Some(path) => load_json(path),
        None => Ok(AccountingSettings::default()),
    };
    let station = match &options.station {
        Some(path) => load_json(path),
        None => Ok(demo_station(demo_start())),
    };
    let (settings, station) = match (settings, station) {
        (Ok(settings), Ok(station)) => (settings, station),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let mut results = Vec::new();

    // 1. Air model
    results.extend(validate_air_model());

    // 2. Resource store
    results.extend(validate_resource_store());

    // 3. Hourly accounting run
    let mut run_station = station.clone();
    results.extend(run_cycles(&mut run_station, &settings, &options));

    // 4. Reproducibility
    results.extend(validate_reproducible(&station, &settings, &options));

    if options.dump {
        match serde_json::to_string_pretty(&run_station) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("could not dump station: {}", e),
        }
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Demo station ────────────────────────────────────────────────────────

fn demo_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2040, 3, 5, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Two habitation modules, a lab and a bio module, wired with the full
/// life-support chain.
fn demo_station(start: DateTime<Utc>) -> Station {
    let mut station = Station::new(start);

    let mut alpha = HabModule::new(1, "Hab Alpha", 4);
    alpha.inhabitants = vec![
        Person::new(1, "Ines Okafor", 34),
        Person::new(2, "Tomas Lind", 51),
    ];
    let mut student = Person::new(3, "Mei Arada", 23);
    student.activity = Some(Activity {
        name: "Botany course".into(),
        kind: ActivityKind::Study(Skill::Biologic),
        started_at: start,
        ends_at: start + chrono::Duration::hours(30),
    });
    let mut beta = HabModule::new(2, "Hab Beta", 4);
    beta.inhabitants = vec![student, Person::new(4, "Rafael Duarte", 67)];
    station.hab_modules = vec![alpha, beta];

    station.lab_modules.push(LabModule {
        id: 3,
        name: "Lab".into(),
    });

    let mut grower = BioBox::new(1, "ABCD", 40);
    grower.population = vec!["FACE".into(), "BEAD".into()];
    let mut pantry = BioBox::new(2, "CAFE", 20);
    pantry.mode = BioBoxMode::Serving;
    pantry.population = vec!["CAFE".into(); 12];
    station.bio_modules.push(BioModule {
        id: 4,
        name: "Greenhouse".into(),
        boxes: vec![grower, pantry],
    });

    station.air = AirComposition::fresh(station.required_air_volume() + 600);
    station.truss = demo_truss();

    station.peripherals = vec![
        Peripheral::new(10, PeripheralType::ScrubberCo2),
        Peripheral::new(11, PeripheralType::ScrubberCo2),
        Peripheral::new(12, PeripheralType::ScrubberCo2),
        Peripheral::new(13, PeripheralType::Electrolizer),
        Peripheral::new(14, PeripheralType::Methanizer),
        Peripheral::new(15, PeripheralType::Condensator),
        Peripheral::new(16, PeripheralType::WaterFilter),
        Peripheral::new(17, PeripheralType::BioSolidifier),
        Peripheral::new(18, PeripheralType::Radiator),
        Peripheral::new(19, PeripheralType::Radiator),
    ];
    for peripheral in station.peripherals.iter_mut().take(3) {
        peripheral.last_fixed = Some(start - chrono::Duration::days(20));
    }

    station.food = (0..800)
        .map(|i| ["ABBA", "CAFE", "DEAF", "FADE", "BEEF"][i % 5].to_string())
        .collect();
    station.unlocked_tech = ["Hab", "Lab", "Bio", "Antenna", "Solar"]
        .iter()
        .map(|t| t.to_string())
        .collect();
    station
}

fn demo_truss() -> Truss {
    let mut truss = Truss::new();
    truss.tanks = vec![
        Tank::full(TankType::O2, 1000),
        Tank::full(TankType::O2, 1000),
        Tank::full(TankType::H2o, 1000),
        Tank::full(TankType::H2o, 1000),
        Tank::full(TankType::N2, 500),
        Tank::full(TankType::Air, 400),
        Tank::full(TankType::Co2, 2000),
        Tank::full(TankType::H2, 200),
        Tank::full(TankType::Ch4, 200),
    ];
    for tank in truss.tanks.iter_mut().filter(|t| {
        matches!(t.tank_type, TankType::Co2 | TankType::H2 | TankType::Ch4)
    }) {
        let level = tank.current();
        tank.draw(level);
    }
    truss.boxes = vec![
        StorageBox::empty(Ingredient::WasteLiquid, 300),
        StorageBox::empty(Ingredient::WasteSolid, 200),
        StorageBox::empty(Ingredient::Fertilizer, 100),
        StorageBox::empty(Ingredient::Aluminium, 100),
    ];
    truss.batteries = vec![Battery::full(3000), Battery::full(3000)];
    truss.solar_panels = vec![SolarPanel { size: 12 }, SolarPanel { size: 12 }];
    truss.antenna = Antenna { level: 2 };
    truss
}

// ── 1. Air model ────────────────────────────────────────────────────────

fn validate_air_model() -> Vec<TestResult> {
    println!("--- Air Model ---");
    let mut results = Vec::new();

    let fresh = AirComposition::fresh(1000);
    results.push(TestResult {
        name: "air_fresh_is_great".into(),
        passed: fresh.air_quality() == AirQuality::Great && fresh.needs_oxygen() == 0,
        detail: format!("fresh 1000 → {:?}", fresh.air_quality()),
    });

    let mut thin = AirComposition {
        o2: 221,
        n2: 1280,
        ..AirComposition::default()
    };
    let deficit = thin.needs_oxygen();
    let before = thin.air_quality();
    thin.o2 += deficit;
    results.push(TestResult {
        name: "air_deficit_restores_quality".into(),
        passed: before == AirQuality::Bad && thin.air_quality() == AirQuality::Great,
        detail: format!("{:?} + {} O2 → {:?}", before, deficit, thin.air_quality()),
    });

    results.push(TestResult {
        name: "air_empty_is_lethal".into(),
        passed: AirComposition::default().air_quality() == AirQuality::Lethal,
        detail: "volume 0 → Lethal".into(),
    });

    results
}

// ── 2. Resource store ───────────────────────────────────────────────────

fn validate_resource_store() -> Vec<TestResult> {
    println!("--- Resource Store ---");
    let mut results = Vec::new();

    let mut truss = demo_truss();
    let before = truss.clone();
    let bill = BTreeMap::from([(Ingredient::Aluminium, 10), (Ingredient::Copper, 1)]);
    let paid = truss.pay_for_resources(&bill);
    results.push(TestResult {
        name: "store_payment_is_atomic".into(),
        passed: !paid && truss == before,
        detail: format!("short bill paid={} untouched={}", paid, truss == before),
    });

    let mut truss = demo_truss();
    let o2_before = truss.tank_total(TankType::O2);
    truss.charge_from(TankType::O2, 250);
    truss.merge_tanks();
    results.push(TestResult {
        name: "store_merge_conserves".into(),
        passed: truss.tank_total(TankType::O2) == o2_before - 250,
        detail: format!("O2 {} → {}", o2_before, truss.tank_total(TankType::O2)),
    });

    let energy = truss.total_energy();
    let refused = !truss.consume_energy(energy + 1);
    results.push(TestResult {
        name: "store_energy_is_atomic".into(),
        passed: refused && truss.total_energy() == energy,
        detail: format!("overdraw refused={} energy={}", refused, truss.total_energy()),
    });

    results
}

// ── 3. Accounting run ───────────────────────────────────────────────────

/// Violations found in one station state.
fn invariant_violations(station: &Station) -> Vec<String> {
    let mut found = Vec::new();
    for tank in &station.truss.tanks {
        if tank.current() > tank.capacity() {
            found.push(format!("{:?} tank over capacity", tank.tank_type));
        }
    }
    for storage in &station.truss.boxes {
        if storage.current() > storage.capacity() {
            found.push(format!("{:?} box over capacity", storage.ingredient));
        }
    }
    for battery in &station.truss.batteries {
        if battery.current() > battery.capacity() {
            found.push("battery over capacity".into());
        }
    }
    for person in station.people() {
        if !(0..=100).contains(&person.health_physical)
            || !(0..=100).contains(&person.happiness)
            || !(LIFE_EXPECTANCY_MIN..=LIFE_EXPECTANCY_MAX).contains(&person.life_expectancy)
        {
            found.push(format!("{} out of range", person.name));
        }
    }
    for bio_box in station.bio_modules.iter().flat_map(|m| m.boxes.iter()) {
        if bio_box.population.len() > bio_box.population_limit {
            found.push(format!("bio-box #{} over limit", bio_box.id));
        }
    }
    found
}

fn run_cycles(
    station: &mut Station,
    settings: &AccountingSettings,
    options: &Options,
) -> Vec<TestResult> {
    println!("--- Accounting Run ({} hours, seed {}) ---", options.hours, options.seed);
    let mut results = Vec::new();

    let mut player = Player {
        name: "Harness".into(),
        money: 0,
        experience: 3,
    };
    let mut bus = EventLog::new();
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut ctx = AccountingContext::new(settings, &mut player, &mut bus, &mut rng);

    let crew_at_start = station.inhabitant_count();
    let mut violations = Vec::new();
    let mut chained = true;
    let mut problems = 0;
    let mut start = station.accounting_date;

    for hour in 0..options.hours {
        let end = run_accounting_cycle(station, start, &mut ctx);
        if let Some(report) = &station.last_report {
            chained &= report.started_at() == start && report.ended_at() == end;
            problems += report.problems().len();
            if options.verbose {
                for problem in report.problems() {
                    println!("    h{:04} {}", hour, problem);
                }
            }
        }
        for violation in invariant_violations(station) {
            violations.push(format!("h{}: {}", hour, violation));
        }
        start = end;
    }

    results.push(TestResult {
        name: "run_invariants_hold".into(),
        passed: violations.is_empty(),
        detail: match violations.first() {
            Some(first) => format!("{} violations, first: {}", violations.len(), first),
            None => format!("{} cycles clean", options.hours),
        },
    });
    results.push(TestResult {
        name: "run_cycles_chain".into(),
        passed: chained && station.accounting_date == start,
        detail: format!("ended at {}", station.accounting_date),
    });

    let deaths = bus.deaths();
    results.push(TestResult {
        name: "run_deaths_match_crew".into(),
        passed: station.inhabitant_count() + deaths == crew_at_start,
        detail: format!(
            "crew {} → {}, {} deaths",
            crew_at_start,
            station.inhabitant_count(),
            deaths
        ),
    });

    let income: u32 = bus
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::IncomeReceived { amount } => Some(*amount),
            _ => None,
        })
        .sum();
    results.push(TestResult {
        name: "run_income_reaches_wallet".into(),
        passed: player.money == income as u64,
        detail: format!("wallet {} from {} income events", player.money, income),
    });

    println!(
        "  crew {}, energy {}, water {}, air {:?}, {} problems over the run",
        station.inhabitant_count(),
        station.truss.total_energy(),
        station.truss.tank_total(TankType::H2o),
        station.air.air_quality(),
        problems,
    );

    results
}

// ── 4. Reproducibility ──────────────────────────────────────────────────

fn validate_reproducible(
    station: &Station,
    settings: &AccountingSettings,
    options: &Options,
) -> Vec<TestResult> {
    println!("--- Reproducibility ---");
    let hours = options.hours.min(48);

    let replay = || {
        let mut station = station.clone();
        let mut player = Player::default();
        let mut bus = EventLog::new();
        let mut rng = StdRng::seed_from_u64(options.seed);
        let mut ctx = AccountingContext::new(settings, &mut player, &mut bus, &mut rng);
        let mut start = station.accounting_date;
        for _ in 0..hours {
            start = run_accounting_cycle(&mut station, start, &mut ctx);
        }
        serde_json::to_string(&station).ok()
    };

    let (first, second) = (replay(), replay());
    vec![TestResult {
        name: "replay_same_seed_same_station".into(),
        passed: first.is_some() && first == second,
        detail: format!("{} hours replayed twice", hours),
    }]
}
