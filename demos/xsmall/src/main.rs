//! xsmall — smallest example for the rust_lc location-choice framework.
//!
//! Places 240 synthetic persons across an 8-zone system inspired by the
//! geography of Mobile, Alabama: students choose a school, workers a
//! workplace, both with shadow pricing so modeled zone totals approach the
//! land-use enrollment and employment.  Scale comment: a real region has
//! ~400 K persons and a few thousand zones; swap the generators below for
//! `load_population_csv` / `load_land_use_csv` / `load_skims_csv`.

mod zones;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde_json::json;

use lc_core::{LocationSettings, RunConfig, ZoneId};
use lc_data::{Population, PopulationBuilder, load_size_terms_reader};
use lc_output::{CsvWriter, TraceObserver, write_population_csv, write_table_csv};
use lc_sim::{ContextBuilder, LocationModel, LocationStep, Pipeline};
use lc_utility::{LogsumModel, NestChild, NestSpec, load_mode_spec_reader, load_spec_reader};

use zones::{build_land_use, build_skims, zone_ids};

// ── Constants ─────────────────────────────────────────────────────────────────

const PERSON_COUNT: u32   = 240;
const SEED:         u64   = 42;
const CHUNK_SIZE:   usize = 500; // interaction rows per chunk
const OUTPUT_DIR:   &str  = "output/xsmall";

// ── Specs ─────────────────────────────────────────────────────────────────────

const SCHOOL_SAMPLE_CSV: &str = "\
Label,Expression,gradeschool,highschool,university
distance,skim:DIST,-1.2,-0.6,coef_univ_dist
size,ln_size,1,1,1
no attractions,no_attraction,-999,-999,-999
";

const SCHOOL_CSV: &str = "\
Label,Expression,gradeschool,highschool,university
distance,skim:DIST,-1.2,-0.6,coef_univ_dist
home zone,same_zone,0.8,0.4,
size,ln_size,1,1,1
no attractions,no_attraction,-999,-999,-999
mode choice logsum,mode_choice_logsum,0.4,0.5,0.6
sample correction,sample_correction,1,1,1
";

const WORK_SAMPLE_CSV: &str = "\
Label,Expression,work_low,work_med,work_high
distance,skim:DIST,-0.45,-0.3,-0.2
size,ln_size,1,1,1
no attractions,no_attraction,-999,-999,-999
";

const WORK_CSV: &str = "\
Label,Expression,work_low,work_med,work_high
distance,skim:DIST,-0.45,-0.3,-0.2
home zone,same_zone,0.3,0.2,0.1
size,ln_size,1,1,1
no attractions,no_attraction,-999,-999,-999
mode choice logsum,mode_choice_logsum,0.5,0.5,0.5
sample correction,sample_correction,1,1,1
";

const SIZE_TERMS_CSV: &str = "\
model_selector,segment,ENROLL_K8,ENROLL_HS,ENROLL_UNI,EMP_RETAIL,EMP_OFFICE,EMP_INDUSTRY,HOUSEHOLDS
school,gradeschool,1,0,0,0,0,0,0
school,highschool,0,1,0,0,0,0,0
school,university,0,0,1,0,0,0,0
workplace,work_low,0,0,0,0.8,0.1,0.6,0.01
workplace,work_med,0,0,0,0.3,0.5,0.5,0
workplace,work_high,0,0,0,0.1,1.0,0.2,0
";

const MODE_CSV: &str = "\
Label,Expression,Mode,school,work
drive time,skim:TIME,DRIVE,-0.04,-0.03
walk time,skim:DIST,WALK,-0.9,-1.1
walk constant,1,WALK,0.5,-0.8
transit time,skim:TIME,TRANSIT,-0.06,-0.05
transit constant,1,TRANSIT,-0.4,-1.2
";

// ── Population ────────────────────────────────────────────────────────────────

/// Deterministic synthetic persons: ages 5–84, students under 23, workers
/// 23–64, home zones weighted towards the residential suburbs.
fn build_population() -> Result<Population> {
    let homes = zone_ids();
    let residential = [0usize, 0, 1, 1, 5, 6, 7, 0, 1, 2];

    let mut builder = PopulationBuilder::new();
    let mut ages = Vec::new();
    for i in 0..PERSON_COUNT {
        let home = homes[residential[i as usize % residential.len()]];
        builder = builder.person(1_000 + i, home);
        ages.push(5.0 + ((i * 37) % 80) as f64);
    }

    let is_student = ages.iter().map(|&a| (a < 23.0) as u8 as f64).collect();
    let school_segment = ages
        .iter()
        .map(|&a| if a < 14.0 { 1.0 } else if a < 18.0 { 2.0 } else { 3.0 })
        .collect();
    let is_worker = ages.iter().map(|&a| (23.0..65.0).contains(&a) as u8 as f64).collect();
    let income_segment = (0..PERSON_COUNT).map(|i| (1 + (i * 7) % 3) as f64).collect();

    Ok(builder
        .column("age", ages)
        .column("is_student", is_student)
        .column("school_segment", school_segment)
        .column("is_worker", is_worker)
        .column("income_segment", income_segment)
        .build()?)
}

// ── Models ────────────────────────────────────────────────────────────────────

fn logsum_model() -> Result<LogsumModel> {
    let modes = load_mode_spec_reader(Cursor::new(MODE_CSV))?;
    let nests = NestSpec {
        name:         "root".into(),
        coefficient:  1.0,
        alternatives: vec![
            NestChild::Mode("DRIVE".into()),
            NestChild::Nest(NestSpec {
                name:         "NONAUTO".into(),
                coefficient:  0.72,
                alternatives: vec![NestChild::Mode("WALK".into()), NestChild::Mode("TRANSIT".into())],
            }),
        ],
    };
    Ok(LogsumModel::new(modes, Some(nests), Default::default())?)
}

fn school_model() -> Result<LocationModel> {
    let settings: LocationSettings = serde_json::from_value(json!({
        "sample_spec": "school_location_sample.csv",
        "spec": "school_location.csv",
        "logsum_settings": "tour_mode_choice.json",
        "size_terms": "destination_choice_size_terms.csv",
        "model_selector": "school",
        "sample_size": 6,
        "dest_choice_column_name": "school_zone",
        "chooser_segment_column_name": "school_segment",
        "chooser_filter_column_name": "is_student",
        "segment_ids": { "gradeschool": 1, "highschool": 2, "university": 3 },
        "logsum_tour_purpose": "school",
        "constants": { "coef_univ_dist": -0.15 },
        "shadow_price_table": "school_shadow_prices",
        "modeled_size_table": "school_modeled_size",
        "shadow_pricing": {
            "use_shadow_pricing": true,
            "method": "ctrl",
            "max_iterations": 10,
            "size_threshold": 5.0
        },
        "annotate_distance": { "column": "distance_to_school", "skim": "DIST" }
    }))?;
    Ok(LocationModel::new(
        LocationStep::School,
        settings,
        load_spec_reader(Cursor::new(SCHOOL_SAMPLE_CSV))?,
        load_spec_reader(Cursor::new(SCHOOL_CSV))?,
        load_size_terms_reader(Cursor::new(SIZE_TERMS_CSV))?,
        logsum_model()?,
    )?)
}

fn workplace_model() -> Result<LocationModel> {
    let settings: LocationSettings = serde_json::from_value(json!({
        "sample_spec": "workplace_location_sample.csv",
        "spec": "workplace_location.csv",
        "logsum_settings": "tour_mode_choice.json",
        "size_terms": "destination_choice_size_terms.csv",
        "model_selector": "workplace",
        "sample_size": 5,
        "dest_choice_column_name": "workplace_zone",
        "chooser_segment_column_name": "income_segment",
        "chooser_filter_column_name": "is_worker",
        "segment_ids": { "work_low": 1, "work_med": 2, "work_high": 3 },
        "logsum_tour_purpose": "work",
        "shadow_price_table": "workplace_shadow_prices",
        "modeled_size_table": "workplace_modeled_size",
        "shadow_pricing": {
            "use_shadow_pricing": true,
            "method": "daysim",
            "max_iterations": 10,
            "size_threshold": 5.0
        },
        "annotate_distance": { "column": "distance_to_work", "skim": "DIST" }
    }))?;
    Ok(LocationModel::new(
        LocationStep::Workplace,
        settings,
        load_spec_reader(Cursor::new(WORK_SAMPLE_CSV))?,
        load_spec_reader(Cursor::new(WORK_CSV))?,
        load_size_terms_reader(Cursor::new(SIZE_TERMS_CSV))?,
        logsum_model()?,
    )?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== xsmall — rust_lc location choice ===");
    println!("Persons: {PERSON_COUNT}  |  Zones: {}  |  Seed: {SEED}", zone_ids().len());
    println!("(Scale to ~400 K persons + a real zone system for production run)");
    println!();

    // 1. Zone system and persons.
    let population = build_population()?;
    let land_use = build_land_use()?;
    let skims = build_skims();

    // 2. Context.
    let config = RunConfig { chunk_size: CHUNK_SIZE, trace: true, ..RunConfig::new(SEED) };
    let mut ctx = ContextBuilder::new(population, land_use, skims).config(config).build()?;

    // 3. Models, run in step order (school, then workplace).
    let pipeline = Pipeline::new()
        .step(LocationStep::School, school_model()?)
        .step(LocationStep::Workplace, workplace_model()?);

    // 4. Trace output.
    let out = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(out)?;
    let mut obs = TraceObserver::new(CsvWriter::new(out)?);

    // 5. Run.
    let t0 = Instant::now();
    let outcomes = pipeline.run(&mut ctx, &mut obs)?;
    let elapsed = t0.elapsed();
    obs.finish()?;

    // 6. Final population and published tables.
    write_population_csv(&out.join("persons.csv"), &ctx.population)?;
    for (name, table) in ctx.tables() {
        write_table_csv(&out.join(format!("{name}.csv")), table)?;
    }

    // 7. Summary.
    println!("Location choice complete in {:.3} s", elapsed.as_secs_f64());
    for (step, outcome) in &outcomes {
        println!(
            "  {:<20} {:>4} choices  {:>2} iterations  {:?}",
            step.name(),
            outcome.choices.len(),
            outcome.iterations,
            outcome.status,
        );
    }
    if let Some(usage) = memory_stats::memory_stats() {
        println!("  physical memory     : {:.1} MiB", usage.physical_mem as f64 / 1_048_576.0);
    }
    println!();

    // 8. Zone totals table.
    let school = ctx.population.destinations("school_zone").unwrap_or_default();
    let work = ctx.population.destinations("workplace_zone").unwrap_or_default();
    println!("{:<8} {:<8} {:<8}", "Zone", "School", "Work");
    println!("{}", "-".repeat(26));
    for id in zone_ids() {
        let zone = ZoneId(id);
        println!(
            "{:<8} {:<8} {:<8}",
            id,
            school.iter().filter(|&&z| z == zone).count(),
            work.iter().filter(|&&z| z == zone).count(),
        );
    }

    Ok(())
}
