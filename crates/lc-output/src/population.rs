//! Population export with destination columns.

use std::path::Path;

use csv::Writer;

use lc_data::Population;

use crate::OutputResult;

/// Write `population` to `path`.
///
/// Columns: `person_id`, `home_zone`, every numeric attribute (in the
/// population's column order), then every destination column with
/// [`ZoneId::NONE`][lc_core::ZoneId::NONE] exported as `-1`.
pub fn write_population_csv(path: &Path, population: &Population) -> OutputResult<()> {
    let mut writer = Writer::from_path(path)?;

    let numeric: Vec<(&str, &[f64])> = population
        .columns()
        .names()
        .filter_map(|name| population.column(name).map(|values| (name, values)))
        .collect();
    let destinations: Vec<(&str, &[lc_core::ZoneId])> = population.destination_columns().collect();

    let mut header = vec!["person_id", "home_zone"];
    header.extend(numeric.iter().map(|(name, _)| *name));
    header.extend(destinations.iter().map(|(name, _)| *name));
    writer.write_record(&header)?;

    let mut record = Vec::with_capacity(header.len());
    for row in 0..population.count() {
        record.clear();
        record.push(population.person(row).0.to_string());
        record.push(population.home_zone(row).0.to_string());
        record.extend(numeric.iter().map(|(_, values)| values[row].to_string()));
        record.extend(destinations.iter().map(|(_, zones)| zones[row].to_signed().to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    log::info!("wrote {} persons to {}", population.count(), path.display());
    Ok(())
}
