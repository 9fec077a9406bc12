//! Synthetic 8-zone system inspired by the geography of Mobile, Alabama.

use lc_core::ZoneId;
use lc_data::{DataResult, SkimDict, ZoneTable, ZoneTableBuilder};

/// `(zone, lat, lon)`: two residential suburbs, downtown, a commerce park,
/// the university campus and three mixed zones.
const ZONES: [(u32, f64, f64); 8] = [
    (101, 30.710, -88.070), // north residential
    (102, 30.670, -88.030), // south residential
    (103, 30.695, -88.050), // downtown
    (104, 30.700, -88.030), // commerce park
    (105, 30.696, -88.175), // university
    (106, 30.680, -88.060), // connector
    (107, 30.650, -88.090), // west mixed
    (108, 30.730, -88.040), // north mixed
];

// Land-use columns, one value per zone in `ZONES` order.
const HOUSEHOLDS:   [f64; 8] = [900.0, 850.0, 120.0,  40.0,  60.0, 300.0, 420.0, 380.0];
const EMP_RETAIL:   [f64; 8] = [ 40.0,  35.0, 260.0, 310.0,  20.0,  90.0,  70.0,  55.0];
const EMP_OFFICE:   [f64; 8] = [ 10.0,   5.0, 520.0, 180.0, 140.0,  60.0,  25.0,  30.0];
const EMP_INDUSTRY: [f64; 8] = [  0.0,  15.0,  30.0, 400.0,   0.0, 110.0, 150.0,  80.0];
const ENROLL_K8:    [f64; 8] = [420.0, 380.0,   0.0,   0.0,   0.0, 150.0, 200.0, 260.0];
const ENROLL_HS:    [f64; 8] = [  0.0, 600.0, 250.0,   0.0,   0.0,   0.0, 350.0,   0.0];
const ENROLL_UNI:   [f64; 8] = [  0.0,   0.0,   0.0,   0.0, 900.0,   0.0,   0.0,   0.0];

/// Average network speed in km per minute (~36 km/h).
const KM_PER_MIN: f32 = 0.6;

pub fn zone_ids() -> Vec<u32> {
    ZONES.iter().map(|&(id, _, _)| id).collect()
}

pub fn build_land_use() -> DataResult<ZoneTable> {
    ZoneTableBuilder::new()
        .zones(zone_ids())
        .column("HOUSEHOLDS", HOUSEHOLDS.to_vec())
        .column("EMP_RETAIL", EMP_RETAIL.to_vec())
        .column("EMP_OFFICE", EMP_OFFICE.to_vec())
        .column("EMP_INDUSTRY", EMP_INDUSTRY.to_vec())
        .column("ENROLL_K8", ENROLL_K8.to_vec())
        .column("ENROLL_HS", ENROLL_HS.to_vec())
        .column("ENROLL_UNI", ENROLL_UNI.to_vec())
        .build()
}

/// `DIST` (km, with a 0.5 km intra-zonal floor) and `TIME` (minutes).
pub fn build_skims() -> SkimDict {
    let ids: Vec<ZoneId> = zone_ids().into_iter().map(ZoneId).collect();
    let mut skims = SkimDict::new(&ids);
    skims.insert_with("DIST", distance_km);
    skims.insert_with("TIME", |o, d| distance_km(o, d) / KM_PER_MIN);
    skims
}

/// Equirectangular distance between zone centroids.
fn distance_km(o: usize, d: usize) -> f32 {
    let (_, lat1, lon1) = ZONES[o];
    let (_, lat2, lon2) = ZONES[d];
    let x = (lon2 - lon1).to_radians() * ((lat1 + lat2) / 2.0).to_radians().cos();
    let y = (lat2 - lat1).to_radians();
    ((x * x + y * y).sqrt() * 6_371.0).max(0.5) as f32
}
