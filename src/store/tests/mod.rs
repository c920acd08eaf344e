//! Shared test utilities and fixtures for observation store tests

use crate::models::{Measurement, Station};
use crate::store::ObservationStore;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};


/// Parse a `YYYY-MM-DD` literal
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Create a test station with standard coordinates
pub fn create_test_station(id: &str, name: &str) -> Station {
    Station::new(id, name, 21.2716, -157.8168, 3.0)
}

/// Create a test measurement
pub fn create_test_measurement(
    station: &str,
    day: &str,
    precipitation: Option<f64>,
    temperature: f64,
) -> Measurement {
    Measurement::new(station, date(day), precipitation, temperature)
}

/// Three stations with uneven activity around the 2017-08-23 end of record.
///
/// USC00519281 has the most measurements (4), USC00519397 has 3,
/// USC00513117 has 2. One measurement refers to a station with no record.
pub fn create_test_store() -> ObservationStore {
    let stations = vec![
        create_test_station("USC00519397", "WAIKIKI 717.2, HI US"),
        create_test_station("USC00513117", "KANEOHE 838.1, HI US"),
        create_test_station("USC00519281", "WAIHEE 837.5, HI US"),
    ];

    let measurements = vec![
        create_test_measurement("USC00519397", "2016-08-22", Some(0.4), 75.0),
        create_test_measurement("USC00519281", "2016-08-22", Some(0.1), 76.0),
        create_test_measurement("USC00519281", "2016-08-23", None, 77.0),
        create_test_measurement("USC00513117", "2017-01-10", Some(0.0), 66.0),
        create_test_measurement("USC00519397", "2017-08-22", Some(0.0), 82.0),
        create_test_measurement("USC00519281", "2017-05-01", Some(0.2), 74.0),
        create_test_measurement("USC00519281", "2017-08-18", Some(0.06), 79.0),
        create_test_measurement("USC00513117", "2017-08-23", Some(0.0), 81.0),
        create_test_measurement("USC00519397", "2017-08-23", None, 80.0),
        create_test_measurement("USC00599999", "2015-01-01", Some(1.5), 70.0),
    ];

    ObservationStore::from_records(stations, measurements)
}

/// Write a stations CSV table in the source database's column layout
pub fn write_stations_csv(dir: &Path, filename: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(filename);
    let content = r#"id,station,name,latitude,longitude,elevation
1,USC00519397,"WAIKIKI 717.2, HI US",21.2716,-157.8168,3.0
2,USC00513117,"KANEOHE 838.1, HI US",21.4234,-157.8015,14.6
3,USC00519281,"WAIHEE 837.5, HI US",21.45167,-157.84889,32.9
"#;
    fs::write(&path, content)?;
    Ok(path)
}

/// Write a measurements CSV table with a missing precipitation value
pub fn write_measurements_csv(dir: &Path, filename: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(filename);
    let content = r#"id,station,date,prcp,tobs
1,USC00519397,2017-08-21,0.0,81
2,USC00519397,2017-08-22,,82
3,USC00519281,2017-08-20,0.01,77
4,USC00519281,2017-08-21,0.02,79
5,USC00519281,2017-08-22,0.5,76
"#;
    fs::write(&path, content)?;
    Ok(path)
}
