mod common;

use overhead::{
    time::parse_sighting_datetime, CorrelationSummary, SightingCorrelator, Sgp4Propagator,
};

use common::{derived, load_archive, read_table, run_correlation, SIGHTINGS_PATH};

fn empty() -> (String, String, String) {
    (String::new(), String::new(), String::new())
}

#[test]
fn test_sightings_file() {
    let archive = load_archive();
    let input = std::fs::read(SIGHTINGS_PATH).unwrap();
    let (output, summary) = run_correlation(&archive, &input);

    let (header, rows) = read_table(&output);
    assert_eq!(rows.len(), 8);
    assert_eq!(header.len(), 14);
    assert_eq!(&header[10], "longitude ");
    assert_eq!(&header[11], "iss_lat");
    assert_eq!(&header[12], "iss_lon");
    assert_eq!(&header[13], "iss_visible_in_sky");

    assert_eq!(
        summary,
        CorrelationSummary {
            rows: 8,
            full: 3,
            visible: summary.visible,
            partial: 2,
            unparsable_timestamp: 2,
            before_archive: 1,
            propagation_failed: 0,
        }
    );

    // passthrough fields are untouched, including quoted commas
    assert_eq!(&rows[3][7], "Three lights, in a row");
    assert_eq!(&rows[1][1], "seattle");

    // before the archive, bad hour, no date at all
    assert_eq!(derived(&rows[0]), empty());
    assert_eq!(derived(&rows[4]), empty());
    assert_eq!(derived(&rows[6]), empty());

    // full results
    for idx in [1, 3, 5] {
        let (lat, lon, visible) = derived(&rows[idx]);
        let lat: f64 = lat.parse().unwrap();
        let lon: f64 = lon.parse().unwrap();
        assert!(lat.abs() <= 52.0, "row {idx}: latitude {lat}");
        assert!((-180.0..=180.0).contains(&lon), "row {idx}: longitude {lon}");
        assert!(visible == "True" || visible == "False", "row {idx}: {visible:?}");
    }

    // blank and non-numeric coordinates
    for idx in [2, 7] {
        let (lat, lon, visible) = derived(&rows[idx]);
        assert!(!lat.is_empty() && !lon.is_empty(), "row {idx}");
        assert_eq!(visible, "", "row {idx}");
    }
}

#[test]
fn test_output_is_deterministic() {
    let archive = load_archive();
    let input = std::fs::read(SIGHTINGS_PATH).unwrap();

    let (first, _) = run_correlation(&archive, &input);
    let (second, _) = run_correlation(&archive, &input);
    assert_eq!(first, second);
}

#[test]
fn test_before_archive_yields_empty_fields() {
    let archive = load_archive();
    let input = "datetime,latitude,longitude\n11/20/1998 6:40,45.9,63.3\n";
    let (output, summary) = run_correlation(&archive, input.as_bytes());

    let (_, rows) = read_table(&output);
    assert_eq!(derived(&rows[0]), empty());
    assert_eq!(summary.before_archive, 1);
}

#[test]
fn test_report_under_the_ground_point_is_visible() {
    let archive = load_archive();
    let correlator = SightingCorrelator::new(&archive, Sgp4Propagator);
    let at = parse_sighting_datetime("7/15/2020 22:30").unwrap();
    let ground = correlator.ground_position(&at).unwrap();

    let near = format!("{:.6},{:.6}", ground.lat, ground.lon);
    let far_lon = if ground.lon > 0.0 { ground.lon - 180.0 } else { ground.lon + 180.0 };
    let far = format!("{:.6},{:.6}", -ground.lat, far_lon);
    let input = format!(
        "datetime,latitude,longitude\n7/15/2020 22:30,{near}\n7/15/2020 22:30,{far}\n"
    );

    let (output, summary) = run_correlation(&archive, input.as_bytes());
    let (_, rows) = read_table(&output);

    let expected_lat = format!("{:.6}", ground.lat);
    let expected_lon = format!("{:.6}", ground.lon);
    assert_eq!(
        derived(&rows[0]),
        (expected_lat.clone(), expected_lon.clone(), "True".to_string())
    );
    assert_eq!(
        derived(&rows[1]),
        (expected_lat, expected_lon, "False".to_string())
    );
    assert_eq!(summary.full, 2);
    assert_eq!(summary.visible, 1);
}

#[test]
fn test_blank_coordinates_keep_ground_point() {
    let archive = load_archive();
    let correlator = SightingCorrelator::new(&archive, Sgp4Propagator);
    let ground = correlator
        .ground_position(&parse_sighting_datetime("9/21/2008 3:00").unwrap())
        .unwrap();

    let input = "datetime,latitude,longitude\n9/21/2008 3:00,,\n";
    let (output, summary) = run_correlation(&archive, input.as_bytes());
    let (_, rows) = read_table(&output);

    assert_eq!(
        derived(&rows[0]),
        (
            format!("{:.6}", ground.lat),
            format!("{:.6}", ground.lon),
            String::new()
        )
    );
    assert_eq!(summary.partial, 1);
}

#[test]
fn test_row_count_is_preserved() {
    let archive = load_archive();
    let mut input = String::from("datetime,latitude,longitude\n");
    let timestamps = ["9/21/2008 3:00", "bad", "1/1/1990 0:00", "7/15/2020 24:00", "7/16/2020 8:15"];
    for i in 0..250 {
        input.push_str(&format!("{},{},{}\n", timestamps[i % timestamps.len()], i % 80, i % 170));
    }

    let (output, summary) = run_correlation(&archive, input.as_bytes());
    let (_, rows) = read_table(&output);

    assert_eq!(rows.len(), 250);
    assert_eq!(summary.rows, 250);
    assert_eq!(summary.rows, summary.full + summary.partial + summary.no_data());
    assert_eq!(summary.full, 100);
    assert_eq!(summary.no_data(), 150);
}

#[test]
fn test_ground_point_matches_wgs72_reference() {
    let archive = load_archive();
    let input = "datetime,latitude,longitude\n9/21/2008 3:00,47.6063889,-122.3308333\n";
    let (output, _) = run_correlation(&archive, input.as_bytes());
    let (_, rows) = read_table(&output);

    assert_eq!(
        derived(&rows[0]),
        (
            "-45.620823".to_string(),
            "-169.678981".to_string(),
            "False".to_string()
        )
    );
}
