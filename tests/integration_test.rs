//! End-to-end tests against real netCDF files on disk

use netcdf::AttributeValue;
use reshaper::{
    classifier::find_time_dependent_vars,
    config::ReshapeConfig,
    dataset::{Dataset, DatasetView, Dimension, Variable, VariableData},
    engine::Engine,
    errors::{Result, ReshapeError},
    loader::read_time_slices,
    netcdf_io::{read_dataset, write_dataset},
    pipeline::run,
    synthetic::{generate_time_slice, make_netcdf_data, SyntheticOptions},
    writer::save_to_disk,
};
use ndarray::Array1;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn small_options(periods: usize) -> SyntheticOptions {
    SyntheticOptions {
        periods,
        nlat: 4,
        nlon: 6,
        ..SyntheticOptions::default()
    }
}

fn hidden_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .expect("read_dir")
        .map(|entry| entry.expect("entry").path())
        .filter(|path| {
            path.file_name()
                .map_or(false, |name| name.to_string_lossy().starts_with('.'))
        })
        .collect()
}

#[test]
fn test_dataset_round_trip() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("slice.nc");

    let original = generate_time_slice(&small_options(1), 30.0)?;
    write_dataset(&original, &path, Engine::NetCdf4)?;
    let restored = read_dataset(&path)?;

    assert_eq!(restored.variable_names(), original.variable_names());
    assert_eq!(restored.attributes(), original.attributes());
    for var in original.variables() {
        let back = restored.variable(var.name()).expect("variable should exist");
        assert_eq!(back.dimensions(), var.dimensions());
        assert_eq!(back.data(), var.data());
        assert_eq!(back.attributes(), var.attributes());
    }
    Ok(())
}

#[test]
fn test_netcdf_file_is_a_dataset_view() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("slice.nc");
    write_dataset(&generate_time_slice(&small_options(1), 0.0)?, &path, Engine::NetCdf4)?;

    let file = netcdf::open(&path)?;
    let classification = find_time_dependent_vars(&file, "time");
    assert_eq!(classification.time_dependent, vec!["sst", "pressure", "prec"]);
    assert_eq!(classification.time_independent, vec!["meta_var", "nlat", "nlon"]);
    assert!(classification.is_partition_of(&file.data_variable_names()));
    assert_eq!(file.dimension_names(), vec!["time", "lat", "lon"]);
    assert_eq!(
        file.global_attribute_names(),
        vec!["created on", "created by", "experiment_name"]
    );
    Ok(())
}

#[test]
fn test_read_time_slices_in_time_order() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    // 12 files: tslice10.nc and tslice11.nc sort before tslice2.nc by name
    make_netcdf_data(temp_dir.path(), &small_options(12))?;

    let dset = read_time_slices(temp_dir.path(), "time")?;
    assert_eq!(dset.dimension("time").map(|d| d.len), Some(12));

    match dset.variable("time").map(|v| v.data()) {
        Some(VariableData::Double(times)) => {
            let times: Vec<f64> = times.iter().copied().collect();
            assert!(times.windows(2).all(|w| w[0] < w[1]), "times not sorted: {:?}", times);
        }
        other => panic!("Expected f64 time coordinate, got {:?}", other),
    }
    assert_eq!(dset.variable("prec").map(|v| v.shape().to_vec()), Some(vec![12, 4, 6]));
    assert_eq!(dset.variable("nlat").map(|v| v.shape().to_vec()), Some(vec![4]));
    Ok(())
}

#[test]
fn test_full_pipeline_monthly_slices() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("slices");
    let output_dir = temp_dir.path().join("series");
    fs::create_dir_all(&output_dir)?;

    make_netcdf_data(&input_dir, &small_options(24))?;

    let config = ReshapeConfig::new(&input_dir, output_dir.to_string_lossy().to_string());
    let summary = run(&config)?;

    let expected: Vec<PathBuf> = ["sst", "prec", "pressure"]
        .iter()
        .map(|v| PathBuf::from(format!("{}/tseries.{}.nc", output_dir.display(), v)))
        .collect();
    assert_eq!(summary.written.len(), 3);
    for path in &expected {
        assert!(summary.written.contains(path), "missing {}", path.display());
    }

    let mut produced: Vec<String> = fs::read_dir(&output_dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().to_string()))
        .collect::<std::io::Result<_>>()?;
    produced.sort();
    assert_eq!(
        produced,
        vec!["tseries.prec.nc", "tseries.pressure.nc", "tseries.sst.nc"]
    );

    for (series, path) in ["sst", "prec", "pressure"].iter().zip(&expected) {
        let file = netcdf::open(path)?;

        let time = file.dimension("time").expect("time dimension");
        assert_eq!(time.len(), 24);

        let var = file.variable(series).expect("series variable");
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(dims, vec!["time", "lat", "lon"]);

        for meta in ["meta_var", "nlat", "nlon"] {
            assert!(file.variable(meta).is_some(), "{} missing from {}", meta, series);
        }
        for other in ["sst", "prec", "pressure"].iter().filter(|o| *o != series) {
            assert!(file.variable(other).is_none());
        }

        let created_on = file
            .attribute("created on")
            .expect("global attribute")
            .value()?;
        assert_eq!(created_on, AttributeValue::Str("2010-10-10".to_string()));
        let experiment = file
            .attribute("experiment_name")
            .expect("global attribute")
            .value()?;
        assert_eq!(experiment, AttributeValue::Str("bar".to_string()));

        let classification = find_time_dependent_vars(&file, "time");
        assert_eq!(classification.time_dependent, vec![series.to_string()]);
        assert_eq!(classification.time_independent, vec!["meta_var", "nlat", "nlon"]);
    }

    assert!(hidden_files(&output_dir).is_empty());
    Ok(())
}

#[test]
fn test_series_values_survive_reshaping() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("slices");
    let output_dir = temp_dir.path().join("series");
    fs::create_dir_all(&output_dir)?;
    make_netcdf_data(&input_dir, &small_options(3))?;

    let merged = read_time_slices(&input_dir, "time")?;
    run(&ReshapeConfig::new(&input_dir, output_dir.to_string_lossy().to_string()))?;

    let written = read_dataset(&output_dir.join("tseries.sst.nc"))?;
    for name in ["time", "lat", "lon", "sst", "meta_var", "nlat", "nlon"] {
        assert_eq!(
            written.variable(name).map(|v| v.data()),
            merged.variable(name).map(|v| v.data()),
            "values differ for {}",
            name
        );
    }
    assert_eq!(written.attributes(), merged.attributes());
    Ok(())
}

#[test]
fn test_pipeline_with_every_netcdf3_and_classic_engine() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("slices");
    make_netcdf_data(&input_dir, &small_options(3))?;
    let merged = read_time_slices(&input_dir, "time")?;

    for engine in [Engine::NetCdf4Classic, Engine::NetCdf3Classic, Engine::NetCdf3Offset64] {
        let output_dir = temp_dir.path().join(engine.as_str());
        fs::create_dir_all(&output_dir)?;

        let mut config = ReshapeConfig::new(&input_dir, output_dir.to_string_lossy().to_string());
        config.engine = engine;
        let summary = run(&config)?;
        assert_eq!(summary.written.len(), 3, "engine {}", engine);

        let written = read_dataset(&output_dir.join("tseries.sst.nc"))?;
        assert_eq!(written.dimension("time").map(|d| d.len), Some(3));

        for name in ["time", "sst", "nlat", "nlon"] {
            assert_eq!(
                written.variable(name).map(|v| v.data()),
                merged.variable(name).map(|v| v.data()),
                "values differ for {} with {}",
                name,
                engine
            );
        }

        // i64 values are stored as i32 when the format has no 64-bit integers
        for name in ["lat", "lon", "meta_var"] {
            let original = match merged.variable(name).map(|v| v.data()) {
                Some(VariableData::Int64(values)) => values.mapv(|v| v as i32),
                other => panic!("Expected i64 source for {}, got {:?}", name, other),
            };
            assert_eq!(
                written.variable(name).map(|v| v.data()),
                Some(&VariableData::Int(original)),
                "narrowed values differ for {} with {}",
                name,
                engine
            );
        }

        assert_eq!(
            written.variable("time").and_then(|v| v.attribute("units")),
            merged.variable("time").and_then(|v| v.attribute("units"))
        );
        assert_eq!(written.attributes(), merged.attributes());
        assert!(hidden_files(&output_dir).is_empty());
    }
    Ok(())
}

#[test]
fn test_no_time_dependent_variables_writes_nothing() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input_dir = temp_dir.path().join("slices");
    let output_dir = temp_dir.path().join("series");
    fs::create_dir_all(&input_dir)?;
    fs::create_dir_all(&output_dir)?;

    for (index, day) in [0.0, 31.0].iter().enumerate() {
        let mut dset = Dataset::new();
        dset.add_dimension(Dimension::new("time", 1))?;
        dset.add_dimension(Dimension::new("lat", 3))?;
        dset.insert_variable(Variable::new("time", ["time"], Array1::from_elem(1, *day).into_dyn())?)?;
        dset.insert_variable(Variable::new(
            "orography",
            ["lat"],
            Array1::from(vec![1.0f32, 2.0, 3.0]).into_dyn(),
        )?)?;
        write_dataset(&dset, &input_dir.join(format!("static{}.nc", index)), Engine::NetCdf4)?;
    }

    let summary = run(&ReshapeConfig::new(&input_dir, output_dir.to_string_lossy().to_string()))?;
    assert!(summary.classification.has_no_series());
    assert_eq!(summary.classification.time_independent, vec!["orography"]);
    assert!(summary.written.is_empty());
    assert_eq!(fs::read_dir(&output_dir)?.count(), 0);
    Ok(())
}

#[test]
fn test_writer_overwrites_existing_files() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let target = temp_dir.path().join("tseries.sst.nc");
    fs::write(&target, "stale content")?;

    let dset = generate_time_slice(&small_options(1), 0.0)?;
    save_to_disk(&[dset.clone()], &[target.clone()], Engine::NetCdf4)?;
    // A second write over a valid file also replaces it
    save_to_disk(&[dset], &[target.clone()], Engine::NetCdf4)?;

    let file = netcdf::open(&target)?;
    assert!(file.variable("sst").is_some());
    assert!(hidden_files(temp_dir.path()).is_empty());
    Ok(())
}

#[test]
fn test_failed_write_leaves_targets_untouched() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let good_target = temp_dir.path().join("tseries.sst.nc");
    let bad_target = temp_dir.path().join("missing").join("tseries.prec.nc");
    fs::write(&good_target, "previous run")?;

    let dset = generate_time_slice(&small_options(1), 0.0)?;
    let result = save_to_disk(
        &[dset.clone(), dset],
        &[good_target.clone(), bad_target.clone()],
        Engine::NetCdf4,
    );

    match result {
        Err(e) => assert!(e.is_backend_failure(), "unexpected error: {}", e),
        Ok(()) => panic!("write into a missing directory should fail"),
    }
    assert_eq!(fs::read_to_string(&good_target)?, "previous run");
    assert!(!bad_target.exists());
    assert!(hidden_files(temp_dir.path()).is_empty());
    Ok(())
}

#[test]
fn test_run_rejects_empty_input_directory() {
    let config = ReshapeConfig::new("", "out");
    assert!(matches!(run(&config), Err(ReshapeError::InvalidInput { .. })));
}
