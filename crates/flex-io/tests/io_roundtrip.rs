use flex_core::{ParameterInputs, ParameterSet, TradeDirection};
use flex_io::{
    export_tables, load_parameters, read_table_csv, write_parameter_template, ExportFormat,
};
use flex_settlement::{SettlementTables, TableKind};
use std::fs;
use tempfile::tempdir;

fn sample_inputs() -> ParameterInputs {
    let mut inputs = ParameterInputs {
        v_da: 120.0,
        trade_direction: TradeDirection::Sell,
        e_cons: Some(101.5),
        e_bud: 12.0,
        e_akt: 9.0,
        p_da: 4.25,
        p_imb: 11.0,
        p_recomp: Some(3.5),
        ..ParameterInputs::default()
    };
    inputs.toggles.re_forwards_imbalance_cost = true;
    inputs.toggles.use_da_price_as_customer_price = false;
    inputs
}

#[test]
fn csv_export_round_trips_exactly() {
    let dir = tempdir().unwrap();
    let tables = SettlementTables::from_parameters(&ParameterSet::resolve(&sample_inputs()));
    let written = export_tables(&tables, dir.path(), ExportFormat::Csv).unwrap();
    assert_eq!(written.len(), 6);

    for (path, kind) in written.iter().zip(TableKind::ALL) {
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), format!("{kind}.csv"));
        let back = read_table_csv(path).unwrap();
        assert_eq!(&back, tables.get(kind));
    }
}

#[test]
fn json_export_shape() {
    let dir = tempdir().unwrap();
    let tables = SettlementTables::from_parameters(&ParameterSet::default());
    let written = export_tables(&tables, &dir.path().join("nested"), ExportFormat::Json).unwrap();

    let text = fs::read_to_string(&written[3]).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["key"], "summary");
    assert_eq!(json["columns"]["1a"]["BSP result"], 56.0);
    assert_eq!(json["columns"]["4a"]["Deviation from goal"], "NA");
}

#[test]
fn parameter_formats_load_identically() {
    let dir = tempdir().unwrap();
    let inputs = sample_inputs();

    let toml_path = dir.path().join("params.toml");
    fs::write(&toml_path, toml::to_string(&inputs).unwrap()).unwrap();
    let yaml_path = dir.path().join("params.yaml");
    fs::write(&yaml_path, serde_yaml::to_string(&inputs).unwrap()).unwrap();
    let json_path = dir.path().join("params.json");
    fs::write(&json_path, serde_json::to_string_pretty(&inputs).unwrap()).unwrap();
    let bare_path = dir.path().join("params");
    fs::write(&bare_path, serde_json::to_string(&inputs).unwrap()).unwrap();

    for path in [&toml_path, &yaml_path, &json_path, &bare_path] {
        assert_eq!(load_parameters(path).unwrap(), inputs, "{}", path.display());
    }
}

#[test]
fn template_writes_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("conf").join("params.toml");
    write_parameter_template(&path).unwrap();
    assert_eq!(load_parameters(&path).unwrap(), ParameterInputs::default());
}

#[test]
fn load_errors_name_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "v_da = \"lots\"").unwrap();
    let err = load_parameters(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.toml"));

    let missing = load_parameters(&dir.path().join("missing.toml")).unwrap_err();
    assert!(format!("{missing:#}").contains("missing.toml"));
}
