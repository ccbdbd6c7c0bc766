use practice_tasks::domain::model::Currency;
use practice_tasks::utils::validation::Validate;
use practice_tasks::{CurrencyPipeline, ExportConfig, ExportEngine, LocalStorage, TaskError};
use tempfile::TempDir;

const FEED: &str = r#"<?xml version="1.0" encoding="windows-1251"?>
<ValCurs Date="19.07.2024" name="Foreign Currency Market">
<Valute ID="R01035"><NumCode>826</NumCode><CharCode>GBP</CharCode><Nominal>1</Nominal><Name>Фунт стерлингов Соединенного королевства</Name><Value>114,3432</Value><VunitRate>114,3432</VunitRate></Valute>
<Valute ID="R01090B"><NumCode>933</NumCode><CharCode>BYN</CharCode><Nominal>1</Nominal><Name>Белорусский рубль</Name><Value>27,1684</Value><VunitRate>27,1684</VunitRate></Valute>
<Valute ID="R01235"><NumCode>840</NumCode><CharCode>USD</CharCode><Nominal>1</Nominal><Name>Доллар США</Name><Value>88,0206</Value><VunitRate>88,0206</VunitRate></Valute>
<Valute ID="R01239"><NumCode>978</NumCode><CharCode>EUR</CharCode><Nominal>1</Nominal><Name>Евро</Name><Value>96,0412</Value><VunitRate>96,0412</VunitRate></Valute>
</ValCurs>"#;

fn write_feed(dir: &TempDir) -> String {
    let (encoded, _, had_errors) = encoding_rs::WINDOWS_1251.encode(FEED);
    assert!(!had_errors);
    let path = dir.path().join("input").join("rates.xml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, &encoded).unwrap();
    path.to_str().unwrap().replace('\\', "/")
}

#[tokio::test]
async fn test_yaml_config_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_feed(&temp_dir);
    let output = temp_dir
        .path()
        .join("out")
        .join("nested")
        .join("rates.json");
    let output = output.to_str().unwrap().replace('\\', "/");

    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        format!("input-file: \"{}\"\noutput-file: \"{}\"\n", input, output),
    )
    .unwrap();

    let config = ExportConfig::from_file(&config_path).unwrap();
    config.validate().unwrap();

    let engine = ExportEngine::new(CurrencyPipeline::new(LocalStorage::default(), config));
    let written_to = engine.run().await.unwrap();
    assert_eq!(written_to, output);

    let json = std::fs::read_to_string(&output).unwrap();
    let currencies: Vec<Currency> = serde_json::from_str(&json).unwrap();
    let codes: Vec<&str> = currencies.iter().map(|c| c.char_code.as_str()).collect();
    assert_eq!(codes, vec!["GBP", "EUR", "USD", "BYN"]);
    assert_eq!(currencies[0].num_code, 826);
    assert!((currencies[0].value - 114.3432).abs() < 1e-9);

    let raw: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = raw[0].as_object().unwrap();
    assert_eq!(first.len(), 3);
    assert!(first.contains_key("num_code"));
    assert!(first.contains_key("char_code"));
    assert!(first.contains_key("value"));
}

#[tokio::test]
async fn test_toml_config_with_env_substitution() {
    let temp_dir = TempDir::new().unwrap();
    write_feed(&temp_dir);
    let base = temp_dir.path().to_str().unwrap().replace('\\', "/");
    std::env::set_var("CURRENCY_EXPORT_TEST_BASE", &base);

    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
input-file = "${CURRENCY_EXPORT_TEST_BASE}/input/rates.xml"
output-file = "${CURRENCY_EXPORT_TEST_BASE}/rates.json"
"#,
    )
    .unwrap();

    let config = ExportConfig::from_file(&config_path).unwrap();
    std::env::remove_var("CURRENCY_EXPORT_TEST_BASE");
    assert_eq!(config.output_file, format!("{}/rates.json", base));

    let engine = ExportEngine::new(CurrencyPipeline::new(LocalStorage::default(), config));
    engine.run().await.unwrap();
    assert!(temp_dir.path().join("rates.json").exists());
}

#[tokio::test]
async fn test_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = ExportConfig {
        input_file: "does-not-exist.xml".to_string(),
        output_file: "rates.json".to_string(),
    };

    let engine = ExportEngine::new(CurrencyPipeline::new(
        LocalStorage::new(temp_dir.path()),
        config,
    ));
    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, TaskError::IoError(_)));
    assert!(!temp_dir.path().join("rates.json").exists());
}

#[tokio::test]
async fn test_malformed_xml() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("bad.xml"), "<ValCurs><Valute>").unwrap();
    let config = ExportConfig {
        input_file: "bad.xml".to_string(),
        output_file: "rates.json".to_string(),
    };

    let engine = ExportEngine::new(CurrencyPipeline::new(
        LocalStorage::new(temp_dir.path()),
        config,
    ));
    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, TaskError::XmlError(_)));
}
