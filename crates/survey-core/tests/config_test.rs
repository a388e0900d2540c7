//! Tests for layered configuration.

use std::sync::Mutex;

use survey_core::config::{CliOverrides, SurveyConfig};
use survey_core::errors::ConfigError;

/// Serializes tests that touch process environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const SURVEY_ENV_VARS: [&str; 9] = [
    "SURVEY_DATABASE_PATH",
    "SURVEY_DATABASE_READ_POOL_SIZE",
    "SURVEY_INGEST_VALIDATE_SCALES",
    "SURVEY_COMPLETION_BASE_URL",
    "SURVEY_COMPLETION_MODEL",
    "SURVEY_COMPLETION_TEMPERATURE",
    "SURVEY_COMPLETION_MAX_TOKENS",
    "SURVEY_RETENTION_FILE_DAYS",
    "SURVEY_RETENTION_NARRATIVE_DAYS",
];

fn clear_survey_env_vars() {
    for key in SURVEY_ENV_VARS {
        std::env::remove_var(key);
    }
}

/// Points HOME at an empty directory so a developer's real user config
/// cannot leak into the test.
fn isolated_home() -> tempfile::TempDir {
    let home = tempfile::TempDir::new().unwrap();
    std::env::set_var("HOME", home.path());
    home
}

#[test]
fn test_defaults_when_no_files() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_survey_env_vars();
    let _home = isolated_home();
    let dir = tempfile::TempDir::new().unwrap();

    let config = SurveyConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.database.effective_path(dir.path()), dir.path().join("survey.db"));
    assert_eq!(config.database.effective_read_pool_size(), 4);
    assert!(config.ingest.effective_validate_scales());
    assert_eq!(config.completion.effective_model(), "gpt-3.5-turbo");
    assert_eq!(config.completion.effective_max_tokens(), 2000);
    assert!((config.completion.effective_temperature() - 0.7).abs() < f64::EPSILON);
    assert_eq!(config.completion.effective_history_context(), 5);
    assert_eq!(config.retention.effective_file_days(), 30);
    assert_eq!(config.analysis.effective_education_order()[0], "고졸");
}

#[test]
fn test_layer_priority_cli_env_project_user() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_survey_env_vars();
    let home = isolated_home();
    let dir = tempfile::TempDir::new().unwrap();

    std::fs::create_dir_all(home.path().join(".survey")).unwrap();
    std::fs::write(
        home.path().join(".survey").join("config.toml"),
        r#"
[completion]
model = "user-model"
max_tokens = 100

[retention]
file_days = 7
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("survey.toml"),
        r#"
[completion]
model = "project-model"
temperature = 0.2

[database]
path = "data/project.db"
"#,
    )
    .unwrap();
    std::env::set_var("SURVEY_COMPLETION_TEMPERATURE", "1.1");
    std::env::set_var("SURVEY_DATABASE_PATH", "env.db");

    let cli = CliOverrides {
        database_path: Some("cli.db".to_string()),
        ..Default::default()
    };
    let config = SurveyConfig::load(dir.path(), Some(&cli)).unwrap();

    // user only
    assert_eq!(config.completion.max_tokens, Some(100));
    assert_eq!(config.retention.file_days, Some(7));
    // project beats user
    assert_eq!(config.completion.model.as_deref(), Some("project-model"));
    // env beats project
    assert_eq!(config.completion.temperature, Some(1.1));
    // cli beats env
    assert_eq!(config.database.path.as_deref(), Some("cli.db"));

    clear_survey_env_vars();
}

#[test]
fn test_unparseable_env_value_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_survey_env_vars();
    let _home = isolated_home();
    let dir = tempfile::TempDir::new().unwrap();

    std::env::set_var("SURVEY_COMPLETION_MAX_TOKENS", "lots");
    let config = SurveyConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.completion.max_tokens, None);

    clear_survey_env_vars();
}

#[test]
fn test_invalid_project_toml_is_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_survey_env_vars();
    let _home = isolated_home();
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("survey.toml"), "[completion\nmodel = ").unwrap();

    match SurveyConfig::load(dir.path(), None) {
        Err(ConfigError::ParseError { path, .. }) => assert!(path.ends_with("survey.toml")),
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_validation_rejects_out_of_range_values() {
    let cases = [
        ("[completion]\ntemperature = 2.5", "completion.temperature"),
        ("[completion]\nmax_tokens = 0", "completion.max_tokens"),
        ("[retention]\nfile_days = 0", "retention.file_days"),
        ("[retention]\nnarrative_days = 0", "retention.narrative_days"),
        ("[database]\nread_pool_size = 0", "database.read_pool_size"),
        ("[database]\nread_pool_size = 9", "database.read_pool_size"),
    ];
    for (toml_str, expected_field) in cases {
        match SurveyConfig::from_toml(toml_str) {
            Err(ConfigError::ValidationFailed { field, .. }) => {
                assert_eq!(field, expected_field, "for input {toml_str:?}")
            }
            other => panic!("expected ValidationFailed for {toml_str:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_unknown_keys_are_ignored() {
    let config = SurveyConfig::from_toml(
        r#"
[completion]
model = "gpt-4o-mini"
some_future_key = true

[dashboard]
theme = "dark"
"#,
    )
    .unwrap();
    assert_eq!(config.completion.effective_model(), "gpt-4o-mini");
}

#[test]
fn test_to_toml_round_trips_set_values() {
    let mut config = SurveyConfig::default();
    config.completion.model = Some("local-llm".to_string());
    config.analysis.education_order = vec!["BSc".to_string(), "MSc".to_string()];
    config.retention.narrative_days = Some(90);

    let text = config.to_toml().unwrap();
    let back = SurveyConfig::from_toml(&text).unwrap();

    assert_eq!(back.completion.model.as_deref(), Some("local-llm"));
    assert_eq!(back.analysis.effective_education_order(), vec!["BSc", "MSc"]);
    assert_eq!(back.retention.effective_narrative_days(), 90);
}

#[test]
fn test_api_key_resolution_prefers_inline_key() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let mut config = SurveyConfig::default();
    config.completion.api_key_env = Some("SURVEY_TEST_COMPLETION_KEY".to_string());

    std::env::remove_var("SURVEY_TEST_COMPLETION_KEY");
    assert_eq!(config.completion.resolve_api_key(), None);

    std::env::set_var("SURVEY_TEST_COMPLETION_KEY", "from-env");
    assert_eq!(config.completion.resolve_api_key().as_deref(), Some("from-env"));

    config.completion.api_key = Some("inline".to_string());
    assert_eq!(config.completion.resolve_api_key().as_deref(), Some("inline"));

    std::env::remove_var("SURVEY_TEST_COMPLETION_KEY");
}

#[test]
fn test_relative_database_path_resolves_against_root() {
    let mut config = SurveyConfig::default();
    config.database.path = Some("nested/db.sqlite".to_string());
    let root = std::path::Path::new("/srv/survey");
    assert_eq!(
        config.database.effective_path(root),
        std::path::PathBuf::from("/srv/survey/nested/db.sqlite")
    );
}
