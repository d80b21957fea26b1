use std::sync::OnceLock;

use faleproxy_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "faleproxy-tests",
            emit_stderr: true,
            format: if std::env::var("FALEPROXY_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug",
            ..LogConfig::default()
        };

        faleproxy_common::observability::init_logging(config).unwrap_or_default()
    });
}

pub const SAMPLE_HTML_WITH_YALE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Yale University Test Page</title>
</head>
<body>
  <h1>Welcome to Yale University</h1>
  <a href="https://www.yale.edu/about">About Yale</a>
  <p>YALE was founded in 1701 and yale students are called Yalies.</p>
</body>
</html>"#;
