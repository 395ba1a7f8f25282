use crate::audit::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_UPLOAD_DIRECTORY: &str = "uploads";
pub const DEFAULT_REPORTS_DIRECTORY: &str = "reports";

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(rename = "uploadDirectory")]
    pub upload_directory: Option<String>,
    #[serde(rename = "reportsDirectory")]
    pub reports_directory: Option<String>,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
    #[serde(rename = "reportMode")]
    pub report_mode: Option<String>,
    #[serde(rename = "topN")]
    _top_n: Option<JSValue>,
    #[serde(rename = "requiredColumns")]
    pub required_columns: Option<Vec<String>>,
}

impl AuditConfig {
    pub fn upload_dir(&self) -> PathBuf {
        PathBuf::from(
            self.upload_directory
                .as_deref()
                .unwrap_or(DEFAULT_UPLOAD_DIRECTORY),
        )
    }

    pub fn reports_dir(&self) -> PathBuf {
        PathBuf::from(
            self.reports_directory
                .as_deref()
                .unwrap_or(DEFAULT_REPORTS_DIRECTORY),
        )
    }

    pub fn report_mode(&self) -> AuditResult<Option<ReportMode>> {
        match &self.report_mode {
            Some(m) => m.parse::<ReportMode>().map(Some).context(ReportSnafu {}),
            None => Ok(None),
        }
    }

    pub fn top_n(&self) -> AuditResult<Option<usize>> {
        match &self._top_n {
            None | Some(JSValue::Null) => Ok(None),
            x => read_js_int(x)
                .context(InvalidConfigSnafu {
                    key: "topN",
                    value: format!("{:?}", x),
                })
                .map(Some),
        }
    }

    pub fn required_columns(&self) -> AuditResult<Vec<SemanticField>> {
        self.required_columns
            .iter()
            .flatten()
            .map(|s| s.parse::<SemanticField>().context(ReportSnafu {}))
            .collect()
    }
}

// Numbers or numeric strings ("5") are both accepted.
fn read_js_int(x: &Option<JSValue>) -> Option<usize> {
    match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        Some(JSValue::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}

fn resolve_dir(root: &Path, dir: &Option<String>) -> Option<String> {
    dir.as_ref().map(|d| {
        if Path::new(d).is_absolute() {
            d.clone()
        } else {
            root.join(d).display().to_string()
        }
    })
}

/// Reads the configuration file. Relative directories are taken relative to
/// the directory of the configuration file.
pub fn read_config(path: &str) -> AuditResult<AuditConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config: AuditConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);

    let root = Path::new(path).parent().unwrap_or_else(|| Path::new(""));
    config.upload_directory = resolve_dir(root, &config.upload_directory);
    config.reports_directory = resolve_dir(root, &config.reports_directory);
    Ok(config)
}
