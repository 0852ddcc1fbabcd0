use crate::error::{SynchroError, SynchroResult};
use crate::logging::LoggingConfig;
use crate::utils::parse_cell_ref;
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SOURCE: &str = "content/source.xlsx";
const DEFAULT_TARGET: &str = "content/dest.xlsx";
const DEFAULT_OUTPUT: &str = "merged.xlsx";
const DEFAULT_TEMPLATE_SHEET: &str = "PBS Template";
const DEFAULT_RESERVED_ROWS: u32 = 17;

/// Column identifiers of the six source fields the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub classification_number: String,
    pub classification_description: String,
    pub instance_name: String,
    pub type_name: String,
    pub area: String,
    pub length: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            classification_number: "type[Data][Classification.Uniclass.Ss.Number][][]".to_string(),
            classification_description: "type[Data][Classification.Uniclass.Ss.Description][][]"
                .to_string(),
            instance_name: "[Common][Name][][]".to_string(),
            type_name: "[Identity Data][Type Name][][]".to_string(),
            area: "[Dimensions][Area][squareMeters][]".to_string(),
            length: "[Dimensions][Length][millimeters][]".to_string(),
        }
    }
}

impl FieldNames {
    pub fn all(&self) -> [&str; 6] {
        [
            self.classification_number.as_str(),
            self.classification_description.as_str(),
            self.instance_name.as_str(),
            self.type_name.as_str(),
            self.area.as_str(),
            self.length.as_str(),
        ]
    }
}

/// Fixed cell coordinates of the template sheet.
///
/// `name`, `quantity` and `unit` address the first data row; each further
/// type group is written one row below the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellLayout {
    pub description: String,
    pub code: String,
    pub name: String,
    pub quantity: String,
    pub unit: String,
    /// Data rows pre-allocated in the template
    pub reserved_rows: u32,
}

impl Default for CellLayout {
    fn default() -> Self {
        Self {
            description: "B6".to_string(),
            code: "B9".to_string(),
            name: "A15".to_string(),
            quantity: "D15".to_string(),
            unit: "E15".to_string(),
            reserved_rows: DEFAULT_RESERVED_ROWS,
        }
    }
}

/// Layout coordinates parsed into `(column, row)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub description: (u32, u32),
    pub code: (u32, u32),
    pub name: (u32, u32),
    pub quantity: (u32, u32),
    pub unit: (u32, u32),
    pub reserved_rows: u32,
}

impl CellLayout {
    pub fn resolve(&self) -> SynchroResult<ResolvedLayout> {
        let parse = |label: &str, addr: &str| {
            parse_cell_ref(addr).map_err(|err| {
                SynchroError::configuration(format!("layout.{label} is not a cell address: {err}"))
            })
        };
        Ok(ResolvedLayout {
            description: parse("description", &self.description)?,
            code: parse("code", &self.code)?,
            name: parse("name", &self.name)?,
            quantity: parse("quantity", &self.quantity)?,
            unit: parse("unit", &self.unit)?,
            reserved_rows: self.reserved_rows,
        })
    }
}

/// Visual style given to rows inserted past the reserved block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowStyle {
    pub font_name: String,
    pub font_size: f64,
    /// RGB hex without alpha, e.g. `F2F2F2`
    pub fill_color: String,
}

impl Default for RowStyle {
    fn default() -> Self {
        Self {
            font_name: "Arial".to_string(),
            font_size: 8.0,
            fill_color: "F2F2F2".to_string(),
        }
    }
}

/// Immutable settings for one run. Every field has a documented default so a
/// config file only needs to name what differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynchroConfig {
    /// Schedule export, `.csv` or a workbook
    pub source_path: PathBuf,
    /// Workbook holding the template sheet
    pub target_path: PathBuf,
    /// Where the augmented copy of the target is saved
    pub output_path: PathBuf,
    pub template_sheet: String,
    pub fields: FieldNames,
    pub layout: CellLayout,
    pub row_style: RowStyle,
    pub logging: LoggingConfig,
}

impl Default for SynchroConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE),
            target_path: PathBuf::from(DEFAULT_TARGET),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            template_sheet: DEFAULT_TEMPLATE_SHEET.to_string(),
            fields: FieldNames::default(),
            layout: CellLayout::default(),
            row_style: RowStyle::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SynchroConfig {
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        match args.config.as_ref() {
            Some(path) => load_config_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Fail fast before any file is touched.
    pub fn validate(&self) -> SynchroResult<()> {
        check_input_path("source", &self.source_path)?;
        check_input_path("target", &self.target_path)?;
        if self.output_path.as_os_str().is_empty() {
            return Err(SynchroError::configuration("output path is empty"));
        }
        if self.template_sheet.trim().is_empty() {
            return Err(SynchroError::configuration("template sheet name is empty"));
        }
        if let Some(blank) = self.fields.all().iter().position(|f| f.trim().is_empty()) {
            return Err(SynchroError::configuration(format!(
                "field name #{} is empty",
                blank + 1
            )));
        }
        if self.layout.reserved_rows == 0 {
            return Err(SynchroError::configuration(
                "layout.reserved_rows must be at least 1",
            ));
        }
        self.layout.resolve()?;
        Ok(())
    }
}

fn check_input_path(label: &str, path: &Path) -> SynchroResult<()> {
    if path.as_os_str().is_empty() {
        return Err(SynchroError::configuration(format!("{label} path is empty")));
    }
    if !path.is_file() {
        return Err(SynchroError::configuration(format!(
            "{label} file {:?} does not exist",
            path
        )));
    }
    Ok(())
}

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "pbs-synchro",
    about = "Write one PBS summary sheet per classification code",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print the grouped schedule as JSON and stop")]
    pub plan: bool,

    #[arg(long, help = "Print the run report as JSON")]
    pub json: bool,
}

fn load_config_file(path: &Path) -> Result<SynchroConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
