//! On-disk TOML case files for [limbgen].
//!
//! A case file names the integers a big-integer test suite needs expected values for, and the
//! shift sweeps it replays. Values are written as [`limbgen_expr`] expressions so that they read
//! the way the tests themselves are written, e.g. `2**65 + 3`.
//!
//! Files may include other files. Includes are resolved relative to the including file and
//! traversed breadth first; each file is read at most once, so include cycles are harmless.
//!
//! [limbgen]: https://github.com/mrdomino/limbgen

pub mod dirs;

use core::{error, fmt, str};
use std::{
    collections::{HashSet, VecDeque},
    fs, io,
    path::{Path, PathBuf},
};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::dirs::{default_cases_path, expand_home};

/// Finalized case configuration, after all includes have been merged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub global: Global,
    pub case: Vec<RawCase>,
    pub sweep: Vec<RawSweep>,
}

/// On-disk representation of a single case file.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DiskConfig {
    /// Files to be merged into this one, relative to this file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<PathBuf>,

    #[serde(default)]
    pub global: Global,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub case: Vec<RawCase>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sweep: Vec<RawSweep>,
}

/// Settings that apply to every case.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Global {
    /// Output format for cases that don’t choose their own; [`Format::TestOut`] if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

/// How a value is printed.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Minimal big-endian binary digits.
    Bin,
    /// 64-bit limbs, least significant first.
    Limbs,
    /// 64-bit limbs, most significant first, `0` for zero.
    #[default]
    TestOut,
}

/// Error returned when parsing an unrecognized [`Format`] name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

/// A case as written on disk: its value is still unparsed expression text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RawCase {
    pub name: String,
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

/// A shift sweep as written on disk.
///
/// The defaults reproduce the big-integer shift test: starting from `1 << 16`, shift left by one
/// bit 100 times, then right by one bit 120 times.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RawSweep {
    #[serde(default = "default_sweep_name")]
    pub name: String,
    #[serde(default = "default_sweep_start")]
    pub start: String,
    #[serde(default = "default_sweep_left")]
    pub left: u32,
    #[serde(default = "default_sweep_right")]
    pub right: u32,
}

/// A case with its value evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub name: String,
    pub value: BigUint,
    pub format: Format,
}

/// A sweep with its start value evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sweep {
    pub name: String,
    pub start: BigUint,
    pub left: u32,
    pub right: u32,
}

/// Represents an error evaluating the expressions in a [`Config`].
#[derive(Debug, PartialEq)]
pub enum Error {
    Case {
        name: String,
        source: limbgen_expr::Error,
    },
    Sweep {
        name: String,
        source: limbgen_expr::Error,
    },
}

/// Commented starting point for a new case file.
pub const TEMPLATE: &str = concat!(
    "# Other case files may be included.\n",
    "# include = [\"more.toml\"]\n",
    "\n",
    "[global]\n",
    "# Default output format: \"bin\", \"limbs\" or \"test-out\".\n",
    "# format = \"test-out\"\n",
    "\n",
    "# Values are integer expressions, e.g. 2**65 + 3 or (1 << 128) - 1.\n",
    "[[case]]\n",
    "name = \"two_pow_64\"\n",
    "value = \"2**64\"\n",
    "format = \"limbs\"\n",
    "\n",
    "# Shift left `left` times, then right `right` times, printing every step.\n",
    "[[sweep]]\n",
    "name = \"shift\"\n",
    "start = \"1 << 16\"\n",
    "left = 100\n",
    "right = 120\n",
);

impl Config {
    #[cfg(test)]
    /// Create a `Config` directly from a string, for tests. Panics if `include` is nonempty.
    pub fn from_str(s: &str) -> Result<Self, io::Error> {
        let ret: DiskConfig = toml::from_str(s).map_err(io::Error::other)?;
        assert!(ret.include.is_empty());
        Ok(Config {
            global: ret.global,
            case: ret.case,
            sweep: ret.sweep,
        })
    }

    /// The configuration used when no case file exists: just the default shift sweep.
    pub fn builtin() -> Self {
        Config {
            global: Global::default(),
            case: Vec::new(),
            sweep: vec![RawSweep::default()],
        }
    }

    /// Return the config at `path`, or at the default path if `path` is `None`.
    ///
    /// A missing file at the default path is not an error; [`Config::builtin`] is returned
    /// instead. A missing file at an explicit path is.
    pub fn from_or_default(path: Option<&Path>) -> Result<Self, io::Error> {
        if let Some(path) = path {
            return Config::from_file(path);
        }
        let path = Config::default_path()?;
        match Config::from_file(&path) {
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no case file; using builtin sweep");
                Ok(Config::builtin())
            }
            res => res,
        }
    }

    /// Reads the config at `base_path`, merging in everything it includes.
    ///
    /// Later files override the global format of earlier ones. Cases and sweeps are appended in
    /// traversal order, the base file’s first.
    pub fn from_file(base_path: &Path) -> Result<Self, io::Error> {
        let base_path = expand_home(base_path).canonicalize()?;
        let base_config = DiskConfig::from_file(&base_path)?;

        let mut includes: VecDeque<_> = base_config
            .include
            .into_iter()
            .map(|p| Config::resolve_path(&base_path, p))
            .collect();

        let mut config = Config {
            global: base_config.global,
            case: base_config.case,
            sweep: base_config.sweep,
        };

        let mut visited = HashSet::new();
        visited.insert(base_path);
        while let Some(path) = includes.pop_front() {
            let path = path.canonicalize()?;
            if visited.contains(&path) {
                tracing::debug!(path = %path.display(), "skipping repeated include");
                continue;
            }
            tracing::debug!(path = %path.display(), "loading include");
            let disk = DiskConfig::from_file(&path)?;
            includes.extend(
                disk.include
                    .into_iter()
                    .map(|p| Config::resolve_path(&path, p)),
            );

            config.global.merge(disk.global);
            config.case.extend(disk.case);
            config.sweep.extend(disk.sweep);

            visited.insert(path);
        }

        Ok(config)
    }

    /// Evaluates every case, returning the first failure.
    pub fn cases(&self) -> Result<Vec<Case>, Error> {
        self.case
            .iter()
            .map(|case| case.resolve(self.default_format()))
            .collect()
    }

    /// Evaluates every sweep start value, returning the first failure.
    pub fn sweeps(&self) -> Result<Vec<Sweep>, Error> {
        self.sweep.iter().map(RawSweep::resolve).collect()
    }

    pub fn default_format(&self) -> Format {
        self.global.format.unwrap_or_default()
    }

    pub fn default_path() -> Result<PathBuf, io::Error> {
        default_cases_path().map_err(io::Error::other)
    }

    fn resolve_path(base_path: &Path, path: PathBuf) -> PathBuf {
        let path = expand_home(&path);
        if path.is_absolute() {
            return path.into_owned();
        }
        // Canonical file paths always have a parent.
        let base_dir = base_path.parent().unwrap_or(Path::new("/"));
        base_dir.join(path)
    }
}

impl DiskConfig {
    /// Read a single case file without following its includes; see [`Config::from_file`].
    pub fn from_file(path: &Path) -> Result<Self, io::Error> {
        let config = fs::read_to_string(path)?;
        toml::from_str(&config).map_err(io::Error::other)
    }
}

impl Global {
    /// Merge `other` into `self`, preferring `other`.
    pub fn merge(&mut self, other: Global) {
        if let Some(format) = other.format {
            self.format = Some(format);
        }
    }
}

impl Format {
    pub const fn name(self) -> &'static str {
        match self {
            Format::Bin => "bin",
            Format::Limbs => "limbs",
            Format::TestOut => "test-out",
        }
    }
}

impl str::FromStr for Format {
    type Err = UnknownFormat;

    /// Parses the same names the case file uses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Format::Bin, Format::Limbs, Format::TestOut]
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| UnknownFormat(s.into()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown format {:?}; expected bin, limbs or test-out", self.0)
    }
}

impl error::Error for UnknownFormat {}

impl RawCase {
    pub fn resolve(&self, default_format: Format) -> Result<Case, Error> {
        let value = limbgen_expr::parse_natural(&self.value).map_err(|source| Error::Case {
            name: self.name.clone(),
            source,
        })?;
        Ok(Case {
            name: self.name.clone(),
            value,
            format: self.format.unwrap_or(default_format),
        })
    }
}

impl Default for RawSweep {
    fn default() -> Self {
        RawSweep {
            name: default_sweep_name(),
            start: default_sweep_start(),
            left: default_sweep_left(),
            right: default_sweep_right(),
        }
    }
}

impl RawSweep {
    pub fn resolve(&self) -> Result<Sweep, Error> {
        let start = limbgen_expr::parse_natural(&self.start).map_err(|source| Error::Sweep {
            name: self.name.clone(),
            source,
        })?;
        Ok(Sweep {
            name: self.name.clone(),
            start,
            left: self.left,
            right: self.right,
        })
    }
}

impl Sweep {
    /// Every value the sweep visits after each single-bit shift, in order. The start value itself
    /// is not included.
    pub fn values(&self) -> impl Iterator<Item = BigUint> + '_ {
        let lefts = (1..=self.left).map(|n| &self.start << n);
        let top = &self.start << self.left;
        let rights = (1..=self.right).map(move |n| &top >> n);
        lefts.chain(rights)
    }
}

fn default_sweep_name() -> String {
    "shift".into()
}

fn default_sweep_start() -> String {
    "1 << 16".into()
}

fn default_sweep_left() -> u32 {
    100
}

fn default_sweep_right() -> u32 {
    120
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Case { name, source } => write!(f, "case {name}: {source}"),
            Self::Sweep { name, source } => write!(f, "sweep {name}: {source}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Case { source, .. } | Self::Sweep { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write};

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    #[test]
    fn it_works() {
        let config = Config::from_str(
            r#"
            [[case]]
            name="one"
            value="1"
            "#,
        )
        .unwrap();
        let case = &config.case[0];
        assert_eq!("one", case.name);
        assert_eq!("1", case.value);
        assert_eq!(None, case.format);
        assert!(config.sweep.is_empty());
        assert_eq!(Format::TestOut, config.default_format());
    }

    #[test]
    fn formats_resolve() {
        let config = Config::from_str(
            r#"
            [global]
            format="bin"
            [[case]]
            name="a"
            value="2**65 + 3"
            [[case]]
            name="b"
            value="0"
            format="limbs"
            "#,
        )
        .unwrap();
        let cases = config.cases().unwrap();
        assert_eq!(
            vec![
                Case {
                    name: "a".into(),
                    value: (BigUint::from(1u8) << 65u32) + 3u8,
                    format: Format::Bin,
                },
                Case {
                    name: "b".into(),
                    value: BigUint::default(),
                    format: Format::Limbs,
                },
            ],
            cases
        );
    }

    #[test]
    fn sweep_defaults() {
        let config = Config::from_str("[[sweep]]\n").unwrap();
        assert_eq!(vec![RawSweep::default()], config.sweep);
        assert_eq!(Config::builtin().sweep, config.sweep);

        let sweep = &config.sweeps().unwrap()[0];
        let values: Vec<_> = sweep.values().collect();
        assert_eq!(220, values.len());
        assert_eq!(BigUint::from(1u8) << 17u32, values[0]);
        assert_eq!(BigUint::from(1u8) << 116u32, values[99]);
        assert_eq!(BigUint::from(1u8) << 115u32, values[100]);
        assert_eq!(BigUint::from(1u8), values[215]);
        assert_eq!(BigUint::default(), values[216]);
        assert_eq!(BigUint::default(), values[219]);
    }

    #[test]
    fn bad_values_name_the_case() {
        let config = Config::from_str(
            r#"
            [[case]]
            name="neg"
            value="1 - 2"
            "#,
        )
        .unwrap();
        let err = config.cases().unwrap_err();
        let Error::Case { ref name, .. } = err else {
            panic!();
        };
        assert_eq!("neg", name);
        assert_eq!("case neg: eval: 1 - 2 is negative", err.to_string());

        let config = Config::from_str("[[sweep]]\nstart=\"x\"\n").unwrap();
        let Error::Sweep { .. } = config.sweeps().unwrap_err() else {
            panic!();
        };
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(Config::from_str("[global]\nformat=\"hex\"\n").is_err());
    }

    #[test]
    fn format_names_round_trip() {
        for format in [Format::Bin, Format::Limbs, Format::TestOut] {
            assert_eq!(Ok(format), format.to_string().parse());
            let toml = format!("[global]\nformat={:?}\n", format.name());
            assert_eq!(Some(format), Config::from_str(&toml).unwrap().global.format);
        }
        assert_eq!(
            Err(UnknownFormat("hex".into())),
            "hex".parse::<Format>()
        );
    }

    #[test]
    fn template_parses() {
        let config = Config::from_str(TEMPLATE).unwrap();
        assert_eq!(1, config.case.len());
        assert_eq!(vec![RawSweep::default()], config.sweep);
        assert_eq!(Format::Limbs, config.cases().unwrap()[0].format);
    }

    #[test]
    fn includes_merge() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();

        let a_path = a.path().join("cases.toml");
        let b_path = b.path().join("cases.toml");
        let c_path = b.path().join("more.toml");

        let mut a_file = File::create(&a_path).unwrap();
        let mut b_file = File::create(&b_path).unwrap();
        let mut c_file = File::create(&c_path).unwrap();
        write!(
            a_file,
            "include=[{:?}]\n[global]\nformat=\"limbs\"\n[[case]]\nname=\"a\"\nvalue=\"1\"\n",
            &b_path
        )
        .unwrap();
        // Relative include, plus a cycle back to a.
        write!(
            b_file,
            "include=[\"more.toml\", {:?}]\n[global]\nformat=\"bin\"\n[[case]]\nname=\"b\"\nvalue=\"2\"\n",
            &a_path
        )
        .unwrap();
        write!(c_file, "[[sweep]]\nleft=1\nright=1\n").unwrap();

        let config = Config::from_file(&a_path).unwrap();
        assert_eq!(Some(Format::Bin), config.global.format);
        let names: Vec<_> = config.case.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(vec!["a", "b"], names);
        assert_eq!(1, config.sweep.len());
        assert_eq!(1, config.sweep[0].left);
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::from_or_default(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert_eq!(io::ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn missing_default_file_is_builtin() {
        let dir = TempDir::new().unwrap();
        // SAFETY: nothing else in this crate's tests reads these variables, and std serializes
        // its own environment access.
        unsafe { std::env::set_var("XDG_CONFIG_DIR", dir.path()) };
        let path = Config::default_path().unwrap();
        assert_eq!(dir.path().join("limbgen").join("cases.toml"), path);
        assert_eq!(Config::builtin(), Config::from_or_default(None).unwrap());

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[[case]]\nname=\"one\"\nvalue=\"1\"\n").unwrap();
        let config = Config::from_or_default(None).unwrap();
        assert_eq!(1, config.case.len());
        assert!(config.sweep.is_empty());
    }

    #[test]
    fn disk_config_ignores_includes() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "include=[\"does-not-exist.toml\"]\n").unwrap();
        let disk = DiskConfig::from_file(file.path()).unwrap();
        assert_eq!(vec![PathBuf::from("does-not-exist.toml")], disk.include);
        assert!(Config::from_file(file.path()).is_err());
    }
}
