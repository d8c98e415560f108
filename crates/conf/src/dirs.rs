use std::{
    borrow::Cow,
    env,
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};

/// Error returned if no home directory can be found in the environment.
#[derive(Clone, Copy, Debug)]
pub struct HomeNotSet;

/// Replaces a leading `~` component with the user’s home dir.
///
/// Any other path, and any path at all when the home dir is unknown, is returned as is.
pub fn expand_home(path: &Path) -> Cow<'_, Path> {
    let mut iter = path.components();
    if let Some(Component::Normal(s)) = iter.next()
        && s == OsStr::new("~")
        && let Ok(mut path) = current_home()
    {
        path.extend(iter);
        return Cow::Owned(path);
    }
    Cow::Borrowed(path)
}

/// Returns the default case file path, `<config dir>/limbgen/cases.toml`.
///
/// The config dir is `$XDG_CONFIG_DIR` if set, then `%APPDATA%` on Windows, and otherwise
/// `<home>/.config`. Nothing here checks that the path exists.
pub fn default_cases_path() -> Result<PathBuf, HomeNotSet> {
    let mut path = match env::var_os("XDG_CONFIG_DIR")
        .or_else(|| cfg!(windows).then(|| env::var_os("APPDATA")).flatten())
    {
        Some(dir) => PathBuf::from(dir),
        None => current_home()?.join(".config"),
    };
    path.push("limbgen");
    path.push("cases.toml");
    Ok(path)
}

fn current_home() -> Result<PathBuf, HomeNotSet> {
    #[cfg(windows)]
    if let Some(dir) = env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(dir));
    }
    env::var_os("HOME").map(PathBuf::from).ok_or(HomeNotSet)
}

impl core::error::Error for HomeNotSet {}

impl core::fmt::Display for HomeNotSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("failed reading $HOME")
    }
}
