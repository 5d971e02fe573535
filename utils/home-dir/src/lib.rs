use std::io;
use std::path::PathBuf;

pub const HOME_ENV_VAR: &str = "LOGBROWSER_HOME";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_DIR_NAME: &str = ".logbrowser";

/// Directory holding the log browser's configuration.
///
/// `LOGBROWSER_HOME` wins when set and non-empty; it must name an existing
/// directory and is returned canonicalized. Otherwise `~/.logbrowser` is
/// returned without checking that it exists.
pub fn find_logbrowser_home() -> io::Result<PathBuf> {
    let env_value = std::env::var(HOME_ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty());
    home_from_env(env_value.as_deref())
}

/// `config.toml` inside [`find_logbrowser_home`]. The file may not exist.
pub fn default_config_path() -> io::Result<PathBuf> {
    Ok(find_logbrowser_home()?.join(CONFIG_FILE_NAME))
}

fn home_from_env(env_value: Option<&str>) -> io::Result<PathBuf> {
    let Some(value) = env_value else {
        let home = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        return Ok(home.join(DEFAULT_DIR_NAME));
    };

    let path = PathBuf::from(value);
    let metadata = std::fs::metadata(&path).map_err(|err| {
        let message = if err.kind() == io::ErrorKind::NotFound {
            format!("{HOME_ENV_VAR} points to {value:?}, but that path does not exist")
        } else {
            format!("failed to read {HOME_ENV_VAR} {value:?}: {err}")
        };
        io::Error::new(err.kind(), message)
    })?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{HOME_ENV_VAR} points to {value:?}, but that path is not a directory"),
        ));
    }
    path.canonicalize().map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("failed to canonicalize {HOME_ENV_VAR} {value:?}: {err}"),
        )
    })
}
