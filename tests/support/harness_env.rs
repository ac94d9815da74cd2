use std::{
    ffi::OsString,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use logit_harness::app_dirs::{APP_DIR_NAME, CONFIG_HOME_ENV};
use logit_harness::config::CONFIG_FILE_NAME;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Points `LOGIT_HARNESS_CONFIG_HOME` at a test directory for this process.
///
/// The previous value comes back on drop. Only one guard exists at a time.
pub struct HarnessEnvGuard {
    previous: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl HarnessEnvGuard {
    pub fn set_config_home(path: &Path) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let previous = std::env::var_os(CONFIG_HOME_ENV);
        write_env(Some(path.as_os_str()));
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for HarnessEnvGuard {
    fn drop(&mut self) {
        write_env(self.previous.as_deref());
    }
}

fn write_env(value: Option<&std::ffi::OsStr>) {
    // SAFETY: every mutation happens while ENV_LOCK is held.
    unsafe {
        match value {
            Some(value) => std::env::set_var(CONFIG_HOME_ENV, value),
            None => std::env::remove_var(CONFIG_HOME_ENV),
        }
    }
}

/// Write `config.toml` where a process with `CONFIG_HOME_ENV=base` reads it.
pub fn write_config(base: &Path, text: &str) {
    let dir = base.join(APP_DIR_NAME);
    std::fs::create_dir_all(&dir).expect("create app dir");
    std::fs::write(dir.join(CONFIG_FILE_NAME), text).expect("write config");
}

pub fn config_file(base: &Path) -> std::path::PathBuf {
    base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}
