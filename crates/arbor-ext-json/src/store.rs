//! File-backed JSON store.
//!
//! Models and contracts are kept one per file under a root directory.
//! Names resolve to `<root>/<name>.json`; a name that already ends in
//! `.json` is used as is.

use std::fs;
use std::path::{Path, PathBuf};

use arbor_core::{ArborError, ArborResult};
use arbor_lattice::LatticeModel;
use arbor_pricing::OptionContract;

use crate::codec::JsonCodec;

const EXTENSION: &str = "json";

/// Lists the `*.json` files directly inside `dir`, sorted by path.
pub fn list_json_files(dir: impl AsRef<Path>) -> ArborResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION))
        .collect();
    files.sort();
    Ok(files)
}

/// Reads a model file.
pub fn load_model_file(path: impl AsRef<Path>) -> ArborResult<LatticeModel> {
    let text = read(path.as_ref())?;
    JsonCodec::new().decode_model(&text)
}

/// Writes a model file, pretty-printed.
pub fn save_model_file(path: impl AsRef<Path>, model: &LatticeModel) -> ArborResult<()> {
    write(path.as_ref(), &JsonCodec::pretty().encode_model(model)?)
}

/// Reads a contract file. The contract has no model attached.
pub fn load_contract_file(path: impl AsRef<Path>) -> ArborResult<OptionContract> {
    let text = read(path.as_ref())?;
    JsonCodec::new().decode_contract(&text)
}

/// Writes a contract file, pretty-printed.
pub fn save_contract_file(path: impl AsRef<Path>, contract: &OptionContract) -> ArborResult<()> {
    write(path.as_ref(), &JsonCodec::pretty().encode_contract(contract)?)
}

fn read(path: &Path) -> ArborResult<String> {
    log::debug!("reading {}", path.display());
    fs::read_to_string(path).map_err(|e| ArborError::Io {
        reason: format!("{}: {e}", path.display()),
    })
}

fn write(path: &Path, text: &str) -> ArborResult<()> {
    log::debug!("writing {}", path.display());
    fs::write(path, text).map_err(|e| ArborError::Io {
        reason: format!("{}: {e}", path.display()),
    })
}

/// A directory of model and contract files.
///
/// # Example
///
/// ```rust
/// use arbor_ext_json::JsonStore;
/// use arbor_lattice::LatticeModel;
///
/// let dir = std::env::temp_dir().join("arbor-store-doc");
/// let store = JsonStore::create(&dir).unwrap();
///
/// let model = LatticeModel::flat_template(3, 0.05, 0.2).unwrap();
/// store.save_model("flat", &model).unwrap();
/// assert_eq!(store.load_model("flat").unwrap(), model);
/// ```
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> ArborResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ArborError::Io {
                reason: format!("{} is not a directory", root.display()),
            });
        }
        Ok(Self { root })
    }

    /// Opens a directory, creating it if needed.
    pub fn create(root: impl Into<PathBuf>) -> ArborResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a name resolves to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let file = Path::new(name);
        if file.extension().is_some_and(|ext| ext == EXTENSION) {
            self.root.join(file)
        } else {
            self.root.join(format!("{name}.{EXTENSION}"))
        }
    }

    /// Saves a model under `name`, returning the file written.
    pub fn save_model(&self, name: &str, model: &LatticeModel) -> ArborResult<PathBuf> {
        let path = self.path_for(name);
        save_model_file(&path, model)?;
        Ok(path)
    }

    /// Loads the model saved under `name`.
    pub fn load_model(&self, name: &str) -> ArborResult<LatticeModel> {
        load_model_file(self.path_for(name))
    }

    /// Saves a contract under `name`, returning the file written.
    pub fn save_contract(&self, name: &str, contract: &OptionContract) -> ArborResult<PathBuf> {
        let path = self.path_for(name);
        save_contract_file(&path, contract)?;
        Ok(path)
    }

    /// Loads the contract saved under `name`.
    pub fn load_contract(&self, name: &str) -> ArborResult<OptionContract> {
        load_contract_file(self.path_for(name))
    }

    /// Lists every `*.json` file in the store.
    pub fn list(&self) -> ArborResult<Vec<PathBuf>> {
        list_json_files(&self.root)
    }
}
