pub mod path;

pub use path::{
    Error, Result, expand_tilde, normalize_path, relative_slash_path, resolve_data_dir,
    resolve_project_dir,
};
